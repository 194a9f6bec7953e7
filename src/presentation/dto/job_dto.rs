use super::{parse_address, Validate};
use crate::application::services::TransactionOutcome;
use crate::domain::entities::{ApplicationDraft, Job, JobDraft};
use crate::domain::value_objects::ApplicationFilter;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub job_id: u64,
    pub job_poster: String,
    pub title: String,
    pub short_description: String,
    pub detailed_description: String,
    pub budget_eth: String,
    pub deadline: i64,
    pub days_left: i64,
    pub image: String,
    pub work_url: String,
    pub is_completed: bool,
    pub is_approved: bool,
}

impl JobResponse {
    pub fn from_job(job: &Job, now: i64) -> Self {
        Self {
            job_id: job.job_id,
            job_poster: job.job_poster.to_checksum(None),
            title: job.display_title().to_string(),
            short_description: job.short_description.clone(),
            detailed_description: job.detailed_description.clone(),
            budget_eth: job.budget.to_string(),
            deadline: job.deadline,
            days_left: job.days_left(now),
            image: job.image.clone(),
            work_url: job.work_url.clone(),
            is_completed: job.is_completed,
            is_approved: job.is_approved,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub operation: String,
    pub transaction_hash: String,
    pub gas_limit: u64,
    pub block_number: Option<u64>,
    pub funding_transaction: Option<String>,
}

impl From<TransactionOutcome> for TransactionResponse {
    fn from(outcome: TransactionOutcome) -> Self {
        Self {
            operation: outcome.operation.to_string(),
            transaction_hash: outcome.transaction_hash.to_string(),
            gas_limit: outcome.gas_limit,
            block_number: outcome.block_number,
            funding_transaction: outcome.funding_transaction.map(|h| h.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExploreJobsRequest {
    pub account: Option<String>,
    pub limit: Option<usize>,
}

impl Validate for ExploreJobsRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(account) = &self.account {
            parse_address("account", account)?;
        }
        if self.limit == Some(0) {
            return Err("limit must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobFormRequest {
    pub title: String,
    pub short_description: String,
    pub detailed_description: String,
    pub budget: String,
    pub deadline: String,
    pub image: String,
    pub work_url: String,
}

impl JobFormRequest {
    pub fn into_draft(self) -> JobDraft {
        JobDraft {
            title: self.title,
            short_description: self.short_description,
            detailed_description: self.detailed_description,
            budget: self.budget,
            deadline: self.deadline,
            image: self.image,
            work_url: self.work_url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditJobRequest {
    pub job_id: u64,
    /// Fields left unset keep their on-chain value.
    pub title: Option<String>,
    pub short_description: Option<String>,
    pub detailed_description: Option<String>,
    pub budget: Option<String>,
    pub deadline: Option<String>,
    pub image: Option<String>,
    pub work_url: Option<String>,
}

impl EditJobRequest {
    pub fn apply_to(self, mut draft: JobDraft) -> JobDraft {
        if let Some(v) = self.title {
            draft.title = v;
        }
        if let Some(v) = self.short_description {
            draft.short_description = v;
        }
        if let Some(v) = self.detailed_description {
            draft.detailed_description = v;
        }
        if let Some(v) = self.budget {
            draft.budget = v;
        }
        if let Some(v) = self.deadline {
            draft.deadline = v;
        }
        if let Some(v) = self.image {
            draft.image = v;
        }
        if let Some(v) = self.work_url {
            draft.work_url = v;
        }
        draft
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyForJobRequest {
    pub job_id: u64,
    pub name: String,
    pub previous_work_link: String,
    pub project_link: String,
}

impl ApplyForJobRequest {
    pub fn draft(&self) -> ApplicationDraft {
        ApplicationDraft {
            name: self.name.clone(),
            previous_work_link: self.previous_work_link.clone(),
            project_link: self.project_link.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListApplicationsRequest {
    pub job_id: u64,
    #[serde(default)]
    pub filter: Option<String>,
}

impl ListApplicationsRequest {
    pub fn filter(&self) -> Result<ApplicationFilter, String> {
        match &self.filter {
            Some(raw) => ApplicationFilter::from_str(raw),
            None => Ok(ApplicationFilter::All),
        }
    }
}

impl Validate for ListApplicationsRequest {
    fn validate(&self) -> Result<(), String> {
        self.filter().map(|_| ())
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDecisionRequest {
    pub job_id: u64,
    pub application_index: u64,
}
