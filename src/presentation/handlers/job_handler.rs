use super::{optional_account, resolve_account};
use crate::{
    application::services::{
        AppliedJobView, ApplicationView, ChainReader, ClientJobView, JobDetailView,
        MutationService, ReconciliationService,
    },
    domain::entities::{JobDraft, LegacyJob},
    presentation::dto::{
        job_dto::{
            ApplyForJobRequest, EditJobRequest, ExploreJobsRequest, JobFormRequest, JobResponse,
            ListApplicationsRequest, ReviewDecisionRequest, TransactionResponse,
        },
        Validate,
    },
    shared::error::AppError,
};
use chrono::Utc;
use std::sync::Arc;

pub struct JobHandler {
    reader: Arc<ChainReader>,
    reconciliation: Arc<ReconciliationService>,
    mutation: Arc<MutationService>,
}

impl JobHandler {
    pub fn new(
        reader: Arc<ChainReader>,
        reconciliation: Arc<ReconciliationService>,
        mutation: Arc<MutationService>,
    ) -> Self {
        Self {
            reader,
            reconciliation,
            mutation,
        }
    }

    pub async fn explore_jobs(
        &self,
        request: ExploreJobsRequest,
    ) -> Result<Vec<JobResponse>, AppError> {
        request.validate().map_err(AppError::ValidationError)?;
        let account = optional_account(&self.reader, request.account.as_deref()).await?;
        let now = Utc::now().timestamp();

        let jobs = self
            .reconciliation
            .explore_jobs(account, request.limit)
            .await?;
        Ok(jobs.iter().map(|job| JobResponse::from_job(job, now)).collect())
    }

    pub async fn client_jobs(&self, account: Option<&str>) -> Result<Vec<ClientJobView>, AppError> {
        let account = resolve_account(&self.reader, account).await?;
        self.reconciliation.client_jobs(account).await
    }

    pub async fn job_detail(
        &self,
        job_id: u64,
        account: Option<&str>,
    ) -> Result<JobDetailView, AppError> {
        let account = optional_account(&self.reader, account).await?;
        self.reconciliation
            .job_detail(job_id, account)
            .await?
            .ok_or_else(|| AppError::NotFound("Job not found".to_string()))
    }

    pub async fn post_job(
        &self,
        account: Option<&str>,
        request: JobFormRequest,
    ) -> Result<TransactionResponse, AppError> {
        let account = resolve_account(&self.reader, account).await?;
        let outcome = self
            .mutation
            .post_job(account, &request.into_draft())
            .await?;
        Ok(outcome.into())
    }

    /// Loads the job, overlays the requested changes and resubmits every field.
    pub async fn edit_job(
        &self,
        account: Option<&str>,
        request: EditJobRequest,
    ) -> Result<TransactionResponse, AppError> {
        let account = resolve_account(&self.reader, account).await?;
        let job = self
            .reader
            .job(request.job_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
        if !job.is_posted_by(&account) {
            return Err(AppError::ValidationError(
                "Only the job poster can edit this job".to_string(),
            ));
        }

        let job_id = request.job_id;
        let draft = request.apply_to(JobDraft::from_job(&job));
        let outcome = self.mutation.edit_job(account, job_id, &draft).await?;
        Ok(outcome.into())
    }

    pub async fn apply_for_job(
        &self,
        account: Option<&str>,
        request: ApplyForJobRequest,
    ) -> Result<TransactionResponse, AppError> {
        let account = resolve_account(&self.reader, account).await?;
        let outcome = self
            .mutation
            .apply_for_job(account, request.job_id, &request.draft())
            .await?;
        Ok(outcome.into())
    }

    pub async fn list_applications(
        &self,
        request: ListApplicationsRequest,
    ) -> Result<Vec<ApplicationView>, AppError> {
        self.reader.access().ready()?;
        let filter = request.filter().map_err(AppError::ValidationError)?;
        self.reconciliation
            .review_applications(request.job_id, filter)
            .await
    }

    pub async fn approve_application(
        &self,
        account: Option<&str>,
        request: ReviewDecisionRequest,
    ) -> Result<TransactionResponse, AppError> {
        let account = resolve_account(&self.reader, account).await?;
        let outcome = self
            .mutation
            .approve_application(account, request.job_id, request.application_index)
            .await?;
        Ok(outcome.into())
    }

    pub async fn deny_application(
        &self,
        account: Option<&str>,
        request: ReviewDecisionRequest,
    ) -> Result<TransactionResponse, AppError> {
        let account = resolve_account(&self.reader, account).await?;
        let outcome = self
            .mutation
            .deny_application(account, request.job_id, request.application_index)
            .await?;
        Ok(outcome.into())
    }

    pub async fn applied_jobs(&self, account: Option<&str>) -> Result<Vec<AppliedJobView>, AppError> {
        let account = resolve_account(&self.reader, account).await?;
        self.reconciliation.applied_jobs(account).await
    }

    pub async fn accepted_jobs(
        &self,
        account: Option<&str>,
    ) -> Result<Vec<AppliedJobView>, AppError> {
        let account = resolve_account(&self.reader, account).await?;
        self.reconciliation.accepted_jobs(account).await
    }

    pub async fn legacy_jobs(&self) -> Result<Vec<LegacyJob>, AppError> {
        self.reader.legacy_jobs().await
    }
}
