use super::Validate;
use crate::domain::entities::{validate_work_url, FeedbackDraft};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitWorkRequest {
    pub job_id: u64,
    pub work_url: String,
    /// Also send the link through the contract's `submitWork`.
    #[serde(default)]
    pub on_chain: bool,
}

impl Validate for SubmitWorkRequest {
    fn validate(&self) -> Result<(), String> {
        validate_work_url(&self.work_url).map_err(|e| e.user_message())?;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedWorkRequest {
    pub job_id: u64,
    pub applicant: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub job_id: u64,
    pub application_index: u64,
    pub feedback: String,
    pub rating: u8,
}

impl FeedbackRequest {
    pub fn draft(&self) -> FeedbackDraft {
        FeedbackDraft {
            text: self.feedback.clone(),
            rating: self.rating,
        }
    }
}

impl Validate for FeedbackRequest {
    fn validate(&self) -> Result<(), String> {
        self.draft().validate().map_err(|e| e.user_message())
    }
}
