use crate::shared::AppError;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use url::Url;

/// URL a freelancer recorded for `(job_id, applicant)`. Stored as the bare string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedWork {
    pub job_id: u64,
    pub applicant: Address,
    pub work_url: String,
}

impl SubmittedWork {
    pub fn new(job_id: u64, applicant: Address, work_url: &str) -> Result<Self, AppError> {
        Ok(Self {
            job_id,
            applicant,
            work_url: validate_work_url(work_url)?,
        })
    }
}

/// Trimmed URL when it is an absolute http(s) link.
pub fn validate_work_url(input: &str) -> Result<String, AppError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(
            "Please enter a work URL".to_string(),
        ));
    }
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => {
            Ok(trimmed.to_string())
        }
        _ => Err(AppError::ValidationError(
            "Please enter a valid URL (e.g., https://github.com/username/project)".to_string(),
        )),
    }
}

/// A stored value counts as a submission once it is non-blank.
pub fn has_work_submitted(work_url: Option<&str>) -> bool {
    work_url.is_some_and(|url| !url.trim().is_empty())
}
