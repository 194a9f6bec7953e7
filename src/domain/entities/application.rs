use crate::shared::AppError;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// A freelancer's application to one job, identified by its position in that job's list.
///
/// Starts unreviewed and unaccepted; the contract treats a reviewed application as final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub index: u64,
    pub applicant: Address,
    pub name: String,
    pub previous_work_link: String,
    pub project_link: String,
    pub is_reviewed: bool,
    pub is_accepted: bool,
}

impl Application {
    pub fn is_from(&self, account: &Address) -> bool {
        self.applicant == *account
    }

    pub fn status(&self) -> ApplicationStatus {
        ApplicationStatus {
            is_reviewed: self.is_reviewed,
            is_accepted: self.is_accepted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStatus {
    pub is_reviewed: bool,
    pub is_accepted: bool,
}

/// First accepted application in list order.
///
/// The contract does not stop a poster from accepting more than one application; when that
/// happens only the earliest one is shown.
pub fn first_accepted(applications: &[Application]) -> Option<&Application> {
    applications.iter().find(|app| app.is_accepted)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDraft {
    pub name: String,
    pub previous_work_link: String,
    pub project_link: String,
}

impl ApplicationDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty()
            || self.previous_work_link.trim().is_empty()
            || self.project_link.trim().is_empty()
        {
            return Err(AppError::ValidationError(
                "Please fill out all fields.".to_string(),
            ));
        }
        Ok(())
    }
}
