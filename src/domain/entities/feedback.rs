use crate::shared::AppError;
use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Structured feedback kept under `feedback_<jobId>_<applicant>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub job_id: u64,
    pub job_title: String,
    pub applicant: Address,
    pub applicant_name: String,
    pub feedback: String,
    pub rating: u8,
    pub submitted_at: DateTime<Utc>,
    pub submitted_by: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackDraft {
    pub text: String,
    pub rating: u8,
}

impl FeedbackDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.text.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Please enter feedback before submitting.".to_string(),
            ));
        }
        if !(1..=5).contains(&self.rating) {
            return Err(AppError::ValidationError(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
        Ok(())
    }
}

/// Text block appended to the freelancer's profile feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackEntry {
    pub job_title: String,
    pub rating: u8,
    pub date: DateTime<Utc>,
    pub text: String,
}

impl FeedbackEntry {
    pub fn render(&self) -> String {
        let stars = "⭐".repeat(self.rating as usize);
        format!(
            "\n\n{SEPARATOR}\n📋 Job: {}\n⭐ Rating: {}/5 {}\n📅 Date: {}\n💬 Feedback:\n{}\n{SEPARATOR}",
            self.job_title,
            self.rating,
            stars,
            self.date.format("%B %-d, %Y"),
            self.text.trim(),
        )
    }

    /// Existing feedback is never replaced, only extended.
    pub fn append_to(&self, existing: &str) -> String {
        format!("{existing}{}", self.render())
    }
}
