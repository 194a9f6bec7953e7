use crate::domain::value_objects::EtherAmount;
use crate::shared::AppError;
use alloy_primitives::Address;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Longest short description accepted, in words.
pub const MAX_SHORT_DESCRIPTION_WORDS: usize = 15;

/// A job as held by the marketplace contract. `job_id` is its index in `getJobs()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub job_id: u64,
    pub job_poster: Address,
    pub title: String,
    pub short_description: String,
    pub detailed_description: String,
    pub budget: EtherAmount,
    pub deadline: i64,
    pub image: String,
    pub work_url: String,
    pub is_completed: bool,
    pub is_approved: bool,
}

impl Job {
    /// Completed or approved jobs no longer take applications.
    pub fn is_open(&self) -> bool {
        !self.is_completed && !self.is_approved
    }

    pub fn is_posted_by(&self, account: &Address) -> bool {
        self.job_poster == *account
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "N/A"
        } else {
            &self.title
        }
    }

    /// Whole days until the deadline, never negative.
    pub fn days_left(&self, now: i64) -> i64 {
        ((self.deadline - now) / (60 * 60 * 24)).max(0)
    }
}

/// Record shape of the first contract revision (`retrieveAllJobs`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyJob {
    pub job_id: u64,
    pub client: Address,
    pub description: String,
    pub budget: EtherAmount,
    pub freelancer: Address,
    pub is_completed: bool,
    pub submitted_work: String,
    pub index: usize,
}

/// Job form input, as typed by the poster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub title: String,
    pub short_description: String,
    pub detailed_description: String,
    /// Decimal ETH.
    pub budget: String,
    /// `YYYY-MM-DD`, RFC 3339 or unix seconds.
    pub deadline: String,
    pub image: String,
    pub work_url: String,
}

/// A draft that passed client-side checks and is ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedJob {
    pub title: String,
    pub short_description: String,
    pub detailed_description: String,
    pub budget: EtherAmount,
    pub deadline: i64,
    pub image: String,
    pub work_url: String,
}

impl JobDraft {
    pub fn from_job(job: &Job) -> Self {
        Self {
            title: job.title.clone(),
            short_description: job.short_description.clone(),
            detailed_description: job.detailed_description.clone(),
            budget: job.budget.to_string(),
            deadline: job.deadline.to_string(),
            image: job.image.clone(),
            work_url: job.work_url.clone(),
        }
    }

    pub fn validate(&self, now: i64) -> Result<ValidatedJob, AppError> {
        let fields = [
            &self.title,
            &self.short_description,
            &self.detailed_description,
            &self.budget,
            &self.deadline,
            &self.image,
            &self.work_url,
        ];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(AppError::ValidationError(
                "Please fill in all fields".to_string(),
            ));
        }

        if word_count(&self.short_description) > MAX_SHORT_DESCRIPTION_WORDS {
            return Err(AppError::ValidationError(format!(
                "Short description must be at most {MAX_SHORT_DESCRIPTION_WORDS} words"
            )));
        }

        let budget = EtherAmount::parse(&self.budget)
            .ok()
            .filter(|b| *b >= EtherAmount::min_job_budget())
            .ok_or_else(|| {
                AppError::ValidationError("Budget must be at least 0.001 ETH".to_string())
            })?;

        let deadline = parse_deadline(&self.deadline).ok_or_else(|| {
            AppError::ValidationError(format!("Invalid deadline: {}", self.deadline.trim()))
        })?;
        if deadline <= now {
            return Err(AppError::ValidationError(
                "Deadline must be in the future".to_string(),
            ));
        }

        Ok(ValidatedJob {
            title: self.title.trim().to_string(),
            short_description: self.short_description.trim().to_string(),
            detailed_description: self.detailed_description.trim().to_string(),
            budget,
            deadline,
            image: self.image.trim().to_string(),
            work_url: self.work_url.trim().to_string(),
        })
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Date-only input is read as midnight UTC.
pub fn parse_deadline(input: &str) -> Option<i64> {
    let input = input.trim();
    if let Ok(seconds) = input.parse::<i64>() {
        return Some(seconds);
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp());
    }
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn draft() -> JobDraft {
        JobDraft {
            title: "Landing page".into(),
            short_description: "Build a landing page".into(),
            detailed_description: "Responsive landing page with a contact form".into(),
            budget: "0.5".into(),
            deadline: (NOW + 86_400).to_string(),
            image: "https://example.com/cover.png".into(),
            work_url: "https://example.com/brief".into(),
        }
    }

    #[test]
    fn accepts_complete_draft() {
        let job = draft().validate(NOW).unwrap();
        assert_eq!(job.budget.to_string(), "0.5");
        assert_eq!(job.deadline, NOW + 86_400);
    }

    #[test]
    fn rejects_budget_below_floor() {
        let mut d = draft();
        d.budget = "0.0005".into();
        let err = d.validate(NOW).unwrap_err();
        assert!(err.to_string().contains("Budget must be at least 0.001 ETH"));

        d.budget = "lots".into();
        assert!(d.validate(NOW).is_err());
    }

    #[test]
    fn rejects_deadline_not_in_future() {
        let mut d = draft();
        d.deadline = NOW.to_string();
        let err = d.validate(NOW).unwrap_err();
        assert!(err.to_string().contains("Deadline must be in the future"));

        d.deadline = "2001-01-01".into();
        assert!(d.validate(NOW).is_err());
    }

    #[test]
    fn rejects_missing_fields_and_long_summary() {
        let mut d = draft();
        d.image = "  ".into();
        assert!(d.validate(NOW).unwrap_err().to_string().contains("fill in all fields"));

        let mut d = draft();
        d.short_description = "one two three four five six seven eight nine ten eleven twelve thirteen fourteen fifteen sixteen".into();
        assert!(d.validate(NOW).is_err());
    }

    #[test]
    fn parses_deadline_formats() {
        assert_eq!(parse_deadline("1970-01-02"), Some(86_400));
        assert_eq!(parse_deadline("1970-01-01T00:01:00Z"), Some(60));
        assert_eq!(parse_deadline(" 42 "), Some(42));
        assert_eq!(parse_deadline("tomorrow"), None);
    }

    #[test]
    fn days_left_never_negative() {
        let job = Job {
            job_id: 0,
            job_poster: Address::ZERO,
            title: String::new(),
            short_description: String::new(),
            detailed_description: String::new(),
            budget: EtherAmount::zero(),
            deadline: NOW + 3 * 86_400 + 10,
            image: String::new(),
            work_url: String::new(),
            is_completed: false,
            is_approved: false,
        };
        assert_eq!(job.days_left(NOW), 3);
        assert_eq!(job.days_left(NOW + 10 * 86_400), 0);
        assert_eq!(job.display_title(), "N/A");
    }
}
