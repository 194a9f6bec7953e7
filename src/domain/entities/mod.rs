pub mod application;
pub mod feedback;
pub mod job;
pub mod profile;
pub mod submitted_work;

pub use application::{first_accepted, Application, ApplicationDraft, ApplicationStatus};
pub use feedback::{FeedbackDraft, FeedbackEntry, FeedbackRecord};
pub use job::{Job, JobDraft, LegacyJob, ValidatedJob};
pub use profile::{Profile, ProfileRole};
pub use submitted_work::{has_work_submitted, validate_work_url, SubmittedWork};
