use crate::domain::entities::{Application, Job, JobDraft};
use crate::domain::value_objects::EtherAmount;
use alloy_primitives::Address;

pub fn poster() -> Address {
    Address::repeat_byte(0x11)
}

pub fn freelancer() -> Address {
    Address::repeat_byte(0x22)
}

pub fn other_freelancer() -> Address {
    Address::repeat_byte(0x33)
}

pub fn contract_address() -> Address {
    Address::repeat_byte(0xcc)
}

pub fn sample_job(job_id: u64, job_poster: Address) -> Job {
    Job {
        job_id,
        job_poster,
        title: format!("Job {job_id}"),
        short_description: "Build a small thing".to_string(),
        detailed_description: "Build a small thing with tests".to_string(),
        budget: EtherAmount::parse("1").unwrap_or_else(|_| EtherAmount::zero()),
        deadline: 4_102_444_800,
        image: "https://example.com/cover.png".to_string(),
        work_url: "https://example.com/brief".to_string(),
        is_completed: false,
        is_approved: false,
    }
}

pub fn sample_application(
    index: u64,
    applicant: Address,
    is_reviewed: bool,
    is_accepted: bool,
) -> Application {
    Application {
        index,
        applicant,
        name: format!("Applicant {index}"),
        previous_work_link: "https://example.com/portfolio".to_string(),
        project_link: format!("https://example.com/project/{index}"),
        is_reviewed,
        is_accepted,
    }
}

pub fn sample_draft() -> JobDraft {
    JobDraft {
        title: "Landing page".to_string(),
        short_description: "Responsive landing page".to_string(),
        detailed_description: "A responsive landing page with a contact form".to_string(),
        budget: "0.5".to_string(),
        deadline: "2099-01-01".to_string(),
        image: "https://example.com/cover.png".to_string(),
        work_url: "https://example.com/brief".to_string(),
    }
}
