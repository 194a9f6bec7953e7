//! ABI of the marketplace contract and conversions to domain types.

use crate::application::ports::marketplace_gateway::ContractCall;
use crate::domain::entities;
use crate::domain::value_objects::EtherAmount;
use alloy_primitives::U256;
use alloy_sol_types::{sol, SolCall};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct Job {
        address jobPoster;
        string title;
        string shortDescription;
        string detailedDescription;
        uint256 budget;
        uint256 deadline;
        string image;
        string workUrl;
        bool isCompleted;
        bool isApproved;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Application {
        address applicant;
        string name;
        string previousWorkLink;
        string projectLink;
        bool isReviewed;
        bool isAccepted;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct LegacyJob {
        uint256 jobId;
        address client;
        string description;
        uint256 budget;
        address freelancer;
        bool isCompleted;
        string submittedWork;
    }

    interface FreelanceMarketplace {
        function postJob(
            string title,
            string shortDescription,
            string detailedDescription,
            uint256 budget,
            uint256 deadline,
            string image,
            string workUrl
        ) external;

        function editJob(
            uint256 jobId,
            string title,
            string shortDescription,
            string detailedDescription,
            uint256 budget,
            uint256 deadline,
            string image,
            string workUrl
        ) external;

        function applyForJob(
            uint256 jobId,
            string name,
            string previousWorkLink,
            string projectLink
        ) external;

        function reviewWork(
            uint256 jobId,
            uint256 applicationIndex,
            bool approve,
            string workUrl
        ) external;

        function submitWork(uint256 jobId, string workUrl) external;

        function getJobs() external view returns (Job[] memory);

        function getApplications(uint256 jobId) external view returns (Application[] memory);

        function getAppliedJobs(address applicant) external view returns (Job[] memory);

        function getAppliedJobsWithStatus(address applicant)
            external
            view
            returns (
                Job[] memory jobs,
                bool[] memory reviewed,
                bool[] memory accepted,
                uint256[] memory jobIds
            );

        function getJobBudget(uint256 jobId) external view returns (uint256);

        function retrieveAllJobs() external view returns (LegacyJob[] memory);
    }
}

/// Saturates at `u64::MAX`.
pub fn u256_to_u64(value: U256) -> u64 {
    let limbs = value.as_limbs();
    if limbs[1..].iter().any(|limb| *limb != 0) {
        u64::MAX
    } else {
        limbs[0]
    }
}

/// Saturates at `i64::MAX`.
pub fn u256_to_i64(value: U256) -> i64 {
    i64::try_from(u256_to_u64(value)).unwrap_or(i64::MAX)
}

fn deadline_to_u256(deadline: i64) -> U256 {
    U256::from(u64::try_from(deadline).unwrap_or(0))
}

pub fn job_into_domain(job_id: u64, job: Job) -> entities::Job {
    entities::Job {
        job_id,
        job_poster: job.jobPoster,
        title: job.title,
        short_description: job.shortDescription,
        detailed_description: job.detailedDescription,
        budget: EtherAmount::from_wei(job.budget),
        deadline: u256_to_i64(job.deadline),
        image: job.image,
        work_url: job.workUrl,
        is_completed: job.isCompleted,
        is_approved: job.isApproved,
    }
}

pub fn application_into_domain(index: u64, app: Application) -> entities::Application {
    entities::Application {
        index,
        applicant: app.applicant,
        name: app.name,
        previous_work_link: app.previousWorkLink,
        project_link: app.projectLink,
        is_reviewed: app.isReviewed,
        is_accepted: app.isAccepted,
    }
}

pub fn legacy_job_into_domain(index: usize, job: LegacyJob) -> entities::LegacyJob {
    entities::LegacyJob {
        job_id: u256_to_u64(job.jobId),
        client: job.client,
        description: job.description,
        budget: EtherAmount::from_wei(job.budget),
        freelancer: job.freelancer,
        is_completed: job.isCompleted,
        submitted_work: job.submittedWork,
        index,
    }
}

/// Calldata for a state-changing call.
pub fn encode_call(call: &ContractCall) -> Vec<u8> {
    use FreelanceMarketplace as M;
    match call {
        ContractCall::PostJob(job) => M::postJobCall {
            title: job.title.clone(),
            shortDescription: job.short_description.clone(),
            detailedDescription: job.detailed_description.clone(),
            budget: job.budget.wei(),
            deadline: deadline_to_u256(job.deadline),
            image: job.image.clone(),
            workUrl: job.work_url.clone(),
        }
        .abi_encode(),
        ContractCall::EditJob { job_id, job } => M::editJobCall {
            jobId: U256::from(*job_id),
            title: job.title.clone(),
            shortDescription: job.short_description.clone(),
            detailedDescription: job.detailed_description.clone(),
            budget: job.budget.wei(),
            deadline: deadline_to_u256(job.deadline),
            image: job.image.clone(),
            workUrl: job.work_url.clone(),
        }
        .abi_encode(),
        ContractCall::ApplyForJob {
            job_id,
            application,
        } => M::applyForJobCall {
            jobId: U256::from(*job_id),
            name: application.name.clone(),
            previousWorkLink: application.previous_work_link.clone(),
            projectLink: application.project_link.clone(),
        }
        .abi_encode(),
        ContractCall::ReviewWork {
            job_id,
            application_index,
            approve,
            work_url,
        } => M::reviewWorkCall {
            jobId: U256::from(*job_id),
            applicationIndex: U256::from(*application_index),
            approve: *approve,
            workUrl: work_url.clone(),
        }
        .abi_encode(),
        ContractCall::SubmitWork { job_id, work_url } => M::submitWorkCall {
            jobId: U256::from(*job_id),
            workUrl: work_url.clone(),
        }
        .abi_encode(),
    }
}
