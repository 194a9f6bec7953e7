use crate::domain::entities::{Application, ApplicationDraft, Job, LegacyJob, ValidatedJob};
use crate::shared::ProviderError;
use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;

/// State-changing contract calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    PostJob(ValidatedJob),
    EditJob {
        job_id: u64,
        job: ValidatedJob,
    },
    ApplyForJob {
        job_id: u64,
        application: ApplicationDraft,
    },
    /// `approve == false` denies the application.
    ReviewWork {
        job_id: u64,
        application_index: u64,
        approve: bool,
        work_url: String,
    },
    /// Legacy on-chain work submission.
    SubmitWork {
        job_id: u64,
        work_url: String,
    },
}

impl ContractCall {
    pub fn name(&self) -> &'static str {
        match self {
            ContractCall::PostJob(_) => "postJob",
            ContractCall::EditJob { .. } => "editJob",
            ContractCall::ApplyForJob { .. } => "applyForJob",
            ContractCall::ReviewWork { .. } => "reviewWork",
            ContractCall::SubmitWork { .. } => "submitWork",
        }
    }
}

/// Parallel arrays returned by `getAppliedJobsWithStatus`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedJobsWithStatus {
    pub jobs: Vec<Job>,
    pub reviewed: Vec<bool>,
    pub accepted: Vec<bool>,
    pub job_ids: Vec<u64>,
}

/// Typed view of the marketplace contract ABI.
///
/// Jobs come back with `job_id` set to their position in the returned list; callers that
/// know better ids (applied jobs) overwrite them.
#[async_trait]
pub trait MarketplaceGateway: Send + Sync {
    fn contract_address(&self) -> Address;

    async fn get_jobs(&self) -> Result<Vec<Job>, ProviderError>;

    async fn get_applications(&self, job_id: u64) -> Result<Vec<Application>, ProviderError>;

    async fn get_applied_jobs_with_status(
        &self,
        account: Address,
    ) -> Result<AppliedJobsWithStatus, ProviderError>;

    async fn get_applied_jobs(&self, account: Address) -> Result<Vec<Job>, ProviderError>;

    async fn get_job_budget(&self, job_id: u64) -> Result<U256, ProviderError>;

    async fn retrieve_all_jobs(&self) -> Result<Vec<LegacyJob>, ProviderError>;

    async fn estimate(&self, from: Address, call: &ContractCall) -> Result<u64, ProviderError>;

    /// Sends the call through the wallet with an explicit gas limit.
    async fn submit(
        &self,
        from: Address,
        call: &ContractCall,
        gas: u64,
    ) -> Result<B256, ProviderError>;
}
