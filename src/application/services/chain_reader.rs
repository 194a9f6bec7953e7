use super::chain_access::ChainAccess;
use crate::domain::entities::{Application, ApplicationStatus, Job, LegacyJob};
use crate::domain::value_objects::EtherAmount;
use crate::shared::AppError;
use alloy_primitives::Address;
use serde::Serialize;
use tracing::{debug, error, warn};

/// A job the account applied to, with that application's on-chain status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedJob {
    pub job: Job,
    pub status: ApplicationStatus,
}

/// Read-only contract access.
///
/// Missing configuration is an error; a failing provider is logged and reads come back
/// empty so views keep rendering.
pub struct ChainReader {
    access: ChainAccess,
    preferred_account: Option<Address>,
}

impl ChainReader {
    pub fn new(access: ChainAccess, preferred_account: Option<Address>) -> Self {
        Self {
            access,
            preferred_account,
        }
    }

    pub fn access(&self) -> &ChainAccess {
        &self.access
    }

    pub fn preferred_account(&self) -> Option<Address> {
        self.preferred_account
    }

    /// Requests wallet access and returns the first account.
    pub async fn connect_account(&self) -> Result<Option<Address>, AppError> {
        let (wallet, _) = self.access.ready()?;
        match wallet.request_accounts().await {
            Ok(accounts) => Ok(accounts.into_iter().next()),
            Err(err) => {
                error!(error = %err, "Failed to request accounts");
                Ok(None)
            }
        }
    }

    /// Configured account when set, otherwise the wallet's first account.
    pub async fn active_account(&self) -> Result<Option<Address>, AppError> {
        self.access.ready()?;
        if let Some(account) = self.preferred_account {
            return Ok(Some(account));
        }
        self.connect_account().await
    }

    pub async fn jobs(&self) -> Result<Vec<Job>, AppError> {
        let (_, contract) = self.access.ready()?;
        match contract.get_jobs().await {
            Ok(jobs) => {
                debug!(count = jobs.len(), "Fetched jobs");
                Ok(jobs)
            }
            Err(err) => {
                error!(error = %err, "Failed to fetch jobs");
                Ok(Vec::new())
            }
        }
    }

    pub async fn job(&self, job_id: u64) -> Result<Option<Job>, AppError> {
        Ok(self
            .jobs()
            .await?
            .into_iter()
            .find(|job| job.job_id == job_id))
    }

    pub async fn applications(&self, job_id: u64) -> Result<Vec<Application>, AppError> {
        let (_, contract) = self.access.ready()?;
        match contract.get_applications(job_id).await {
            Ok(applications) => Ok(applications),
            Err(err) => {
                error!(job_id, error = %err, "Failed to fetch applications");
                Ok(Vec::new())
            }
        }
    }

    /// Uses `getAppliedJobsWithStatus`, falling back to `getAppliedJobs` on contracts
    /// without it. Statuses missing from either source default to unreviewed/unaccepted
    /// and missing ids to the list position.
    pub async fn applied_jobs_with_status(
        &self,
        account: Address,
    ) -> Result<Vec<AppliedJob>, AppError> {
        let (_, contract) = self.access.ready()?;
        match contract.get_applied_jobs_with_status(account).await {
            Ok(result) => Ok(result
                .jobs
                .into_iter()
                .enumerate()
                .map(|(pos, mut job)| {
                    job.job_id = result.job_ids.get(pos).copied().unwrap_or(pos as u64);
                    AppliedJob {
                        job,
                        status: ApplicationStatus {
                            is_reviewed: result.reviewed.get(pos).copied().unwrap_or(false),
                            is_accepted: result.accepted.get(pos).copied().unwrap_or(false),
                        },
                    }
                })
                .collect()),
            Err(err) => {
                warn!(error = %err, "getAppliedJobsWithStatus unavailable, using getAppliedJobs");
                match contract.get_applied_jobs(account).await {
                    Ok(jobs) => Ok(jobs
                        .into_iter()
                        .enumerate()
                        .map(|(pos, mut job)| {
                            job.job_id = pos as u64;
                            AppliedJob {
                                job,
                                status: ApplicationStatus::default(),
                            }
                        })
                        .collect()),
                    Err(err) => {
                        error!(error = %err, "Failed to fetch applied jobs");
                        Ok(Vec::new())
                    }
                }
            }
        }
    }

    pub async fn job_budget(&self, job_id: u64) -> Result<Option<EtherAmount>, AppError> {
        let (_, contract) = self.access.ready()?;
        match contract.get_job_budget(job_id).await {
            Ok(wei) => Ok(Some(EtherAmount::from_wei(wei))),
            Err(err) => {
                error!(job_id, error = %err, "Failed to fetch job budget");
                Ok(None)
            }
        }
    }

    /// Jobs in the record shape of the first contract revision.
    pub async fn legacy_jobs(&self) -> Result<Vec<LegacyJob>, AppError> {
        let (_, contract) = self.access.ready()?;
        match contract.retrieve_all_jobs().await {
            Ok(jobs) => Ok(jobs),
            Err(err) => {
                error!(error = %err, "Failed to retrieve legacy jobs");
                Ok(Vec::new())
            }
        }
    }

    pub async fn balance(&self, address: Address) -> Result<Option<EtherAmount>, AppError> {
        let (wallet, _) = self.access.ready()?;
        match wallet.balance(address).await {
            Ok(wei) => Ok(Some(EtherAmount::from_wei(wei))),
            Err(err) => {
                error!(%address, error = %err, "Failed to fetch balance");
                Ok(None)
            }
        }
    }

    pub async fn chain_id(&self) -> Result<Option<u64>, AppError> {
        let (wallet, _) = self.access.ready()?;
        match wallet.chain_id().await {
            Ok(id) => Ok(Some(id)),
            Err(err) => {
                error!(error = %err, "Failed to fetch chain id");
                Ok(None)
            }
        }
    }
}
