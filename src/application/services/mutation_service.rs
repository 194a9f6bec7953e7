use super::chain_access::ChainAccess;
use super::notification_bus::{BusEvent, NotificationBus};
use super::side_store::LocalSideStore;
use crate::application::ports::marketplace_gateway::ContractCall;
use crate::application::ports::wallet_provider::{
    TransactionReceipt, TransactionRequest, WalletProvider,
};
use crate::domain::entities::{
    Application, ApplicationDraft, FeedbackDraft, FeedbackEntry, FeedbackRecord, Job, JobDraft,
    Profile, SubmittedWork,
};
use crate::domain::value_objects::store_key::canonical_address;
use crate::domain::value_objects::{EtherAmount, FailureReason, Operation, TransactionFailure};
use crate::shared::config::ChainConfig;
use crate::shared::{AppError, ProviderError};
use alloy_primitives::{Address, B256, U256};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

/// Gas limit used for job writes when estimation fails.
pub const JOB_WRITE_FALLBACK_GAS: u64 = 3_000_000;
/// Gas limit used for reviews and work submission when estimation fails.
pub const REVIEW_FALLBACK_GAS: u64 = 300_000;

/// Estimate plus 20 %.
pub fn buffered_gas(estimate: u64) -> u64 {
    estimate.saturating_mul(120) / 100
}

#[derive(Debug, Clone)]
pub struct MutationSettings {
    pub expected_chain_ids: Vec<u64>,
    pub confirmation_poll: Duration,
    pub confirmation_timeout: Duration,
}

impl From<&ChainConfig> for MutationSettings {
    fn from(config: &ChainConfig) -> Self {
        Self {
            expected_chain_ids: config.expected_chain_ids.clone(),
            confirmation_poll: Duration::from_millis(config.confirmation_poll_ms),
            confirmation_timeout: Duration::from_secs(config.confirmation_timeout_secs),
        }
    }
}

/// A confirmed state-changing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutcome {
    pub operation: Operation,
    pub transaction_hash: B256,
    pub gas_limit: u64,
    pub block_number: Option<u64>,
    /// Transfer sent to top up the contract before an approval.
    pub funding_transaction: Option<B256>,
}

/// Every write path: contract transactions and side-store updates.
///
/// Inputs are validated before anything touches the network; chain preconditions are
/// checked before inputs.
pub struct MutationService {
    access: ChainAccess,
    side_store: Arc<LocalSideStore>,
    bus: Arc<NotificationBus>,
    settings: MutationSettings,
}

impl MutationService {
    pub fn new(
        access: ChainAccess,
        side_store: Arc<LocalSideStore>,
        bus: Arc<NotificationBus>,
        settings: MutationSettings,
    ) -> Self {
        Self {
            access,
            side_store,
            bus,
            settings,
        }
    }

    pub async fn post_job(
        &self,
        account: Address,
        draft: &JobDraft,
    ) -> Result<TransactionOutcome, AppError> {
        self.access.ready()?;
        let job = draft.validate(Utc::now().timestamp())?;
        info!(%account, title = %job.title, budget = %job.budget, "Posting job");
        self.execute(
            Operation::PostJob,
            account,
            ContractCall::PostJob(job),
            JOB_WRITE_FALLBACK_GAS,
        )
        .await
    }

    pub async fn edit_job(
        &self,
        account: Address,
        job_id: u64,
        draft: &JobDraft,
    ) -> Result<TransactionOutcome, AppError> {
        self.access.ready()?;
        let job = draft.validate(Utc::now().timestamp())?;
        info!(%account, job_id, "Editing job");
        self.execute(
            Operation::EditJob,
            account,
            ContractCall::EditJob { job_id, job },
            JOB_WRITE_FALLBACK_GAS,
        )
        .await
    }

    pub async fn apply_for_job(
        &self,
        account: Address,
        job_id: u64,
        draft: &ApplicationDraft,
    ) -> Result<TransactionOutcome, AppError> {
        self.access.ready()?;
        draft.validate()?;
        let application = ApplicationDraft {
            name: draft.name.trim().to_string(),
            previous_work_link: draft.previous_work_link.trim().to_string(),
            project_link: draft.project_link.trim().to_string(),
        };
        info!(%account, job_id, "Applying for job");
        self.execute(
            Operation::ApplyForJob,
            account,
            ContractCall::ApplyForJob {
                job_id,
                application,
            },
            JOB_WRITE_FALLBACK_GAS,
        )
        .await
    }

    /// Accepts an application and pays the freelancer through the contract.
    ///
    /// When the contract holds less than the job budget it is topped up from `account`
    /// first. The work URL passed along is the recorded submission, else the application's
    /// project link.
    pub async fn approve_application(
        &self,
        account: Address,
        job_id: u64,
        application_index: u64,
    ) -> Result<TransactionOutcome, AppError> {
        const OP: Operation = Operation::ApproveApplication;
        let (wallet, contract) = self.access.ready()?;
        let contract_address = contract.contract_address();

        let code = wallet
            .code_at(contract_address)
            .await
            .map_err(|err| TransactionFailure::classify(OP, &err))?;
        if code.is_empty() {
            return Err(TransactionFailure::new(
                OP,
                FailureReason::Other(format!(
                    "No contract found at address {contract_address}. Please verify the contract is deployed."
                )),
            )
            .into());
        }

        let applications = contract
            .get_applications(job_id)
            .await
            .map_err(|err| TransactionFailure::classify(OP, &err))?;
        let application = usize::try_from(application_index)
            .ok()
            .and_then(|idx| applications.get(idx))
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

        let budget = contract
            .get_job_budget(job_id)
            .await
            .map_err(|err| TransactionFailure::classify(OP, &err))?;
        let work_url = self.resolve_work_url(job_id, application).await?;
        debug!(job_id, application_index, budget = %EtherAmount::from_wei(budget), "Approving application");

        let contract_balance = wallet
            .balance(contract_address)
            .await
            .map_err(|err| TransactionFailure::classify(OP, &err))?;
        let funding_transaction = if contract_balance < budget {
            info!(
                contract_balance = %EtherAmount::from_wei(contract_balance),
                required = %EtherAmount::from_wei(budget),
                "Contract needs funding before approval"
            );
            Some(
                self.fund_contract(wallet.as_ref(), account, contract_address, budget)
                    .await?,
            )
        } else {
            None
        };

        let mut outcome = self
            .execute(
                OP,
                account,
                ContractCall::ReviewWork {
                    job_id,
                    application_index,
                    approve: true,
                    work_url,
                },
                REVIEW_FALLBACK_GAS,
            )
            .await?;
        outcome.funding_transaction = funding_transaction;
        Ok(outcome)
    }

    pub async fn deny_application(
        &self,
        account: Address,
        job_id: u64,
        application_index: u64,
    ) -> Result<TransactionOutcome, AppError> {
        self.access.ready()?;
        info!(%account, job_id, application_index, "Denying application");
        self.execute(
            Operation::DenyApplication,
            account,
            ContractCall::ReviewWork {
                job_id,
                application_index,
                approve: false,
                work_url: String::new(),
            },
            REVIEW_FALLBACK_GAS,
        )
        .await
    }

    /// Records a work link locally; the chain is not touched.
    pub async fn submit_work(
        &self,
        account: Address,
        job_id: u64,
        work_url: &str,
    ) -> Result<SubmittedWork, AppError> {
        let work = SubmittedWork::new(job_id, account, work_url)?;
        let key = self.side_store.record_submitted_work(&work).await?;
        info!(key = %key, "Recorded submitted work");
        self.bus.publish(BusEvent::WorkSubmitted {
            job_id,
            applicant: account,
            work_url: work.work_url.clone(),
        });
        self.bus.publish(BusEvent::StorageChanged {
            key: key.as_str().to_string(),
        });
        Ok(work)
    }

    /// Submits a work link through the contract's legacy `submitWork`.
    pub async fn submit_work_on_chain(
        &self,
        account: Address,
        job_id: u64,
        work_url: &str,
    ) -> Result<TransactionOutcome, AppError> {
        self.access.ready()?;
        let work = SubmittedWork::new(job_id, account, work_url)?;
        self.execute(
            Operation::SubmitWork,
            account,
            ContractCall::SubmitWork {
                job_id,
                work_url: work.work_url,
            },
            REVIEW_FALLBACK_GAS,
        )
        .await
    }

    /// Stores a rating for the freelancer of `application` and appends it to their profile.
    pub async fn submit_feedback(
        &self,
        poster: Address,
        job: &Job,
        application: &Application,
        draft: &FeedbackDraft,
    ) -> Result<FeedbackRecord, AppError> {
        draft.validate()?;
        if !job.is_posted_by(&poster) {
            return Err(AppError::ValidationError(
                "Only the job poster can leave feedback".to_string(),
            ));
        }
        if !application.is_accepted {
            return Err(AppError::ValidationError(
                "No accepted application found".to_string(),
            ));
        }

        let record = FeedbackRecord {
            job_id: job.job_id,
            job_title: job.display_title().to_string(),
            applicant: application.applicant,
            applicant_name: application.name.clone(),
            feedback: draft.text.trim().to_string(),
            rating: draft.rating,
            submitted_at: Utc::now(),
            submitted_by: poster,
        };
        let entry = FeedbackEntry {
            job_title: record.job_title.clone(),
            rating: record.rating,
            date: record.submitted_at,
            text: record.feedback.clone(),
        };
        let profile_key = self
            .side_store
            .append_profile_feedback(&application.applicant, &entry)
            .await?;
        let feedback_key = self.side_store.record_feedback(&record).await?;
        info!(feedback_key = %feedback_key, profile_key = %profile_key, "Feedback saved");

        self.bus.publish(BusEvent::FeedbackSubmitted {
            applicant: application.applicant,
            applicant_lower: canonical_address(&application.applicant),
            job_id: job.job_id,
        });
        self.bus.publish(BusEvent::StorageChanged { key: profile_key });
        Ok(record)
    }

    /// Replaces the stored profile. Feedback written by clients is carried over untouched.
    pub async fn save_profile(
        &self,
        account: Address,
        profile: &Profile,
    ) -> Result<Profile, AppError> {
        let mut profile = profile.clone();
        profile.feedback = self.side_store.stored_feedback(&account).await?;
        self.side_store.save_profile(&account, &profile).await?;

        self.bus.publish(BusEvent::ProfileUpdated { account });
        self.bus.publish(BusEvent::StorageChanged {
            key: crate::domain::value_objects::StoreKey::profile(&account)
                .as_str()
                .to_string(),
        });
        Ok(profile)
    }

    async fn resolve_work_url(
        &self,
        job_id: u64,
        application: &Application,
    ) -> Result<String, AppError> {
        if let Some(url) = self
            .side_store
            .submitted_work(job_id, &application.applicant)
            .await?
        {
            return Ok(url);
        }
        Ok(application.project_link.trim().to_string())
    }

    async fn execute(
        &self,
        operation: Operation,
        account: Address,
        call: ContractCall,
        fallback_gas: u64,
    ) -> Result<TransactionOutcome, AppError> {
        let (wallet, contract) = self.access.ready()?;
        self.check_network(wallet.as_ref()).await;

        let gas_limit = match contract.estimate(account, &call).await {
            Ok(estimate) => buffered_gas(estimate),
            Err(err) => {
                warn!(call = call.name(), error = %err, fallback_gas, "Gas estimation failed, using fallback");
                fallback_gas
            }
        };

        let transaction_hash = contract
            .submit(account, &call, gas_limit)
            .await
            .map_err(|err| {
                warn!(call = call.name(), error = %err, "Transaction failed");
                TransactionFailure::classify(operation, &err)
            })?;
        info!(call = call.name(), tx = %transaction_hash, gas_limit, "Transaction sent");

        let receipt = self
            .wait_for_receipt(operation, wallet.as_ref(), transaction_hash)
            .await?;
        self.bus.publish(BusEvent::ChainUpdated {
            operation,
            transaction_hash,
        });

        Ok(TransactionOutcome {
            operation,
            transaction_hash,
            gas_limit,
            block_number: receipt.block_number,
            funding_transaction: None,
        })
    }

    async fn fund_contract(
        &self,
        wallet: &dyn WalletProvider,
        account: Address,
        contract_address: Address,
        amount: U256,
    ) -> Result<B256, AppError> {
        const OP: Operation = Operation::ApproveApplication;
        let transfer = TransactionRequest::transfer(account, contract_address, amount);

        let gas = wallet
            .estimate_gas(&transfer)
            .await
            .map_err(funding_failure)?;
        let gas_price = wallet.gas_price().await.map_err(funding_failure)?;
        let user_balance = wallet.balance(account).await.map_err(funding_failure)?;
        let total_cost = amount.saturating_add(U256::from(gas).saturating_mul(gas_price));
        if user_balance < total_cost {
            warn!(
                needed = %EtherAmount::from_wei(total_cost),
                available = %EtherAmount::from_wei(user_balance),
                "Insufficient funds to fund contract"
            );
            return Err(TransactionFailure::new(OP, FailureReason::InsufficientFunds).into());
        }

        let hash = wallet
            .send_transaction(
                &transfer
                    .with_gas(buffered_gas(gas))
                    .with_gas_price(gas_price),
            )
            .await
            .map_err(funding_failure)?;
        info!(tx = %hash, "Funding transaction sent");
        self.wait_for_receipt(OP, wallet, hash).await?;
        Ok(hash)
    }

    /// Polls until the transaction has one confirmation.
    async fn wait_for_receipt(
        &self,
        operation: Operation,
        wallet: &dyn WalletProvider,
        hash: B256,
    ) -> Result<TransactionReceipt, AppError> {
        let deadline = Instant::now() + self.settings.confirmation_timeout;
        loop {
            match wallet.transaction_receipt(hash).await {
                Ok(Some(receipt)) if receipt.status => return Ok(receipt),
                Ok(Some(_)) => {
                    return Err(TransactionFailure::new(operation, FailureReason::Reverted).into());
                }
                Ok(None) => {}
                Err(err) => debug!(tx = %hash, error = %err, "Receipt not available yet"),
            }
            if Instant::now() >= deadline {
                return Err(AppError::Network(format!(
                    "Timed out waiting for confirmation of {hash}"
                )));
            }
            sleep(self.settings.confirmation_poll).await;
        }
    }

    async fn check_network(&self, wallet: &dyn WalletProvider) {
        match wallet.chain_id().await {
            Ok(chain_id) if !self.settings.expected_chain_ids.contains(&chain_id) => {
                warn!(
                    chain_id,
                    expected = ?self.settings.expected_chain_ids,
                    "Wallet is connected to an unexpected network"
                );
            }
            Ok(_) => {}
            Err(err) => debug!(error = %err, "Could not read chain id"),
        }
    }
}

fn funding_failure(err: ProviderError) -> AppError {
    let reason = if err.is_user_rejection() {
        FailureReason::UserRejected
    } else {
        FailureReason::Other(format!("Failed to fund contract: {}", err.raw_message()))
    };
    TransactionFailure::new(Operation::ApproveApplication, reason).into()
}
