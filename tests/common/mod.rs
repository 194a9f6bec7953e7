#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use chainwork_lib::application::ports::marketplace_gateway::{
    AppliedJobsWithStatus, ContractCall, MarketplaceGateway,
};
use chainwork_lib::application::ports::wallet_provider::{
    TransactionReceipt, TransactionRequest, WalletProvider,
};
use chainwork_lib::application::services::ChainAccess;
use chainwork_lib::domain::entities::{Application, Job, LegacyJob};
use chainwork_lib::domain::value_objects::EtherAmount;
use chainwork_lib::infrastructure::storage::SqliteKeyValueStore;
use chainwork_lib::shared::ProviderError;
use chainwork_lib::{AppConfig, AppState};

pub const POSTER: &str = "0x1111111111111111111111111111111111111111";
pub const FREELANCER: &str = "0x2222222222222222222222222222222222222222";

pub fn address(raw: &str) -> Address {
    raw.parse().unwrap()
}

pub fn wei(eth: &str) -> U256 {
    EtherAmount::parse(eth).unwrap().wei()
}

#[derive(Default)]
pub struct Ledger {
    pub jobs: Vec<Job>,
    pub applications: HashMap<u64, Vec<Application>>,
    pub balances: HashMap<Address, U256>,
    pub calls: Vec<(Address, ContractCall)>,
    pub fail_reads: bool,
    pub reject_next: Option<ProviderError>,
    blocks: u64,
}

/// Local development chain with the marketplace deployed at `contract`.
pub struct DevChain {
    pub contract: Address,
    pub ledger: Mutex<Ledger>,
}

impl DevChain {
    pub fn new() -> Arc<Self> {
        let chain = Self {
            contract: Address::repeat_byte(0xcc),
            ledger: Mutex::new(Ledger::default()),
        };
        chain.fund(address(POSTER), "10");
        chain.fund(address(FREELANCER), "1");
        Arc::new(chain)
    }

    pub fn fund(&self, account: Address, eth: &str) {
        self.ledger.lock().unwrap().balances.insert(account, wei(eth));
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.ledger
            .lock()
            .unwrap()
            .balances
            .get(&account)
            .copied()
            .unwrap_or_default()
    }

    pub fn access(self: &Arc<Self>) -> ChainAccess {
        ChainAccess::Ready {
            wallet: self.clone(),
            contract: self.clone(),
        }
    }

    fn mine(ledger: &mut Ledger) -> B256 {
        ledger.blocks += 1;
        B256::with_last_byte(ledger.blocks as u8)
    }

    fn readable(&self) -> Result<std::sync::MutexGuard<'_, Ledger>, ProviderError> {
        let ledger = self.ledger.lock().unwrap();
        if ledger.fail_reads {
            return Err(ProviderError::new("could not detect network"));
        }
        Ok(ledger)
    }
}

/// App state acting as `account`, backed by an in-memory side store.
pub async fn app_for(chain: &Arc<DevChain>, account: &str) -> AppState {
    let store = Arc::new(SqliteKeyValueStore::in_memory().await.unwrap());
    app_with_store(chain, account, store)
}

pub fn app_with_store(
    chain: &Arc<DevChain>,
    account: &str,
    store: Arc<SqliteKeyValueStore>,
) -> AppState {
    let mut config = AppConfig::default();
    config.chain.contract_address = chain.contract.to_string();
    config.chain.account = Some(account.to_string());
    config.chain.confirmation_poll_ms = 1;
    AppState::from_parts(config, store, chain.access())
}

#[async_trait]
impl WalletProvider for DevChain {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        Ok(vec![address(POSTER), address(FREELANCER)])
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        Ok(31337)
    }

    async fn balance(&self, account: Address) -> Result<U256, ProviderError> {
        Ok(self.readable()?.balances.get(&account).copied().unwrap_or_default())
    }

    async fn code_at(&self, _address: Address) -> Result<Bytes, ProviderError> {
        Ok(Bytes::from_static(&[0x60, 0x80, 0x60, 0x40]))
    }

    async fn gas_price(&self) -> Result<U256, ProviderError> {
        Ok(U256::from(2_000_000_000u64))
    }

    async fn estimate_gas(&self, _tx: &TransactionRequest) -> Result<u64, ProviderError> {
        Ok(21_000)
    }

    async fn call(&self, _tx: &TransactionRequest) -> Result<Bytes, ProviderError> {
        Ok(Bytes::new())
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256, ProviderError> {
        let mut ledger = self.ledger.lock().unwrap();
        if let (Some(from), Some(to)) = (tx.from, tx.to) {
            let sender = ledger.balances.entry(from).or_default();
            *sender = sender.saturating_sub(tx.value);
            let receiver = ledger.balances.entry(to).or_default();
            *receiver += tx.value;
        }
        Ok(Self::mine(&mut ledger))
    }

    async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, ProviderError> {
        Ok(Some(TransactionReceipt {
            transaction_hash: hash,
            block_number: Some(self.ledger.lock().unwrap().blocks),
            status: true,
        }))
    }
}

#[async_trait]
impl MarketplaceGateway for DevChain {
    fn contract_address(&self) -> Address {
        self.contract
    }

    async fn get_jobs(&self) -> Result<Vec<Job>, ProviderError> {
        Ok(self.readable()?.jobs.clone())
    }

    async fn get_applications(&self, job_id: u64) -> Result<Vec<Application>, ProviderError> {
        Ok(self
            .readable()?
            .applications
            .get(&job_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_applied_jobs_with_status(
        &self,
        account: Address,
    ) -> Result<AppliedJobsWithStatus, ProviderError> {
        let ledger = self.readable()?;
        let mut out = AppliedJobsWithStatus::default();
        for job in &ledger.jobs {
            let Some(app) = ledger
                .applications
                .get(&job.job_id)
                .and_then(|apps| apps.iter().find(|a| a.applicant == account))
            else {
                continue;
            };
            out.jobs.push(job.clone());
            out.reviewed.push(app.is_reviewed);
            out.accepted.push(app.is_accepted);
            out.job_ids.push(job.job_id);
        }
        Ok(out)
    }

    async fn get_applied_jobs(&self, account: Address) -> Result<Vec<Job>, ProviderError> {
        Ok(self
            .get_applied_jobs_with_status(account)
            .await?
            .jobs)
    }

    async fn get_job_budget(&self, job_id: u64) -> Result<U256, ProviderError> {
        self.readable()?
            .jobs
            .get(job_id as usize)
            .map(|job| job.budget.wei())
            .ok_or_else(|| ProviderError::new("execution reverted: Invalid job ID"))
    }

    async fn retrieve_all_jobs(&self) -> Result<Vec<LegacyJob>, ProviderError> {
        Ok(Vec::new())
    }

    async fn estimate(&self, _from: Address, _call: &ContractCall) -> Result<u64, ProviderError> {
        Ok(150_000)
    }

    async fn submit(
        &self,
        from: Address,
        call: &ContractCall,
        _gas: u64,
    ) -> Result<B256, ProviderError> {
        let mut ledger = self.ledger.lock().unwrap();
        if let Some(err) = ledger.reject_next.take() {
            return Err(err);
        }
        ledger.calls.push((from, call.clone()));
        match call {
            ContractCall::PostJob(job) => {
                let job_id = ledger.jobs.len() as u64;
                ledger.jobs.push(Job {
                    job_id,
                    job_poster: from,
                    title: job.title.clone(),
                    short_description: job.short_description.clone(),
                    detailed_description: job.detailed_description.clone(),
                    budget: job.budget,
                    deadline: job.deadline,
                    image: job.image.clone(),
                    work_url: job.work_url.clone(),
                    is_completed: false,
                    is_approved: false,
                });
            }
            ContractCall::EditJob { job_id, job } => {
                if let Some(existing) = ledger.jobs.get_mut(*job_id as usize) {
                    existing.title = job.title.clone();
                    existing.short_description = job.short_description.clone();
                    existing.budget = job.budget;
                    existing.deadline = job.deadline;
                }
            }
            ContractCall::ApplyForJob {
                job_id,
                application,
            } => {
                let apps = ledger.applications.entry(*job_id).or_default();
                apps.push(Application {
                    index: apps.len() as u64,
                    applicant: from,
                    name: application.name.clone(),
                    previous_work_link: application.previous_work_link.clone(),
                    project_link: application.project_link.clone(),
                    is_reviewed: false,
                    is_accepted: false,
                });
            }
            ContractCall::ReviewWork {
                job_id,
                application_index,
                approve,
                ..
            } => {
                let mut paid = None;
                if let Some(app) = ledger
                    .applications
                    .get_mut(job_id)
                    .and_then(|apps| apps.get_mut(*application_index as usize))
                {
                    app.is_reviewed = true;
                    app.is_accepted = *approve;
                    paid = approve.then_some(app.applicant);
                }
                if let Some(freelancer) = paid {
                    let budget = ledger.jobs[*job_id as usize].budget.wei();
                    ledger.jobs[*job_id as usize].is_approved = true;
                    let contract = self.contract;
                    let escrow = ledger.balances.entry(contract).or_default();
                    *escrow = escrow.saturating_sub(budget);
                    *ledger.balances.entry(freelancer).or_default() += budget;
                }
            }
            ContractCall::SubmitWork { job_id, work_url } => {
                if let Some(job) = ledger.jobs.get_mut(*job_id as usize) {
                    job.work_url = work_url.clone();
                }
            }
        }
        Ok(Self::mine(&mut ledger))
    }
}
