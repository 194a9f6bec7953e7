use std::collections::HashMap;
use std::sync::Mutex;

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;

use crate::application::ports::marketplace_gateway::{
    AppliedJobsWithStatus, ContractCall, MarketplaceGateway,
};
use crate::application::ports::wallet_provider::{
    TransactionReceipt, TransactionRequest, WalletProvider,
};
use crate::domain::entities::{Application, Job, LegacyJob};
use crate::domain::value_objects::EtherAmount;
use crate::shared::ProviderError;

#[derive(Default)]
pub struct ChainState {
    pub accounts: Vec<Address>,
    pub chain_id: u64,
    pub jobs: Vec<Job>,
    pub applications: HashMap<u64, Vec<Application>>,
    pub balances: HashMap<Address, U256>,
    pub has_code: bool,
    pub status_helper_missing: bool,
    pub reads_fail: bool,
    pub estimate: Option<u64>,
    pub submit_error: Option<ProviderError>,
    pub revert_on_receipt: bool,
    pub gas_price: U256,
    pub sent: Vec<(Address, ContractCall, u64)>,
    pub transfers: Vec<TransactionRequest>,
    next_hash: u8,
}

/// In-memory contract and wallet. One instance serves both ports.
pub struct FakeChain {
    contract: Address,
    pub state: Mutex<ChainState>,
}

impl FakeChain {
    pub fn new(contract: Address) -> Self {
        Self {
            contract,
            state: Mutex::new(ChainState {
                chain_id: 1337,
                has_code: true,
                estimate: Some(100_000),
                gas_price: U256::from(1_000_000_000u64),
                ..ChainState::default()
            }),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut ChainState) -> R) -> R {
        let mut guard = self.state.lock().unwrap();
        f(&mut guard)
    }

    fn read_guard(&self) -> Result<std::sync::MutexGuard<'_, ChainState>, ProviderError> {
        let guard = self.state.lock().unwrap();
        if guard.reads_fail {
            return Err(ProviderError::new("could not detect network"));
        }
        Ok(guard)
    }

    fn next_hash(state: &mut ChainState) -> B256 {
        state.next_hash = state.next_hash.wrapping_add(1);
        B256::repeat_byte(state.next_hash)
    }

    fn apply(&self, state: &mut ChainState, from: Address, call: &ContractCall) {
        match call {
            ContractCall::PostJob(job) => {
                let job_id = state.jobs.len() as u64;
                state.jobs.push(Job {
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
                if let Some(existing) = state.jobs.get_mut(*job_id as usize) {
                    existing.title = job.title.clone();
                    existing.budget = job.budget;
                    existing.deadline = job.deadline;
                }
            }
            ContractCall::ApplyForJob {
                job_id,
                application,
            } => {
                let list = state.applications.entry(*job_id).or_default();
                list.push(Application {
                    index: list.len() as u64,
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
                if let Some(app) = state
                    .applications
                    .get_mut(job_id)
                    .and_then(|list| list.get_mut(*application_index as usize))
                {
                    app.is_reviewed = true;
                    app.is_accepted = *approve;
                }
                if *approve {
                    if let Some(job) = state.jobs.get_mut(*job_id as usize) {
                        job.is_approved = true;
                        let budget = job.budget.wei();
                        let contract = self.contract;
                        let balance = state.balances.entry(contract).or_default();
                        *balance = balance.saturating_sub(budget);
                    }
                }
            }
            ContractCall::SubmitWork { job_id, work_url } => {
                if let Some(job) = state.jobs.get_mut(*job_id as usize) {
                    job.work_url = work_url.clone();
                }
            }
        }
    }
}

#[async_trait]
impl WalletProvider for FakeChain {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        Ok(self.read_guard()?.accounts.clone())
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        Ok(self.read_guard()?.chain_id)
    }

    async fn balance(&self, address: Address) -> Result<U256, ProviderError> {
        Ok(self
            .read_guard()?
            .balances
            .get(&address)
            .copied()
            .unwrap_or_default())
    }

    async fn code_at(&self, _address: Address) -> Result<Bytes, ProviderError> {
        let has_code = self.read_guard()?.has_code;
        Ok(if has_code {
            Bytes::from_static(&[0x60, 0x80])
        } else {
            Bytes::new()
        })
    }

    async fn gas_price(&self) -> Result<U256, ProviderError> {
        Ok(self.read_guard()?.gas_price)
    }

    async fn estimate_gas(&self, _tx: &TransactionRequest) -> Result<u64, ProviderError> {
        Ok(21_000)
    }

    async fn call(&self, _tx: &TransactionRequest) -> Result<Bytes, ProviderError> {
        Ok(Bytes::new())
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256, ProviderError> {
        let mut state = self.state.lock().unwrap();
        if let (Some(from), Some(to)) = (tx.from, tx.to) {
            let from_balance = state.balances.entry(from).or_default();
            *from_balance = from_balance.saturating_sub(tx.value);
            let to_balance = state.balances.entry(to).or_default();
            *to_balance = to_balance.saturating_add(tx.value);
        }
        state.transfers.push(tx.clone());
        Ok(Self::next_hash(&mut state))
    }

    async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, ProviderError> {
        let state = self.state.lock().unwrap();
        Ok(Some(TransactionReceipt {
            transaction_hash: hash,
            block_number: Some(1),
            status: !state.revert_on_receipt,
        }))
    }
}

#[async_trait]
impl MarketplaceGateway for FakeChain {
    fn contract_address(&self) -> Address {
        self.contract
    }

    async fn get_jobs(&self) -> Result<Vec<Job>, ProviderError> {
        Ok(self.read_guard()?.jobs.clone())
    }

    async fn get_applications(&self, job_id: u64) -> Result<Vec<Application>, ProviderError> {
        Ok(self
            .read_guard()?
            .applications
            .get(&job_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_applied_jobs_with_status(
        &self,
        account: Address,
    ) -> Result<AppliedJobsWithStatus, ProviderError> {
        let state = self.read_guard()?;
        if state.status_helper_missing {
            return Err(ProviderError::new("call revert exception"));
        }
        let mut result = AppliedJobsWithStatus::default();
        for job in &state.jobs {
            let apps = state.applications.get(&job.job_id);
            if let Some(app) = apps.and_then(|list| list.iter().find(|a| a.applicant == account))
            {
                result.jobs.push(job.clone());
                result.reviewed.push(app.is_reviewed);
                result.accepted.push(app.is_accepted);
                result.job_ids.push(job.job_id);
            }
        }
        Ok(result)
    }

    async fn get_applied_jobs(&self, account: Address) -> Result<Vec<Job>, ProviderError> {
        let state = self.read_guard()?;
        Ok(state
            .jobs
            .iter()
            .filter(|job| {
                state
                    .applications
                    .get(&job.job_id)
                    .is_some_and(|list| list.iter().any(|a| a.applicant == account))
            })
            .cloned()
            .collect())
    }

    async fn get_job_budget(&self, job_id: u64) -> Result<U256, ProviderError> {
        self.read_guard()?
            .jobs
            .get(job_id as usize)
            .map(|job| job.budget.wei())
            .ok_or_else(|| ProviderError::new("execution reverted: Invalid job ID"))
    }

    async fn retrieve_all_jobs(&self) -> Result<Vec<LegacyJob>, ProviderError> {
        Ok(self
            .read_guard()?
            .jobs
            .iter()
            .enumerate()
            .map(|(index, job)| LegacyJob {
                job_id: job.job_id,
                client: job.job_poster,
                description: job.short_description.clone(),
                budget: job.budget,
                freelancer: Address::ZERO,
                is_completed: job.is_completed,
                submitted_work: job.work_url.clone(),
                index,
            })
            .collect())
    }

    async fn estimate(&self, _from: Address, _call: &ContractCall) -> Result<u64, ProviderError> {
        self.state
            .lock()
            .unwrap()
            .estimate
            .ok_or_else(|| ProviderError::new("cannot estimate gas"))
    }

    async fn submit(
        &self,
        from: Address,
        call: &ContractCall,
        gas: u64,
    ) -> Result<B256, ProviderError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.submit_error.clone() {
            return Err(err);
        }
        state.sent.push((from, call.clone(), gas));
        self.apply(&mut state, from, call);
        Ok(Self::next_hash(&mut state))
    }
}

pub fn ether(value: &str) -> U256 {
    EtherAmount::parse(value).map(|e| e.wei()).unwrap_or_default()
}
