use super::abi::{
    application_into_domain, encode_call, job_into_domain, legacy_job_into_domain, u256_to_u64,
    FreelanceMarketplace as M,
};
use crate::application::ports::marketplace_gateway::{
    AppliedJobsWithStatus, ContractCall, MarketplaceGateway,
};
use crate::application::ports::wallet_provider::{TransactionRequest, WalletProvider};
use crate::domain::entities::{Application, Job, LegacyJob};
use crate::shared::ProviderError;
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use std::sync::Arc;

/// Marketplace contract reached through a wallet provider.
pub struct ContractGateway {
    address: Address,
    wallet: Arc<dyn WalletProvider>,
}

impl ContractGateway {
    pub fn new(address: Address, wallet: Arc<dyn WalletProvider>) -> Self {
        Self { address, wallet }
    }

    async fn view<C: SolCall>(&self, call: C) -> Result<C::Return, ProviderError> {
        let data = self
            .wallet
            .call(&TransactionRequest::call(
                self.address,
                Bytes::from(call.abi_encode()),
            ))
            .await?;
        C::abi_decode_returns(&data, true).map_err(|err| {
            ProviderError::new(format!("failed to decode {} result: {err}", C::SIGNATURE))
        })
    }

    fn transaction(&self, from: Address, call: &ContractCall) -> TransactionRequest {
        TransactionRequest::call(self.address, Bytes::from(encode_call(call))).with_from(from)
    }
}

#[async_trait]
impl MarketplaceGateway for ContractGateway {
    fn contract_address(&self) -> Address {
        self.address
    }

    async fn get_jobs(&self) -> Result<Vec<Job>, ProviderError> {
        let jobs = self.view(M::getJobsCall {}).await?._0;
        Ok(jobs
            .into_iter()
            .enumerate()
            .map(|(idx, job)| job_into_domain(idx as u64, job))
            .collect())
    }

    async fn get_applications(&self, job_id: u64) -> Result<Vec<Application>, ProviderError> {
        let apps = self
            .view(M::getApplicationsCall {
                jobId: U256::from(job_id),
            })
            .await?
            ._0;
        Ok(apps
            .into_iter()
            .enumerate()
            .map(|(idx, app)| application_into_domain(idx as u64, app))
            .collect())
    }

    async fn get_applied_jobs_with_status(
        &self,
        account: Address,
    ) -> Result<AppliedJobsWithStatus, ProviderError> {
        let result = self
            .view(M::getAppliedJobsWithStatusCall { applicant: account })
            .await?;
        Ok(AppliedJobsWithStatus {
            jobs: result
                .jobs
                .into_iter()
                .enumerate()
                .map(|(idx, job)| job_into_domain(idx as u64, job))
                .collect(),
            reviewed: result.reviewed,
            accepted: result.accepted,
            job_ids: result.jobIds.into_iter().map(u256_to_u64).collect(),
        })
    }

    async fn get_applied_jobs(&self, account: Address) -> Result<Vec<Job>, ProviderError> {
        let jobs = self
            .view(M::getAppliedJobsCall { applicant: account })
            .await?
            ._0;
        Ok(jobs
            .into_iter()
            .enumerate()
            .map(|(idx, job)| job_into_domain(idx as u64, job))
            .collect())
    }

    async fn get_job_budget(&self, job_id: u64) -> Result<U256, ProviderError> {
        Ok(self
            .view(M::getJobBudgetCall {
                jobId: U256::from(job_id),
            })
            .await?
            ._0)
    }

    async fn retrieve_all_jobs(&self) -> Result<Vec<LegacyJob>, ProviderError> {
        let jobs = self.view(M::retrieveAllJobsCall {}).await?._0;
        Ok(jobs
            .into_iter()
            .enumerate()
            .map(|(idx, job)| legacy_job_into_domain(idx, job))
            .collect())
    }

    async fn estimate(&self, from: Address, call: &ContractCall) -> Result<u64, ProviderError> {
        self.wallet.estimate_gas(&self.transaction(from, call)).await
    }

    async fn submit(
        &self,
        from: Address,
        call: &ContractCall,
        gas: u64,
    ) -> Result<B256, ProviderError> {
        self.wallet
            .send_transaction(&self.transaction(from, call).with_gas(gas))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::wallet_provider::TransactionReceipt;
    use crate::infrastructure::chain::abi;
    use alloy_sol_types::SolValue;
    use std::sync::Mutex;

    /// Answers `eth_call` with canned return data and records sent transactions.
    struct ScriptedWallet {
        call_result: Mutex<Result<Bytes, ProviderError>>,
        sent: Mutex<Vec<TransactionRequest>>,
    }

    impl ScriptedWallet {
        fn returning(data: Vec<u8>) -> Self {
            Self {
                call_result: Mutex::new(Ok(Bytes::from(data))),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl WalletProvider for ScriptedWallet {
        async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
            Ok(Vec::new())
        }
        async fn chain_id(&self) -> Result<u64, ProviderError> {
            Ok(1337)
        }
        async fn balance(&self, _address: Address) -> Result<U256, ProviderError> {
            Ok(U256::ZERO)
        }
        async fn code_at(&self, _address: Address) -> Result<Bytes, ProviderError> {
            Ok(Bytes::new())
        }
        async fn gas_price(&self) -> Result<U256, ProviderError> {
            Ok(U256::from(1u64))
        }
        async fn estimate_gas(&self, _tx: &TransactionRequest) -> Result<u64, ProviderError> {
            Ok(50_000)
        }
        async fn call(&self, _tx: &TransactionRequest) -> Result<Bytes, ProviderError> {
            self.call_result.lock().unwrap().clone()
        }
        async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256, ProviderError> {
            self.sent.lock().unwrap().push(tx.clone());
            Ok(B256::repeat_byte(7))
        }
        async fn transaction_receipt(
            &self,
            _hash: B256,
        ) -> Result<Option<TransactionReceipt>, ProviderError> {
            Ok(None)
        }
    }

    fn abi_job(title: &str) -> abi::Job {
        abi::Job {
            jobPoster: Address::repeat_byte(9),
            title: title.to_string(),
            shortDescription: "short".into(),
            detailedDescription: "long".into(),
            budget: U256::from(1_000_000_000_000_000u64),
            deadline: U256::from(2_000_000_000u64),
            image: String::new(),
            workUrl: String::new(),
            isCompleted: false,
            isApproved: false,
        }
    }

    #[tokio::test]
    async fn jobs_are_decoded_with_positional_ids() {
        let data = (vec![abi_job("first"), abi_job("second")],).abi_encode_params();
        let wallet = Arc::new(ScriptedWallet::returning(data));
        let gateway = ContractGateway::new(Address::repeat_byte(0xcc), wallet);

        let jobs = gateway.get_jobs().await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[1].job_id, 1);
        assert_eq!(jobs[1].title, "second");
        assert_eq!(jobs[0].budget.to_string(), "0.001");
    }

    #[tokio::test]
    async fn empty_return_data_is_an_error() {
        let wallet = Arc::new(ScriptedWallet::returning(Vec::new()));
        let gateway = ContractGateway::new(Address::repeat_byte(0xcc), wallet);
        let err = gateway
            .get_applied_jobs_with_status(Address::repeat_byte(1))
            .await
            .unwrap_err();
        assert!(err.message.contains("getAppliedJobsWithStatus"));
    }

    #[tokio::test]
    async fn submit_sends_calldata_with_gas_limit() {
        let wallet = Arc::new(ScriptedWallet::returning(Vec::new()));
        let gateway = ContractGateway::new(Address::repeat_byte(0xcc), wallet.clone());
        let call = ContractCall::SubmitWork {
            job_id: 2,
            work_url: "https://work.dev".into(),
        };

        gateway
            .submit(Address::repeat_byte(1), &call, 60_000)
            .await
            .unwrap();

        let sent = wallet.sent.lock().unwrap().clone();
        assert_eq!(sent[0].gas, Some(60_000));
        assert_eq!(sent[0].from, Some(Address::repeat_byte(1)));
        assert_eq!(sent[0].to, Some(Address::repeat_byte(0xcc)));
        assert_eq!(&sent[0].data[..4], &M::submitWorkCall::SELECTOR[..]);
    }
}
