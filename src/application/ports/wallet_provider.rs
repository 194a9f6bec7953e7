use crate::shared::ProviderError;
use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;

/// Transaction or call as handed to the wallet. Unset gas fields are filled in by the wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub value: U256,
    pub data: Bytes,
    pub gas: Option<u64>,
    pub gas_price: Option<U256>,
}

impl TransactionRequest {
    pub fn call(to: Address, data: Bytes) -> Self {
        Self {
            to: Some(to),
            data,
            ..Self::default()
        }
    }

    pub fn transfer(from: Address, to: Address, value: U256) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            value,
            ..Self::default()
        }
    }

    pub fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    pub fn with_gas_price(mut self, gas_price: U256) -> Self {
        self.gas_price = Some(gas_price);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    /// `false` when the transaction was mined but reverted.
    pub status: bool,
}

/// Wallet capability: account access, chain queries and signing of sent transactions.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Asks the wallet for account access; the first entry is the active account.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    async fn chain_id(&self) -> Result<u64, ProviderError>;

    async fn balance(&self, address: Address) -> Result<U256, ProviderError>;

    async fn code_at(&self, address: Address) -> Result<Bytes, ProviderError>;

    async fn gas_price(&self) -> Result<U256, ProviderError>;

    async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64, ProviderError>;

    /// Read-only call against the latest block.
    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes, ProviderError>;

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256, ProviderError>;

    async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, ProviderError>;
}
