use super::rpc_client::JsonRpcClient;
use crate::application::ports::wallet_provider::{
    TransactionReceipt, TransactionRequest, WalletProvider,
};
use crate::shared::ProviderError;
use alloy_primitives::{Address, Bytes, B256, U256, U64};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RpcTransaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gas: Option<U64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gas_price: Option<U256>,
}

impl From<&TransactionRequest> for RpcTransaction {
    fn from(tx: &TransactionRequest) -> Self {
        Self {
            from: tx.from,
            to: tx.to,
            value: (!tx.value.is_zero()).then_some(tx.value),
            data: (!tx.data.is_empty()).then(|| tx.data.clone()),
            gas: tx.gas.map(U64::from),
            gas_price: tx.gas_price,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: B256,
    #[serde(default)]
    block_number: Option<U64>,
    #[serde(default)]
    status: Option<U64>,
}

fn quantity_to_u64(value: U64) -> u64 {
    value.as_limbs()[0]
}

/// Wallet reached over JSON-RPC; the node holds the keys and signs sent transactions.
pub struct JsonRpcWallet {
    client: JsonRpcClient,
}

impl JsonRpcWallet {
    pub fn new(client: JsonRpcClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        match self
            .client
            .request::<_, Vec<Address>>("eth_requestAccounts", json!([]))
            .await
        {
            Err(err) if err.is_method_not_found() => {
                debug!("eth_requestAccounts unsupported, using eth_accounts");
                self.client.request("eth_accounts", json!([])).await
            }
            other => other,
        }
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        let id: U64 = self.client.request("eth_chainId", json!([])).await?;
        Ok(quantity_to_u64(id))
    }

    async fn balance(&self, address: Address) -> Result<U256, ProviderError> {
        self.client
            .request("eth_getBalance", json!([address, "latest"]))
            .await
    }

    async fn code_at(&self, address: Address) -> Result<Bytes, ProviderError> {
        self.client
            .request("eth_getCode", json!([address, "latest"]))
            .await
    }

    async fn gas_price(&self) -> Result<U256, ProviderError> {
        self.client.request("eth_gasPrice", json!([])).await
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64, ProviderError> {
        let gas: U64 = self
            .client
            .request("eth_estimateGas", json!([RpcTransaction::from(tx)]))
            .await?;
        Ok(quantity_to_u64(gas))
    }

    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes, ProviderError> {
        self.client
            .request("eth_call", json!([RpcTransaction::from(tx), "latest"]))
            .await
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256, ProviderError> {
        self.client
            .request("eth_sendTransaction", json!([RpcTransaction::from(tx)]))
            .await
    }

    async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, ProviderError> {
        let receipt: Option<RpcReceipt> = self
            .client
            .request("eth_getTransactionReceipt", json!([hash]))
            .await?;
        Ok(receipt.map(|r| TransactionReceipt {
            transaction_hash: r.transaction_hash,
            block_number: r.block_number.map(quantity_to_u64),
            // pre-Byzantium receipts carry no status
            status: r.status.map_or(true, |s| !s.is_zero()),
        }))
    }
}
