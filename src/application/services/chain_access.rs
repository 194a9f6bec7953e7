use crate::application::ports::marketplace_gateway::MarketplaceGateway;
use crate::application::ports::wallet_provider::WalletProvider;
use crate::shared::AppError;
use alloy_primitives::Address;
use std::sync::Arc;

/// Whether the chain can be reached, decided once from configuration.
///
/// Preconditions are checked in a fixed order: contract address present, wallet present,
/// contract address well formed.
#[derive(Clone)]
pub enum ChainAccess {
    Ready {
        wallet: Arc<dyn WalletProvider>,
        contract: Arc<dyn MarketplaceGateway>,
    },
    NotConfigured,
    WalletUnavailable,
    InvalidAddress(String),
}

impl ChainAccess {
    pub fn resolve<F>(
        contract_address: &str,
        wallet: Option<Arc<dyn WalletProvider>>,
        make_contract: F,
    ) -> Self
    where
        F: FnOnce(Address, Arc<dyn WalletProvider>) -> Arc<dyn MarketplaceGateway>,
    {
        let contract_address = contract_address.trim();
        if contract_address.is_empty() {
            return ChainAccess::NotConfigured;
        }
        let Some(wallet) = wallet else {
            return ChainAccess::WalletUnavailable;
        };
        match contract_address.parse::<Address>() {
            Ok(address) => ChainAccess::Ready {
                contract: make_contract(address, Arc::clone(&wallet)),
                wallet,
            },
            Err(_) => ChainAccess::InvalidAddress(contract_address.to_string()),
        }
    }

    pub fn ready(
        &self,
    ) -> Result<(&Arc<dyn WalletProvider>, &Arc<dyn MarketplaceGateway>), AppError> {
        match self {
            ChainAccess::Ready { wallet, contract } => Ok((wallet, contract)),
            ChainAccess::NotConfigured => Err(AppError::NotConfigured(
                "contract address is empty".to_string(),
            )),
            ChainAccess::WalletUnavailable => Err(AppError::WalletUnavailable(
                "no wallet provider configured".to_string(),
            )),
            ChainAccess::InvalidAddress(raw) => Err(AppError::ConfigurationError(format!(
                "Invalid contract address: {raw}"
            ))),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ChainAccess::Ready { .. })
    }
}

impl std::fmt::Debug for ChainAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainAccess::Ready { contract, .. } => f
                .debug_struct("Ready")
                .field("contract", &contract.contract_address())
                .finish(),
            ChainAccess::NotConfigured => f.write_str("NotConfigured"),
            ChainAccess::WalletUnavailable => f.write_str("WalletUnavailable"),
            ChainAccess::InvalidAddress(raw) => f.debug_tuple("InvalidAddress").field(raw).finish(),
        }
    }
}
