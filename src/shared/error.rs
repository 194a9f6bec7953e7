use crate::domain::value_objects::TransactionFailure;
use std::fmt;
use thiserror::Error;

/// EIP-1193 "user rejected request".
pub const USER_REJECTED_CODE: i64 = 4001;
/// JSON-RPC "internal error", which wallets also use for failed calls.
pub const INTERNAL_RPC_CODE: i64 = -32603;
/// JSON-RPC "method not found".
pub const METHOD_NOT_FOUND_CODE: i64 = -32601;

/// Error surface of the wallet provider / JSON-RPC endpoint.
///
/// Mirrors the shape wallets hand back to dapps: a numeric or symbolic code, a top level
/// message and an optional nested `data.message` / `reason` that usually carries the revert
/// string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub code: Option<i64>,
    pub code_name: Option<String>,
    pub message: String,
    pub data_message: Option<String>,
    pub reason: Option<String>,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_data_message(mut self, data_message: impl Into<String>) -> Self {
        self.data_message = Some(data_message.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_code_name(mut self, code_name: impl Into<String>) -> Self {
        self.code_name = Some(code_name.into());
        self
    }

    /// Most specific message available: `data.message`, then `reason`, then `message`.
    pub fn raw_message(&self) -> &str {
        self.data_message
            .as_deref()
            .or(self.reason.as_deref())
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.message)
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == Some(USER_REJECTED_CODE) || self.code_name.as_deref() == Some("ACTION_REJECTED")
    }

    pub fn is_method_not_found(&self) -> bool {
        self.code == Some(METHOD_NOT_FOUND_CODE)
    }
}

#[derive(Debug)]
pub enum AppError {
    NotConfigured(String),
    WalletUnavailable(String),
    ConfigurationError(String),
    ValidationError(String),
    Transaction(TransactionFailure),
    Provider(ProviderError),
    Storage(String),
    Database(String),
    Network(String),
    NotFound(String),
    SerializationError(String),
    DeserializationError(String),
    Internal(String),
}

impl AppError {
    /// Text a view shows to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotConfigured(_) => {
                "Smart contract address missing. Deploy the contract and set CHAINWORK_CONTRACT_ADDRESS."
                    .to_string()
            }
            AppError::WalletUnavailable(_) => {
                "No wallet provider found. Configure CHAINWORK_RPC_URL to connect a wallet."
                    .to_string()
            }
            AppError::ValidationError(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Transaction(failure) => failure.user_message(),
            other => other.to_string(),
        }
    }

    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotConfigured(_) => "NOT_CONFIGURED",
            AppError::WalletUnavailable(_) => "WALLET_UNAVAILABLE",
            AppError::ConfigurationError(_) => "CONFIGURATION_ERROR",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::Transaction(_) => "TRANSACTION_FAILED",
            AppError::Provider(_) => "PROVIDER_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Network(_) => "NETWORK_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::SerializationError(_) => "SERIALIZATION_ERROR",
            AppError::DeserializationError(_) => "DESERIALIZATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_configured(&self) -> bool {
        matches!(self, AppError::NotConfigured(_))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotConfigured(msg) => write!(f, "Not configured: {}", msg),
            AppError::WalletUnavailable(msg) => write!(f, "Wallet unavailable: {}", msg),
            AppError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::Transaction(failure) => write!(f, "Transaction failed: {}", failure),
            AppError::Provider(err) => write!(f, "Provider error: {}", err),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            AppError::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::Provider(err)
    }
}

impl From<TransactionFailure> for AppError {
    fn from(failure: TransactionFailure) -> Self {
        AppError::Transaction(failure)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Internal(err)
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        AppError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
