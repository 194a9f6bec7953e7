pub mod job_handler;
pub mod profile_handler;
pub mod work_handler;

pub use job_handler::JobHandler;
pub use profile_handler::ProfileHandler;
pub use work_handler::WorkHandler;

use super::dto::parse_address;
use crate::application::services::ChainReader;
use crate::shared::error::AppError;
use alloy_primitives::Address;

fn parse_account(explicit: &str) -> Result<Address, AppError> {
    parse_address("account", explicit).map_err(AppError::ValidationError)
}

/// Account for operations that need the chain: the one given, else the configured one,
/// else the wallet's first account.
pub(crate) async fn resolve_account(
    reader: &ChainReader,
    explicit: Option<&str>,
) -> Result<Address, AppError> {
    if let Some(explicit) = explicit {
        reader.access().ready()?;
        return parse_account(explicit);
    }
    reader
        .active_account()
        .await?
        .ok_or_else(|| AppError::WalletUnavailable("Wallet returned no accounts".to_string()))
}

/// Side-store operations work without a chain as long as an account is known.
pub(crate) async fn resolve_local_account(
    reader: &ChainReader,
    explicit: Option<&str>,
) -> Result<Address, AppError> {
    if let Some(explicit) = explicit {
        return parse_account(explicit);
    }
    if let Some(account) = reader.preferred_account() {
        return Ok(account);
    }
    resolve_account(reader, None).await
}

/// Viewer identity for read-only pages; anonymous when nothing is connected.
pub(crate) async fn optional_account(
    reader: &ChainReader,
    explicit: Option<&str>,
) -> Result<Option<Address>, AppError> {
    if let Some(explicit) = explicit {
        return parse_account(explicit).map(Some);
    }
    if let Some(account) = reader.preferred_account() {
        return Ok(Some(account));
    }
    if reader.access().is_ready() {
        return reader.connect_account().await;
    }
    Ok(None)
}
