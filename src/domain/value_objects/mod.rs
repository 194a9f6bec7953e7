pub mod ether;
pub mod status_badge;
pub mod store_key;
pub mod transaction_failure;

pub use ether::EtherAmount;
pub use status_badge::{ApplicationFilter, StatusBadge};
pub use store_key::{ParsedKey, StoreKey, StoreKeyKind};
pub use transaction_failure::{FailureReason, KnownRevert, Operation, TransactionFailure};
