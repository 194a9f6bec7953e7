use crate::shared::AppError;
use async_trait::async_trait;

pub type KeyPredicate<'a> = &'a (dyn Fn(&str) -> bool + Send + Sync);

/// Persistent string-to-string store. No expiry, no deletes, last write wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    async fn enumerate_keys(&self, predicate: KeyPredicate<'_>) -> Result<Vec<String>, AppError>;
}

/// One write recorded by a store instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    pub seq: i64,
    pub key: String,
    pub value: String,
    pub writer_id: String,
}

/// Log of writes shared by every instance using the same backing store.
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Identifier stamped on this instance's own writes.
    fn writer_id(&self) -> &str;

    async fn latest_seq(&self) -> Result<i64, AppError>;

    async fn changes_after(&self, seq: i64, limit: i64) -> Result<Vec<StoreChange>, AppError>;

    /// Drops log entries with `seq <= through`. Returns how many were removed.
    async fn prune_through(&self, through: i64) -> Result<u64, AppError>;
}
