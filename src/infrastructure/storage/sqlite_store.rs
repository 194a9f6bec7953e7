use super::queries::{
    INSERT_CHANGE, PRUNE_CHANGES_THROUGH, SELECT_CHANGES_AFTER, SELECT_KEYS, SELECT_LATEST_SEQ,
    SELECT_VALUE, UPSERT_VALUE,
};
use crate::application::ports::key_value_store::{
    ChangeFeed, KeyPredicate, KeyValueStore, StoreChange,
};
use crate::infrastructure::database::ConnectionPool;
use crate::shared::AppError;
use async_trait::async_trait;
use chrono::Utc;
use lru::LruCache;
use sqlx::FromRow;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::trace;
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct StoreChangeRow {
    seq: i64,
    key: String,
    value: String,
    writer_id: String,
}

impl StoreChangeRow {
    fn into_domain(self) -> StoreChange {
        StoreChange {
            seq: self.seq,
            key: self.key,
            value: self.value,
            writer_id: self.writer_id,
        }
    }
}

/// Side store persisted in SQLite with a read-through LRU cache.
///
/// Every write also lands in `store_changes` tagged with this instance's writer id, so other
/// instances sharing the file can pick it up.
pub struct SqliteKeyValueStore {
    pool: ConnectionPool,
    writer_id: String,
    cache: Arc<Mutex<LruCache<String, String>>>,
}

impl SqliteKeyValueStore {
    pub fn new(pool: ConnectionPool, cache_size: usize) -> Self {
        let capacity = NonZeroUsize::new(cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            pool,
            writer_id: Uuid::new_v4().to_string(),
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        cache_size: usize,
    ) -> Result<Self, AppError> {
        let pool = ConnectionPool::new(database_url, max_connections).await?;
        pool.migrate().await?;
        Ok(Self::new(pool, cache_size))
    }

    pub async fn in_memory() -> Result<Self, AppError> {
        let pool = ConnectionPool::from_memory().await?;
        pool.migrate().await?;
        Ok(Self::new(pool, 64))
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        // set と同じロックをDB読み込み中も保持する
        let mut cache = self.cache.lock().await;
        if let Some(value) = cache.get(key) {
            return Ok(Some(value.clone()));
        }

        let value: Option<String> = sqlx::query_scalar(SELECT_VALUE)
            .bind(key)
            .fetch_optional(self.pool.get_pool())
            .await?;
        if let Some(value) = &value {
            cache.put(key.to_string(), value.clone());
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut cache = self.cache.lock().await;
        let now = Utc::now().timestamp_millis();
        let mut tx = self.pool.get_pool().begin().await?;
        sqlx::query(UPSERT_VALUE)
            .bind(key)
            .bind(value)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        sqlx::query(INSERT_CHANGE)
            .bind(key)
            .bind(value)
            .bind(&self.writer_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        cache.put(key.to_string(), value.to_string());
        trace!(key, "side store write");
        Ok(())
    }

    async fn enumerate_keys(&self, predicate: KeyPredicate<'_>) -> Result<Vec<String>, AppError> {
        let keys: Vec<String> = sqlx::query_scalar(SELECT_KEYS)
            .fetch_all(self.pool.get_pool())
            .await?;
        Ok(keys.into_iter().filter(|key| predicate(key)).collect())
    }
}

#[async_trait]
impl ChangeFeed for SqliteKeyValueStore {
    fn writer_id(&self) -> &str {
        &self.writer_id
    }

    async fn latest_seq(&self) -> Result<i64, AppError> {
        let seq: i64 = sqlx::query_scalar(SELECT_LATEST_SEQ)
            .fetch_one(self.pool.get_pool())
            .await?;
        Ok(seq)
    }

    /// Foreign changes also refresh the read cache.
    async fn changes_after(&self, seq: i64, limit: i64) -> Result<Vec<StoreChange>, AppError> {
        let rows = sqlx::query_as::<_, StoreChangeRow>(SELECT_CHANGES_AFTER)
            .bind(seq)
            .bind(limit)
            .fetch_all(self.pool.get_pool())
            .await?;
        let changes: Vec<StoreChange> = rows.into_iter().map(StoreChangeRow::into_domain).collect();

        let mut cache = self.cache.lock().await;
        for change in changes.iter().filter(|c| c.writer_id != self.writer_id) {
            cache.put(change.key.clone(), change.value.clone());
        }
        Ok(changes)
    }

    async fn prune_through(&self, through: i64) -> Result<u64, AppError> {
        let result = sqlx::query(PRUNE_CHANGES_THROUGH)
            .bind(through)
            .execute(self.pool.get_pool())
            .await?;
        Ok(result.rows_affected())
    }
}
