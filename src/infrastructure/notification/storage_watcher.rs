use crate::application::ports::key_value_store::ChangeFeed;
use crate::application::services::{BusEvent, NotificationBus};
use crate::shared::AppError;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const BATCH_SIZE: i64 = 256;
/// Log entries kept behind the watcher's cursor.
pub const CHANGE_LOG_RETENTION: i64 = 10_000;

/// Republishes side-store writes made by other instances as `StorageChanged`.
pub struct StorageWatcher {
    feed: Arc<dyn ChangeFeed>,
    bus: Arc<NotificationBus>,
    interval: Duration,
    retention: i64,
}

pub struct StorageWatcherHandle {
    handle: JoinHandle<()>,
}

impl Drop for StorageWatcherHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl StorageWatcher {
    pub fn new(feed: Arc<dyn ChangeFeed>, bus: Arc<NotificationBus>, interval: Duration) -> Self {
        Self {
            feed,
            bus,
            interval,
            retention: CHANGE_LOG_RETENTION,
        }
    }

    pub fn with_retention(mut self, retention: i64) -> Self {
        self.retention = retention.max(0);
        self
    }

    /// Deletes log entries more than `retention` entries behind `cursor`.
    pub async fn trim_log(&self, cursor: i64) -> Result<u64, AppError> {
        let horizon = cursor - self.retention;
        if horizon <= 0 {
            return Ok(0);
        }
        let removed = self.feed.prune_through(horizon).await?;
        if removed > 0 {
            debug!(horizon, removed, "Pruned side-store change log");
        }
        Ok(removed)
    }

    /// Publishes foreign changes after `cursor` and returns the new cursor.
    pub async fn poll_once(&self, cursor: i64) -> Result<i64, AppError> {
        let mut cursor = cursor;
        loop {
            let changes = self.feed.changes_after(cursor, BATCH_SIZE).await?;
            let Some(last) = changes.last() else {
                return Ok(cursor);
            };
            cursor = last.seq;
            for change in &changes {
                if change.writer_id == self.feed.writer_id() {
                    continue;
                }
                debug!(key = %change.key, writer = %change.writer_id, "Foreign side-store write");
                self.bus.publish(BusEvent::StorageChanged {
                    key: change.key.clone(),
                });
            }
            if (changes.len() as i64) < BATCH_SIZE {
                return Ok(cursor);
            }
        }
    }

    /// Watches from the current end of the log; earlier writes are not replayed.
    pub async fn spawn(self) -> Result<StorageWatcherHandle, AppError> {
        let mut cursor = self.feed.latest_seq().await?;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                ticker.tick().await;
                match self.poll_once(cursor).await {
                    Ok(next) if next > cursor => {
                        cursor = next;
                        if let Err(err) = self.trim_log(cursor).await {
                            warn!(error = %err, "Failed to prune side-store change log");
                        }
                    }
                    Ok(_) => {}
                    Err(err) => warn!(error = %err, "Failed to read side-store change log"),
                }
            }
        });
        Ok(StorageWatcherHandle { handle })
    }
}
