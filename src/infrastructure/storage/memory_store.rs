use crate::application::ports::key_value_store::{KeyPredicate, KeyValueStore};
use crate::shared::AppError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Entries {
    values: HashMap<String, String>,
    order: Vec<String>,
}

/// Process-local side store. Keys enumerate in first-insertion order.
#[derive(Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<RwLock<Entries>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.values.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.read().await.values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = self.entries.write().await;
        if entries
            .values
            .insert(key.to_string(), value.to_string())
            .is_none()
        {
            entries.order.push(key.to_string());
        }
        Ok(())
    }

    async fn enumerate_keys(&self, predicate: KeyPredicate<'_>) -> Result<Vec<String>, AppError> {
        let entries = self.entries.read().await;
        Ok(entries
            .order
            .iter()
            .filter(|key| predicate(key))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn last_write_wins_and_order_is_stable() {
        let store = MemoryKeyValueStore::new();
        assert!(store.is_empty().await);
        store.set("b", "1").await.unwrap();
        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();

        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("2"));
        assert_eq!(store.len().await, 2);
        let keys = store.enumerate_keys(&|_: &str| true).await.unwrap();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
