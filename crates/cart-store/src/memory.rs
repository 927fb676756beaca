use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Result, StoreError, store::KeyValueStore};

/// In-memory key-value store for testing and ephemeral sessions.
///
/// Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct InMemoryKeyValueStore {
    values: Arc<RwLock<HashMap<String, String>>>,
    fail_on_write: Arc<AtomicBool>,
}

impl InMemoryKeyValueStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a single value.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut values = HashMap::new();
        values.insert(key.into(), value.into());
        Self {
            values: Arc::new(RwLock::new(values)),
            fail_on_write: Arc::default(),
        }
    }

    /// Configures the store to reject subsequent writes.
    pub fn set_fail_on_write(&self, fail: bool) {
        self.fail_on_write.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of stored keys.
    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }

    /// Clears all values.
    pub async fn clear(&self) {
        self.values.write().await.clear();
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_on_write.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory store is rejecting writes".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.check_writable()?;
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check_writable()?;
        self.values.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_and_get() {
        let store = InMemoryKeyValueStore::new();
        assert!(store.get("cart").await.unwrap().is_none());

        store.set("cart", "[]".to_string()).await.unwrap();
        assert_eq!(store.get("cart").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn set_replaces_previous_value() {
        let store = InMemoryKeyValueStore::with_value("cart", "[]");
        store.set("cart", "[1]".to_string()).await.unwrap();

        assert_eq!(store.get("cart").await.unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn remove_missing_key_is_ok() {
        let store = InMemoryKeyValueStore::new();
        store.remove("nothing").await.unwrap();

        store.set("cart", "[]".to_string()).await.unwrap();
        store.remove("cart").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn fail_on_write_rejects_and_keeps_value() {
        let store = InMemoryKeyValueStore::with_value("cart", "[]");
        store.set_fail_on_write(true);

        let result = store.set("cart", "[1]".to_string()).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.get("cart").await.unwrap().as_deref(), Some("[]"));

        store.set_fail_on_write(false);
        store.set("cart", "[1]".to_string()).await.unwrap();
        assert_eq!(store.get("cart").await.unwrap().as_deref(), Some("[1]"));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemoryKeyValueStore::new();
        let other = store.clone();
        store.set("k", "v".to_string()).await.unwrap();

        assert_eq!(other.get("k").await.unwrap().as_deref(), Some("v"));
        other.clear().await;
        assert!(store.is_empty().await);
    }
}
