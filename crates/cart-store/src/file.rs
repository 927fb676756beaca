use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{Result, StoreError, store::KeyValueStore};

/// File-backed key-value store.
///
/// All keys live in one JSON object on disk. Writes go to a sibling temp
/// file that is renamed over the original, so a crash mid-write leaves the
/// previous contents intact.
#[derive(Clone)]
pub struct FileKeyValueStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl FileKeyValueStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::default(),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Reads the current contents for a read-modify-write cycle.
    ///
    /// An unreadable document is replaced rather than blocking every write.
    async fn read_for_update(&self) -> Result<BTreeMap<String, String>> {
        match self.read_all().await {
            Err(StoreError::Serialization(e)) => {
                tracing::warn!(path = %self.path.display(), error = %e, "discarding malformed storage file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    async fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, serde_json::to_vec_pretty(values)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut values = self.read_for_update().await?;
        values.insert(key.to_string(), value);
        self.write_all(&values).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut values = self.read_for_update().await?;
        if values.remove(key).is_some() {
            self.write_all(&values).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("storage.json"));

        assert!(store.get("cart").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn values_survive_a_new_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let store = FileKeyValueStore::new(&path);
        store.set("@shop:cart", "[]".to_string()).await.unwrap();
        store.set("other", "x".to_string()).await.unwrap();

        let reopened = FileKeyValueStore::new(&path);
        assert_eq!(reopened.get("@shop:cart").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get("other").await.unwrap().as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn remove_deletes_only_that_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("storage.json"));
        store.set("a", "1".to_string()).await.unwrap();
        store.set("b", "2".to_string()).await.unwrap();

        store.remove("a").await.unwrap();
        store.remove("never-set").await.unwrap();

        assert!(store.get("a").await.unwrap().is_none());
        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn malformed_file_is_reported_then_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        tokio::fs::write(&path, "{oops").await.unwrap();

        let store = FileKeyValueStore::new(&path);
        assert!(matches!(
            store.get("cart").await,
            Err(StoreError::Serialization(_))
        ));

        store.set("cart", "[]".to_string()).await.unwrap();
        assert_eq!(store.get("cart").await.unwrap().as_deref(), Some("[]"));
    }
}
