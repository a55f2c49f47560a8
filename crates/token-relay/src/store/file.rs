//! Flat-file backend: the whole record map lives in one JSON file.
//!
//! Reads are served from an in-process map; every mutation rewrites the
//! file. Fine for the handful of tokens this service holds, and it keeps
//! the file human-inspectable.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};

use super::{StorageKind, TokenStore};
use crate::error::StoreResult;
use crate::models::TokenRecord;

/// JSON file-backed token store.
#[derive(Clone)]
pub struct FileStore {
    records: Arc<RwLock<HashMap<String, TokenRecord>>>,
    path: PathBuf,
}

impl FileStore {
    /// Open the store at `path`, creating the file with an empty map if it
    /// does not exist yet. A file that fails to parse is treated as empty
    /// rather than poisoning the store.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let records: HashMap<String, TokenRecord> = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => {
                let empty: HashMap<String, TokenRecord> = HashMap::new();
                fs::write(&path, serde_json::to_vec(&empty)?).await?;
                empty
            }
        };

        Ok(Self { records: Arc::new(RwLock::new(records)), path })
    }

    async fn persist(&self) -> StoreResult<()> {
        let records = self.records.read().await;
        let data = serde_json::to_vec_pretty(&*records)?;
        drop(records);
        fs::write(&self.path, data).await?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileStore {
    fn kind(&self) -> StorageKind {
        StorageKind::File
    }

    async fn put(&self, record: TokenRecord) -> StoreResult<()> {
        self.records.write().await.insert(record.id.clone(), record);
        self.persist().await
    }

    async fn get(&self, id: &str) -> StoreResult<Option<TokenRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<TokenRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let existed = self.records.write().await.remove(id).is_some();
        self.persist().await?;
        Ok(existed)
    }

    async fn clear(&self) -> StoreResult<()> {
        self.records.write().await.clear();
        self.persist().await
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_crud_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let store = FileStore::open(&path).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());

        store.put(TokenRecord::new("1", "oauth:abc", "somechannel")).await.unwrap();
        store.put(TokenRecord::new("2", "oauth:def", "other")).await.unwrap();
        assert!(store.delete("2").await.unwrap());

        // Reopen from disk and check the surviving record made it.
        let reloaded = FileStore::open(&path).await.unwrap();
        let records = reloaded.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].token, "oauth:abc");
    }

    #[tokio::test]
    async fn test_open_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tokens.json");

        let store = FileStore::open(&path).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        fs::write(&path, b"not json at all").await.unwrap();

        let store = FileStore::open(&path).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_empties_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let store = FileStore::open(&path).await.unwrap();
        store.put(TokenRecord::new("1", "t", "c")).await.unwrap();
        store.clear().await.unwrap();

        let reloaded = FileStore::open(&path).await.unwrap();
        assert!(reloaded.list().await.unwrap().is_empty());
    }
}
