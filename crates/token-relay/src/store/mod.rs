//! Storage backends for token records.
//!
//! One strategy trait, four interchangeable implementations:
//!
//! - [`MemoryStore`] — in-process map, gone on restart.
//! - [`FileStore`] — flat JSON file rewritten on every mutation.
//! - [`KvStore`] — redis hash, one field per record.
//! - [`PasteStore`] — write-only remote paste service with an in-process
//!   mirror for reads.
//!
//! The backend is chosen by [`Config::backend`]; [`connect`] builds it.

mod file;
mod kv;
mod memory;
mod paste;

use std::sync::Arc;

use async_trait::async_trait;

pub use file::FileStore;
pub use kv::KvStore;
pub use memory::MemoryStore;
pub use paste::PasteStore;

use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::models::TokenRecord;

/// Which backend a store persists to. Reported in API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// In-process map (persists until restart).
    #[default]
    Memory,
    /// Redis hash.
    Redis,
    /// Flat JSON file.
    File,
    /// Remote paste service (write-only audit log).
    Paste,
}

impl StorageKind {
    /// Lowercase name used in responses and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Redis => "redis",
            Self::File => "file",
            Self::Paste => "paste",
        }
    }
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistence strategy for token records.
///
/// `put` upserts by `record.id`; the id must be set before the call.
/// `list` has no intrinsic order; the service layer sorts.
#[async_trait]
pub trait TokenStore: Send + Sync + std::fmt::Debug {
    /// Which backend this store writes to.
    fn kind(&self) -> StorageKind;

    /// Insert or replace a record by id.
    async fn put(&self, record: TokenRecord) -> StoreResult<()>;

    /// Fetch a record by id.
    async fn get(&self, id: &str) -> StoreResult<Option<TokenRecord>>;

    /// All records, in no particular order.
    async fn list(&self) -> StoreResult<Vec<TokenRecord>>;

    /// Remove a record by id. Returns whether it existed.
    async fn delete(&self, id: &str) -> StoreResult<bool>;

    /// Remove everything.
    async fn clear(&self) -> StoreResult<()>;
}

/// Build the backend selected by the configuration.
///
/// An unreachable redis server is not fatal: the service falls back to
/// in-memory storage with a warning, matching how the deployments behave
/// when the key-value store is missing.
///
/// # Errors
///
/// Returns [`StoreError::Unavailable`] when the paste backend is selected
/// without an API URL, or an I/O error when the file backend cannot open
/// its file.
pub async fn connect(config: &Config) -> StoreResult<Arc<dyn TokenStore>> {
    match config.backend {
        StorageKind::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageKind::Redis => match KvStore::connect(&config.redis_url).await {
            Ok(store) => Ok(Arc::new(store)),
            Err(err) => {
                tracing::warn!(error = %err, "Redis unavailable, falling back to in-memory storage");
                Ok(Arc::new(MemoryStore::new()))
            }
        },
        StorageKind::File => Ok(Arc::new(FileStore::open(&config.file_path).await?)),
        StorageKind::Paste => {
            let api_url = config
                .paste_api_url
                .clone()
                .ok_or_else(|| StoreError::unavailable("paste backend requires PASTE_API_URL"))?;
            Ok(Arc::new(PasteStore::new(api_url, config)?))
        }
    }
}
