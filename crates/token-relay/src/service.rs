//! Business rules layered over a storage backend.
//!
//! The service owns id assignment, validation, ordering, the used/unused
//! filter, and stats aggregation. Every call re-fetches state from the
//! backend; nothing is cached across calls.

use std::sync::Arc;

use chrono::Utc;

use crate::config::defaults;
use crate::error::{StoreError, StoreResult};
use crate::models::{TokenRecord, TokenStats};
use crate::store::{StorageKind, TokenStore};

/// Token lifecycle operations over an [`TokenStore`] backend.
#[derive(Clone)]
pub struct TokenService {
    store: Arc<dyn TokenStore>,
}

impl TokenService {
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Which backend this service persists to.
    #[must_use]
    pub fn storage(&self) -> StorageKind {
        self.store.kind()
    }

    /// Save a new token. Returns the assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] when the token is empty; nothing
    /// is written in that case.
    pub async fn save(&self, token: &str, channel: Option<&str>) -> StoreResult<String> {
        if token.is_empty() {
            return Err(StoreError::validation("token", "Token is required"));
        }

        let id = uuid::Uuid::new_v4().simple().to_string();
        let channel = channel.filter(|c| !c.is_empty()).unwrap_or(defaults::CHANNEL);
        let record = TokenRecord::new(id.clone(), token, channel);

        self.store.put(record).await?;
        tracing::info!(%id, %channel, "Token saved");
        Ok(id)
    }

    /// All records, most recent first.
    pub async fn list_all(&self) -> StoreResult<Vec<TokenRecord>> {
        let mut records = self.store.list().await?;
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }

    /// Unused records, most recent first.
    pub async fn list_unused(&self) -> StoreResult<Vec<TokenRecord>> {
        let mut records = self.list_all().await?;
        records.retain(|r| !r.used);
        Ok(records)
    }

    /// Mark a token as consumed by the bot.
    ///
    /// Marking an already-used token again is accepted silently; the
    /// transition is one-way, so the record stays used either way.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no record has that id.
    pub async fn mark_used(&self, id: &str) -> StoreResult<()> {
        let Some(mut record) = self.store.get(id).await? else {
            return Err(StoreError::not_found(id));
        };

        record.mark_used(Utc::now());
        self.store.put(record).await?;
        tracing::info!(%id, "Token marked as used");
        Ok(())
    }

    /// Remove a token.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no record has that id.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        if !self.store.delete(id).await? {
            return Err(StoreError::not_found(id));
        }
        tracing::info!(%id, "Token deleted");
        Ok(())
    }

    /// Aggregate counts by full scan.
    pub async fn stats(&self) -> StoreResult<TokenStats> {
        let records = self.store.list().await?;
        Ok(TokenStats::from_records(&records))
    }

    /// Wipe the backend.
    pub async fn clear(&self) -> StoreResult<()> {
        self.store.clear().await?;
        tracing::info!("All tokens cleared");
        Ok(())
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").field("storage", &self.storage()).finish()
    }
}
