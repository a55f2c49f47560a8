//! Key-value backend: one redis hash, one field per record.
//!
//! Records are stored JSON-serialized under `tokens:<hash>` fields so the
//! whole set can be fetched with a single `HGETALL`. Atomicity comes from
//! redis per-command semantics; there are no multi-step transactions.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use super::{StorageKind, TokenStore};
use crate::error::StoreResult;
use crate::models::TokenRecord;

/// Hash key holding all records.
const HASH_KEY: &str = "token-relay:tokens";

/// Redis-backed token store.
#[derive(Clone)]
pub struct KvStore {
    conn: ConnectionManager,
}

impl KvStore {
    /// Connect to redis and verify the server responds.
    ///
    /// # Errors
    ///
    /// Returns a redis error when the URL is invalid or the server is not
    /// reachable; the caller decides whether to fall back to memory.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(url)?;
        let mut conn = ConnectionManager::new(client).await?;
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl TokenStore for KvStore {
    fn kind(&self) -> StorageKind {
        StorageKind::Redis
    }

    async fn put(&self, record: TokenRecord) -> StoreResult<()> {
        let json = serde_json::to_string(&record)?;
        let mut conn = self.conn.clone();
        let _: () = conn.hset(HASH_KEY, &record.id, json).await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<TokenRecord>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.hget(HASH_KEY, id).await?;
        Ok(raw.map(|json| serde_json::from_str(&json)).transpose()?)
    }

    async fn list(&self) -> StoreResult<Vec<TokenRecord>> {
        let mut conn = self.conn.clone();
        let raw: HashMap<String, String> = conn.hgetall(HASH_KEY).await?;
        raw.into_values().map(|json| serde_json::from_str(&json).map_err(Into::into)).collect()
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let removed: usize = conn.hdel(HASH_KEY, id).await?;
        Ok(removed > 0)
    }

    async fn clear(&self) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(HASH_KEY).await?;
        Ok(())
    }
}

impl std::fmt::Debug for KvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore").field("key", &HASH_KEY).finish()
    }
}
