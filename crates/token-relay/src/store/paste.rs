//! Remote paste-service backend.
//!
//! The paste service is write-only in practice: pastes cannot be queried
//! back by record id. Each `put` posts the serialized record as a new
//! paste (the durable audit copy) and mirrors it into an in-process
//! [`MemoryStore`] so the list/get/delete operations still work within one
//! process lifetime. A failed remote write fails the `put`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use super::{MemoryStore, StorageKind, TokenStore};
use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::models::TokenRecord;

/// Token store that audits every write to a remote paste service.
#[derive(Clone)]
pub struct PasteStore {
    client: ClientWithMiddleware,
    api_url: String,
    mirror: MemoryStore,
}

impl PasteStore {
    /// Build the store with a retrying HTTP client.
    pub fn new(api_url: String, config: &Config) -> StoreResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            "application/json".parse().expect("valid content-type header"),
        );
        if let Some(ref token) = config.paste_api_token {
            let value = format!("Bearer {token}")
                .parse()
                .map_err(|_| StoreError::unavailable("paste API token is not a valid header"))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(1), Duration::from_secs(10))
            .build_with_max_retries(3);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { client, api_url, mirror: MemoryStore::new() })
    }

    async fn publish(&self, record: &TokenRecord) -> StoreResult<()> {
        let body = serde_json::json!({
            "title": format!("token {}", record.id),
            "content": serde_json::to_string(record)?,
        });

        let response = self.client.post(&self.api_url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::unavailable(format!(
                "paste service returned {status}"
            )));
        }

        tracing::debug!(id = %record.id, %status, "Published record to paste service");
        Ok(())
    }
}

#[async_trait]
impl TokenStore for PasteStore {
    fn kind(&self) -> StorageKind {
        StorageKind::Paste
    }

    async fn put(&self, record: TokenRecord) -> StoreResult<()> {
        // Remote copy first: if the audit write fails, nothing is kept.
        self.publish(&record).await?;
        self.mirror.put(record).await
    }

    async fn get(&self, id: &str) -> StoreResult<Option<TokenRecord>> {
        self.mirror.get(id).await
    }

    async fn list(&self) -> StoreResult<Vec<TokenRecord>> {
        self.mirror.list().await
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        // Pastes are immutable; only the mirror forgets the record.
        self.mirror.delete(id).await
    }

    async fn clear(&self) -> StoreResult<()> {
        self.mirror.clear().await
    }
}

impl std::fmt::Debug for PasteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasteStore").field("api_url", &self.api_url).finish()
    }
}
