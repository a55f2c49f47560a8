//! Token Relay Service
//!
//! A small HTTP/JSON service that receives OAuth access tokens captured by
//! a browser login flow, persists them, and hands them to an external bot
//! process on request.
//!
//! # Features
//!
//! - **Six operations**: save, list-all, list-unused, mark-used, delete, stats
//! - **Four backends**: in-memory, redis, flat JSON file, remote paste service
//! - **Async-first**: axum over Tokio, permissive CORS, static frontend serving
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use token_relay::service::TokenService;
//! use token_relay::store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = TokenService::new(Arc::new(MemoryStore::new()));
//!     let id = service.save("oauth:abc123", Some("somechannel")).await?;
//!     let stats = service.stats().await?;
//!     assert_eq!(stats.total, 1);
//!     println!("saved token {id}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod service;
pub mod store;

pub use config::Config;
pub use error::{StoreError, StoreResult};
pub use models::{TokenRecord, TokenStats};
pub use service::TokenService;
pub use store::{StorageKind, TokenStore};
