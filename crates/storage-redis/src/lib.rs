//! Redis hash store for gateway credential state.
//!
//! Provides [`RedisHashStore`], an implementation of
//! [`HashStore`](gateway_auth_storage::HashStore) over a Redis server, and
//! [`RedisBackendConfig`] to configure it.
//!
//! # Example
//!
//! ```no_run
//! use gateway_auth_storage::HashStore;
//! use gateway_auth_storage_redis::{RedisBackendConfig, RedisHashStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RedisBackendConfig::builder().url("redis://127.0.0.1:6379").build()?;
//!     let store = RedisHashStore::new(config).await?;
//!     store.health_check().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Mapping
//!
//! | Redis failure | `StorageError` |
//! |---------------|----------------|
//! | socket timeout | `Timeout` |
//! | refused, dropped or other I/O | `Connection` |
//! | unexpected reply type | `Serialization` |
//! | anything else | `Internal` |
//!
//! A missing key or field is `NotFound`.

#![deny(unsafe_code)]

mod backend;
mod config;
mod error;

pub use backend::RedisHashStore;
pub use config::RedisBackendConfig;
pub use error::{RedisStorageError, Result};
