//! Hash store abstraction for gateway credential state.
//!
//! This crate provides the [`HashStore`] trait and related types that the
//! credential store adapter (`gateway-auth`) is built on. A credential record
//! is one hash of string fields under a namespaced key, so the trait exposes
//! exactly the hash operations the adapter needs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Gateway authentication service              │
//! ├─────────────────────────────────────────────────────────────┤
//! │                  gateway-auth (CredentialStore)             │
//! │       (key validation, token freshness, exchange)           │
//! ├─────────────────────────────────────────────────────────────┤
//! │                  gateway-auth-storage                       │
//! │                    HashStore trait                          │
//! │  (hash_multi_set, hash_set, hash_get, hash_get_all, delete) │
//! ├──────────────────┬──────────────────────────────────────────┤
//! │ MemoryHashStore  │          RedisHashStore                  │
//! │    (testing)     │   (gateway-auth-storage-redis)           │
//! └──────────────────┴──────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use gateway_auth_storage::{HashStore, MemoryHashStore, types::field_map};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryHashStore::new();
//!
//!     store.hash_multi_set("gateway:eui-1", &field_map([("token", "t1")])).await?;
//!     store.hash_set("gateway:eui-1", "key", "secret").await?;
//!
//!     let fields = store.hash_get_all("gateway:eui-1").await?;
//!     assert_eq!(fields.len(), 2);
//!
//!     store.delete("gateway:eui-1").await?;
//!     assert!(store.hash_get_all("gateway:eui-1").await.unwrap_err().is_not_found());
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! All operations return [`StorageResult<T>`]. Absence is reported as
//! [`StorageError::NotFound`]; everything else is an infrastructure failure
//! that callers propagate unchanged.
//!
//! # Feature Flags
//!
//! - **`testutil`**: Enables the `testutil` module (assertion macros, fault-injecting store) and
//!   the `conformance` suite. Enable this in `[dev-dependencies]` for integration tests.
//! - **`failpoints`**: Activates the `fail` points in [`MemoryHashStore`].

#![deny(unsafe_code)]

pub mod backend;
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used)]
pub mod conformance;
pub mod error;
pub mod memory;
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used)]
pub mod testutil;
pub mod types;

// Re-export primary types at crate root for convenience
pub use backend::HashStore;
pub use error::{BoxError, StorageError, StorageResult};
pub use memory::MemoryHashStore;
pub use types::FieldMap;
