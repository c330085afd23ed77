//! Hash store trait definition.
//!
//! This module defines [`HashStore`], the capability set the credential store
//! adapter needs from its key-value collaborator: Redis-style hashes of string
//! fields stored under a string key.
//!
//! # Design Philosophy
//!
//! - **Hashes, not blobs**: a record is a map of named string fields, so single
//!   fields can be written without read-modify-write cycles
//! - **Async by default**: all operations are async for non-blocking I/O
//! - **Absence is an error value**: missing keys and fields surface as
//!   [`StorageError::NotFound`](crate::StorageError::NotFound), which callers
//!   match on explicitly
//! - **Atomic per key**: [`hash_multi_set`](HashStore::hash_multi_set) writes all
//!   of its fields or none; nothing spans multiple keys
//!
//! # Implementing a Backend
//!
//! 1. Implement the [`HashStore`] trait
//! 2. Map backend-specific errors to [`StorageError`](crate::StorageError)
//! 3. Run the [`conformance`](crate::conformance) suite against it
//!
//! See [`MemoryHashStore`](crate::MemoryHashStore) for a reference implementation.

use async_trait::async_trait;

use crate::{error::StorageResult, types::FieldMap};

/// Abstract hash store for credential records.
///
/// Implementations must be thread-safe (`Send + Sync`) and support concurrent
/// operations.
///
/// # Key Operations
///
/// | Method | Redis equivalent |
/// |--------|------------------|
/// | [`hash_multi_set`](HashStore::hash_multi_set) | `HSET key f1 v1 f2 v2 …` |
/// | [`hash_set`](HashStore::hash_set) | `HSET key f v` |
/// | [`hash_get`](HashStore::hash_get) | `HGET key f` |
/// | [`hash_get_all`](HashStore::hash_get_all) | `HGETALL key` |
/// | [`delete`](HashStore::delete) | `DEL key` |
/// | [`health_check`](HashStore::health_check) | `PING` |
///
/// # Example
///
/// ```
/// use gateway_auth_storage::{HashStore, MemoryHashStore, types::field_map};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let store = MemoryHashStore::new();
///
/// store.hash_multi_set("gateway:a", &field_map([("token", "t1")])).await.unwrap();
/// let token = store.hash_get("gateway:a", "token").await.unwrap();
/// assert_eq!(token, "t1");
/// # });
/// ```
#[async_trait]
pub trait HashStore: Send + Sync {
    /// Sets several fields of a hash in a single atomic write.
    ///
    /// Creates the hash if it does not exist. Fields not named in `fields` keep
    /// their current values. An empty `fields` map is a no-op.
    #[must_use = "storage operations may fail and errors must be handled"]
    async fn hash_multi_set(&self, key: &str, fields: &FieldMap) -> StorageResult<()>;

    /// Sets one field of a hash, creating the hash if needed.
    #[must_use = "storage operations may fail and errors must be handled"]
    async fn hash_set(&self, key: &str, field: &str, value: &str) -> StorageResult<()>;

    /// Reads one field of a hash.
    ///
    /// # Returns
    ///
    /// - `Ok(value)` if the field exists (the value may be empty)
    /// - `Err(StorageError::NotFound)` if the hash or the field is absent
    /// - `Err(...)` on other storage errors
    #[must_use = "storage operations may fail and errors must be handled"]
    async fn hash_get(&self, key: &str, field: &str) -> StorageResult<String>;

    /// Reads every field of a hash.
    ///
    /// # Returns
    ///
    /// - `Ok(fields)` with at least one entry if the hash exists
    /// - `Err(StorageError::NotFound)` if the hash is absent
    /// - `Err(...)` on other storage errors
    #[must_use = "storage operations may fail and errors must be handled"]
    async fn hash_get_all(&self, key: &str) -> StorageResult<FieldMap>;

    /// Deletes a whole hash.
    ///
    /// Deleting a hash that does not exist is a no-op (returns `Ok(())`).
    #[must_use = "storage operations may fail and errors must be handled"]
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Verifies that the store is reachable.
    #[must_use = "health check results indicate store availability and must be inspected"]
    async fn health_check(&self) -> StorageResult<()>;
}
