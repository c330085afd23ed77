//! In-memory hash store implementation.
//!
//! This module provides [`MemoryHashStore`], an in-memory implementation of
//! [`HashStore`] suitable for testing and development. It follows Redis hash
//! semantics closely enough that the credential store adapter behaves the same
//! on both:
//!
//! - writing a field to a missing hash creates the hash
//! - a hash never exists with zero fields
//! - `DEL` of a missing key succeeds
//!
//! # Fail Points
//!
//! With the `failpoints` feature enabled, every operation has a named
//! [`fail`] point that makes it return [`StorageError::Internal`] when
//! configured with the `return` action:
//!
//! | Fail point | Operation |
//! |------------|-----------|
//! | `hash-multi-set` | [`hash_multi_set`](HashStore::hash_multi_set) |
//! | `hash-set` | [`hash_set`](HashStore::hash_set) |
//! | `hash-get` | [`hash_get`](HashStore::hash_get) |
//! | `hash-get-all` | [`hash_get_all`](HashStore::hash_get_all) |
//! | `hash-delete` | [`delete`](HashStore::delete) |
//! | `health-check` | [`health_check`](HashStore::health_check) |
//!
//! # Example
//!
//! ```
//! use gateway_auth_storage::{HashStore, MemoryHashStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MemoryHashStore::new();
//!
//!     store.hash_set("gateway:eui-1", "key", "secret").await.unwrap();
//!     let fields = store.hash_get_all("gateway:eui-1").await.unwrap();
//!
//!     assert_eq!(fields.len(), 1);
//! }
//! ```

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use fail::fail_point;
use parking_lot::RwLock;

use crate::{
    backend::HashStore,
    error::{StorageError, StorageResult},
    types::FieldMap,
};

/// In-memory hash store.
///
/// # Cloning
///
/// `MemoryHashStore` is cheaply cloneable via [`Arc`]. All clones share the
/// same underlying data, which lets tests keep a handle for direct inspection
/// after passing one to the code under test.
#[derive(Debug, Default, Clone)]
pub struct MemoryHashStore {
    data: Arc<RwLock<HashMap<String, FieldMap>>>,
}

impl MemoryHashStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of hashes currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns `true` if no hashes are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

#[async_trait]
impl HashStore for MemoryHashStore {
    #[tracing::instrument(skip(self, fields), fields(field_count = fields.len()))]
    async fn hash_multi_set(&self, key: &str, fields: &FieldMap) -> StorageResult<()> {
        fail_point!("hash-multi-set", |_| Err(StorageError::internal("injected: hash-multi-set")));

        if fields.is_empty() {
            return Ok(());
        }

        // One write lock for every field keeps the write atomic for readers.
        let mut data = self.data.write();
        let hash = data.entry(key.to_owned()).or_default();
        for (field, value) in fields {
            hash.insert(field.clone(), value.clone());
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, value))]
    async fn hash_set(&self, key: &str, field: &str, value: &str) -> StorageResult<()> {
        fail_point!("hash-set", |_| Err(StorageError::internal("injected: hash-set")));

        let mut data = self.data.write();
        data.entry(key.to_owned()).or_default().insert(field.to_owned(), value.to_owned());
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn hash_get(&self, key: &str, field: &str) -> StorageResult<String> {
        fail_point!("hash-get", |_| Err(StorageError::internal("injected: hash-get")));

        let data = self.data.read();
        data.get(key)
            .and_then(|hash| hash.get(field))
            .cloned()
            .ok_or_else(|| StorageError::field_not_found(key, field))
    }

    #[tracing::instrument(skip(self))]
    async fn hash_get_all(&self, key: &str) -> StorageResult<FieldMap> {
        fail_point!("hash-get-all", |_| Err(StorageError::internal("injected: hash-get-all")));

        let data = self.data.read();
        match data.get(key) {
            Some(hash) if !hash.is_empty() => Ok(hash.clone()),
            _ => Err(StorageError::not_found(key)),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, key: &str) -> StorageResult<()> {
        fail_point!("hash-delete", |_| Err(StorageError::internal("injected: hash-delete")));

        self.data.write().remove(key);
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn health_check(&self) -> StorageResult<()> {
        fail_point!("health-check", |_| Err(StorageError::connection("injected: health-check")));

        // Acquiring the read lock proves we are not deadlocked.
        let _unused = self.data.read();
        Ok(())
    }
}
