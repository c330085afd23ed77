//! Shared test utilities for hash store testing.
//!
//! This module provides assertion macros and a fault-injecting store wrapper.
//! It is feature-gated behind `testutil` to prevent leaking into production
//! builds.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! gateway-auth-storage = { path = "../storage", features = ["testutil"] }
//! ```
//!
//! ```no_run
//! // Requires the `testutil` feature to be enabled.
//! use gateway_auth_storage::testutil::{FaultyHashStore, HashOp};
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{
    backend::HashStore,
    error::{StorageError, StorageResult},
    memory::MemoryHashStore,
    types::FieldMap,
};

/// Assert that a [`StorageResult`] is a [`StorageError::NotFound`].
///
/// # Examples
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use gateway_auth_storage::assert_not_found;
/// use gateway_auth_storage::{StorageError, StorageResult};
///
/// let result: StorageResult<()> = Err(StorageError::not_found("missing"));
/// assert_not_found!(result);
/// ```
#[macro_export]
macro_rules! assert_not_found {
    ($result:expr) => {{
        let result = $result;
        assert!(
            matches!(result, Err($crate::error::StorageError::NotFound { .. })),
            "expected StorageError::NotFound, got: {:?}",
            result,
        );
    }};
    ($result:expr, $msg:expr) => {{
        let result = $result;
        assert!(
            matches!(result, Err($crate::error::StorageError::NotFound { .. })),
            "{}: expected StorageError::NotFound, got: {:?}",
            $msg,
            result,
        );
    }};
}

/// Assert that a [`StorageResult`] failed with the given [`StorageError`] variant.
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use gateway_auth_storage::assert_storage_error;
/// use gateway_auth_storage::{StorageError, StorageResult};
///
/// let result: StorageResult<()> = Err(StorageError::connection("refused"));
/// assert_storage_error!(result, Connection);
/// ```
#[macro_export]
macro_rules! assert_storage_error {
    ($result:expr, $variant:ident) => {{
        let result = $result;
        assert!(
            matches!(result, Err($crate::error::StorageError::$variant { .. })),
            concat!("expected StorageError::", stringify!($variant), ", got: {:?}"),
            result,
        );
    }};
}

/// The [`HashStore`] operations a [`FaultyHashStore`] can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashOp {
    /// [`HashStore::hash_multi_set`].
    MultiSet,
    /// [`HashStore::hash_set`].
    Set,
    /// [`HashStore::hash_get`].
    Get,
    /// [`HashStore::hash_get_all`].
    GetAll,
    /// [`HashStore::delete`].
    Delete,
    /// [`HashStore::health_check`].
    HealthCheck,
}

impl HashOp {
    const ALL: [Self; 6] =
        [Self::MultiSet, Self::Set, Self::Get, Self::GetAll, Self::Delete, Self::HealthCheck];

    fn index(self) -> usize {
        match self {
            Self::MultiSet => 0,
            Self::Set => 1,
            Self::Get => 2,
            Self::GetAll => 3,
            Self::Delete => 4,
            Self::HealthCheck => 5,
        }
    }
}

#[derive(Debug, Default)]
struct FaultState {
    failures: [Option<StorageError>; 6],
    calls: [usize; 6],
}

/// A [`HashStore`] wrapper that fails chosen operations on demand and counts
/// calls per operation.
///
/// Unlike the `failpoints` feature, faults are scoped to one instance, so
/// tests using it can run in parallel.
///
/// # Cloning
///
/// Clones share the inner store, the configured faults and the counters.
#[derive(Debug, Clone)]
pub struct FaultyHashStore<S = MemoryHashStore> {
    inner: S,
    state: Arc<Mutex<FaultState>>,
}

impl FaultyHashStore<MemoryHashStore> {
    /// Wraps a fresh [`MemoryHashStore`].
    #[must_use]
    pub fn new() -> Self {
        Self::wrap(MemoryHashStore::new())
    }
}

impl Default for FaultyHashStore<MemoryHashStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: HashStore> FaultyHashStore<S> {
    /// Wraps an existing store.
    pub fn wrap(inner: S) -> Self {
        Self { inner, state: Arc::new(Mutex::new(FaultState::default())) }
    }

    /// Returns the wrapped store, bypassing fault injection.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Makes every subsequent call of `op` fail with `error`.
    pub fn fail(&self, op: HashOp, error: StorageError) {
        self.state.lock().failures[op.index()] = Some(error);
    }

    /// Stops failing `op`.
    pub fn heal(&self, op: HashOp) {
        self.state.lock().failures[op.index()] = None;
    }

    /// Stops failing every operation.
    pub fn heal_all(&self) {
        for op in HashOp::ALL {
            self.heal(op);
        }
    }

    /// Number of times `op` has been called, including failed calls.
    pub fn calls(&self, op: HashOp) -> usize {
        self.state.lock().calls[op.index()]
    }

    fn enter(&self, op: HashOp) -> StorageResult<()> {
        let mut state = self.state.lock();
        state.calls[op.index()] += 1;
        match &state.failures[op.index()] {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<S: HashStore> HashStore for FaultyHashStore<S> {
    async fn hash_multi_set(&self, key: &str, fields: &FieldMap) -> StorageResult<()> {
        self.enter(HashOp::MultiSet)?;
        self.inner.hash_multi_set(key, fields).await
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> StorageResult<()> {
        self.enter(HashOp::Set)?;
        self.inner.hash_set(key, field, value).await
    }

    async fn hash_get(&self, key: &str, field: &str) -> StorageResult<String> {
        self.enter(HashOp::Get)?;
        self.inner.hash_get(key, field).await
    }

    async fn hash_get_all(&self, key: &str) -> StorageResult<FieldMap> {
        self.enter(HashOp::GetAll)?;
        self.inner.hash_get_all(key).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.enter(HashOp::Delete)?;
        self.inner.delete(key).await
    }

    async fn health_check(&self) -> StorageResult<()> {
        self.enter(HashOp::HealthCheck)?;
        self.inner.health_check().await
    }
}
