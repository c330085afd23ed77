//! Storage error types and result alias.
//!
//! Every [`HashStore`](crate::HashStore) implementation maps its internal
//! failures onto [`StorageError`]. Callers higher up (the credential store
//! adapter) never reclassify these errors; they only distinguish
//! [`StorageError::NotFound`] from everything else.
//!
//! # Error Types
//!
//! - [`StorageError::NotFound`] - Hash key or field does not exist
//! - [`StorageError::Connection`] - Network or connection-related failures
//! - [`StorageError::Serialization`] - Reply could not be decoded
//! - [`StorageError::Internal`] - Backend-specific internal errors
//! - [`StorageError::Timeout`] - Operation exceeded time limit
//!
//! # Example
//!
//! ```
//! use gateway_auth_storage::{StorageError, StorageResult};
//!
//! fn lookup(key: &str) -> StorageResult<String> {
//!     Err(StorageError::not_found(key))
//! }
//!
//! assert!(lookup("gateway:abc").unwrap_err().is_not_found());
//! ```

use std::sync::Arc;

use thiserror::Error;

/// A boxed error type for source chain tracking.
pub type BoxError = Arc<dyn std::error::Error + Send + Sync>;

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
///
/// Errors preserve their source chain via the `#[source]` attribute, so
/// structured loggers can print the underlying client error.
///
/// # Non-exhaustive
///
/// New variants may be added in minor releases. Downstream match expressions
/// must include a wildcard arm (`_ =>`).
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// The requested hash, or the requested field of it, does not exist.
    #[error("Key not found: {key}")]
    NotFound {
        /// The key (optionally `key/field`) that was not found.
        key: String,
    },

    /// Connection or network error.
    ///
    /// The store could not be reached: connection refused, dropped
    /// connection, DNS failure.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
        /// The underlying error that caused this connection failure.
        #[source]
        source: Option<BoxError>,
    },

    /// The store replied with data that could not be decoded.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization error.
        message: String,
        /// The underlying error that caused decoding to fail.
        #[source]
        source: Option<BoxError>,
    },

    /// Internal storage backend error.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
        /// The underlying error that caused this internal failure.
        #[source]
        source: Option<BoxError>,
    },

    /// Operation timed out.
    #[error("Operation timeout")]
    Timeout,
}

impl StorageError {
    /// Creates a new `NotFound` error for the given key.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Creates a `NotFound` error naming both the hash key and the field.
    #[must_use]
    pub fn field_not_found(key: &str, field: &str) -> Self {
        Self::NotFound { key: format!("{key}/{field}") }
    }

    /// Creates a new `Connection` error with the given message.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection { message: message.into(), source: None }
    }

    /// Creates a new `Connection` error with a message and source error.
    #[must_use]
    pub fn connection_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Serialization` error with the given message.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization { message: message.into(), source: None }
    }

    /// Creates a new `Serialization` error with a message and source error.
    #[must_use]
    pub fn serialization_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Serialization { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Internal` error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into(), source: None }
    }

    /// Creates a new `Internal` error with a message and source error.
    #[must_use]
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Internal { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Timeout` error.
    #[must_use]
    pub fn timeout() -> Self {
        Self::Timeout
    }

    /// Returns `true` for the absence sentinel.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if retrying the same operation later may succeed.
    ///
    /// Connection failures and timeouts are transient; absence, decoding and
    /// internal errors are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout)
    }
}
