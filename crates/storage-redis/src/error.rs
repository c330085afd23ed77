//! Error types for the Redis hash store.
//!
//! This module maps [`redis::RedisError`] onto the generic
//! [`StorageError`](gateway_auth_storage::StorageError) categories.

use gateway_auth_storage::StorageError;
use redis::{ErrorKind, RedisError};
use thiserror::Error;

/// Result type alias for Redis store operations.
pub type Result<T> = std::result::Result<T, RedisStorageError>;

/// Errors specific to the Redis hash store.
#[derive(Debug, Error)]
pub enum RedisStorageError {
    /// Error from the Redis client.
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<RedisStorageError> for StorageError {
    fn from(err: RedisStorageError) -> Self {
        match err {
            RedisStorageError::Redis(source) => redis_error_to_storage_error(source),
            RedisStorageError::Config(message) => {
                StorageError::internal(format!("Config: {message}"))
            },
        }
    }
}

/// Converts a Redis client error to a storage error.
///
/// Timeouts are checked before generic I/O failures because a timed-out
/// socket read is also an I/O error.
pub(crate) fn redis_error_to_storage_error(err: RedisError) -> StorageError {
    if err.is_timeout() {
        tracing::warn!(error = %err, "Redis operation timed out");
        return StorageError::timeout();
    }

    if err.is_connection_refusal() || err.is_connection_dropped() || err.is_io_error() {
        return StorageError::connection_with_source("Redis connection failed", err);
    }

    match err.kind() {
        ErrorKind::TypeError => {
            StorageError::serialization_with_source("Unexpected Redis reply type", err)
        },
        ErrorKind::AuthenticationFailed => {
            StorageError::internal_with_source("Redis authentication failed", err)
        },
        ErrorKind::InvalidClientConfig => {
            StorageError::internal_with_source("Invalid Redis client configuration", err)
        },
        _ => StorageError::internal_with_source("Redis command failed", err),
    }
}
