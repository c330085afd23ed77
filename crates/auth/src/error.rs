//! Credential store error types.
//!
//! [`AuthError`] separates the three domain outcomes a gateway-facing service
//! acts on (unknown gateway, no usable token, wrong key) from infrastructure
//! failures. Store failures are carried unchanged in [`AuthError::Storage`];
//! exchanger failures are whatever the exchanger returned.

use std::sync::Arc;

use gateway_auth_storage::{BoxError, StorageError};
use thiserror::Error;

/// Errors returned by the credential store and by exchangers.
///
/// # Non-exhaustive
///
/// This enum is marked `#[non_exhaustive]`. Downstream match expressions must
/// include a wildcard arm (`_ =>`).
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum AuthError {
    /// No credential record exists for the gateway.
    #[error("Gateway not found: {gateway_id}")]
    GatewayNotFound {
        /// The gateway that has no record.
        gateway_id: String,
    },

    /// The record exists but yields no usable token, and the token cannot be
    /// refreshed (no key stored or no exchanger registered).
    #[error("Gateway has no valid token: {gateway_id}")]
    GatewayNoValidToken {
        /// The gateway without a usable token.
        gateway_id: String,
    },

    /// The supplied key does not match the key stored for the gateway.
    #[error("Invalid key for gateway: {gateway_id}")]
    InvalidKey {
        /// The gateway whose key check failed.
        gateway_id: String,
    },

    /// The underlying hash store failed.
    ///
    /// The [`StorageError`] is kept as-is; use [`AuthError::is_transient`] to
    /// decide whether a retry may help.
    #[error("Credential storage error: {0}")]
    Storage(
        /// The store error, unchanged.
        #[source]
        StorageError,
    ),

    /// An exchanger could not trade the key for a token.
    #[error("Token exchange failed: {message}")]
    Exchange {
        /// Description of the exchange failure.
        message: String,
        /// The underlying error reported by the token issuer.
        #[source]
        source: Option<BoxError>,
    },
}

impl AuthError {
    /// Creates a `GatewayNotFound` error.
    #[must_use]
    pub fn gateway_not_found(gateway_id: impl Into<String>) -> Self {
        Self::GatewayNotFound { gateway_id: gateway_id.into() }
    }

    /// Creates a `GatewayNoValidToken` error.
    #[must_use]
    pub fn no_valid_token(gateway_id: impl Into<String>) -> Self {
        Self::GatewayNoValidToken { gateway_id: gateway_id.into() }
    }

    /// Creates an `InvalidKey` error.
    #[must_use]
    pub fn invalid_key(gateway_id: impl Into<String>) -> Self {
        Self::InvalidKey { gateway_id: gateway_id.into() }
    }

    /// Creates an `Exchange` error with the given message.
    #[must_use]
    pub fn exchange(message: impl Into<String>) -> Self {
        Self::Exchange { message: message.into(), source: None }
    }

    /// Creates an `Exchange` error with a message and source error.
    #[must_use]
    pub fn exchange_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Exchange { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Returns `true` for errors that describe the gateway's credentials
    /// rather than a failing collaborator.
    #[must_use]
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            Self::GatewayNotFound { .. } | Self::GatewayNoValidToken { .. } | Self::InvalidKey { .. }
        )
    }

    /// Returns `true` if retrying the operation may succeed.
    ///
    /// Only store connection failures and timeouts qualify.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Storage(err) => err.is_transient(),
            _ => false,
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        AuthError::Storage(err)
    }
}

/// Result type alias for credential store operations.
pub type AuthResult<T> = std::result::Result<T, AuthError>;
