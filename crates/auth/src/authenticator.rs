//! The credential lifecycle interface exposed to gateway-facing services.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{error::AuthResult, exchanger::Exchanger};

/// Credential lifecycle operations for gateways.
///
/// Implemented by [`CredentialStore`](crate::CredentialStore). Services hold
/// an `Arc<dyn GatewayAuthenticator>` so tests can substitute their own.
#[async_trait]
pub trait GatewayAuthenticator: Send + Sync {
    /// Stores `token` for the gateway, together with its expiry.
    ///
    /// `expires == None` stores a token that never expires. Both fields are
    /// written in one atomic store operation; the key is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`](crate::AuthError::Storage) if the write fails.
    async fn set_token(
        &self,
        gateway_id: &str,
        token: &str,
        expires: Option<DateTime<Utc>>,
    ) -> AuthResult<()>;

    /// Stores the gateway's long-lived key. The token is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`](crate::AuthError::Storage) if the write fails.
    async fn set_key(&self, gateway_id: &str, key: &str) -> AuthResult<()>;

    /// Checks `key` against the gateway's stored key.
    ///
    /// Succeeds when no key is configured for the gateway (no record, or an
    /// absent or empty key field). Such gateways authenticate by token only.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidKey`](crate::AuthError::InvalidKey) if a key is configured
    ///   and differs from `key`
    /// - [`AuthError::Storage`](crate::AuthError::Storage) if the read fails
    async fn validate_key(&self, gateway_id: &str, key: &str) -> AuthResult<()>;

    /// Returns a currently valid token for the gateway.
    ///
    /// A stored token is returned while it has not expired. Otherwise, if
    /// the gateway has a key and an exchanger is registered, the key is
    /// exchanged for a new token, which is stored on a best-effort basis and
    /// returned.
    ///
    /// # Errors
    ///
    /// - [`AuthError::GatewayNotFound`](crate::AuthError::GatewayNotFound) if there is no
    ///   record
    /// - [`AuthError::GatewayNoValidToken`](crate::AuthError::GatewayNoValidToken) if the
    ///   token is missing or expired and cannot be refreshed
    /// - the exchanger's error, unchanged, if the exchange fails
    /// - [`AuthError::Storage`](crate::AuthError::Storage) if the read fails
    async fn get_token(&self, gateway_id: &str) -> AuthResult<String>;

    /// Removes the gateway's key, token and expiry.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`](crate::AuthError::Storage) if the delete fails.
    async fn delete(&self, gateway_id: &str) -> AuthResult<()>;

    /// Registers the exchanger used by [`get_token`](Self::get_token), or
    /// unregisters it with `None`.
    fn set_exchanger(&self, exchanger: Option<Arc<dyn Exchanger>>);
}
