//! The key-for-token exchange capability.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AuthResult;

/// Trades a gateway's long-lived key for a fresh access token.
///
/// Registered on a [`CredentialStore`](crate::CredentialStore) after
/// construction, because the exchanger often depends on the service that owns
/// the store. Implementations report their own failures as
/// [`AuthError::Exchange`](crate::AuthError::Exchange); whatever error they
/// return reaches the caller of `get_token` unchanged.
///
/// Concurrent `get_token` calls for the same gateway may invoke `exchange`
/// more than once unless exchange coalescing is enabled, so implementations
/// should tolerate redundant calls.
#[async_trait]
pub trait Exchanger: Send + Sync {
    /// Exchanges `key` for a token for `gateway_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token issuer rejects the key or cannot be
    /// reached.
    async fn exchange(&self, gateway_id: &str, key: &str) -> AuthResult<IssuedToken>;
}

/// A token issued by an [`Exchanger`].
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// The access token.
    pub token: String,
    /// When the token expires; `None` means it never does.
    pub expires: Option<DateTime<Utc>>,
}

impl IssuedToken {
    /// Creates a token that expires at `expires`.
    #[must_use]
    pub fn new(token: impl Into<String>, expires: DateTime<Utc>) -> Self {
        Self { token: token.into(), expires: Some(expires) }
    }

    /// Creates a token that never expires.
    #[must_use]
    pub fn never_expires(token: impl Into<String>) -> Self {
        Self { token: token.into(), expires: None }
    }
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &"<redacted>")
            .field("expires", &self.expires)
            .finish()
    }
}
