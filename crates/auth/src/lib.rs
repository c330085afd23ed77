//! # Gateway credential store
//!
//! Keeps each gateway's long-lived key and short-lived access token in a
//! [`HashStore`](gateway_auth_storage::HashStore) and answers two questions
//! for a gateway-facing service: is this key valid, and what is a currently
//! valid token for this gateway.
//!
//! ## Token freshness
//!
//! [`GatewayAuthenticator::get_token`] returns the stored token while its
//! expiry lies strictly in the future (or when it has none). Otherwise the
//! stored key is traded for a new token through the registered
//! [`Exchanger`], the new token is stored on a best-effort basis, and
//! returned. Without a key or an exchanger the call fails with
//! [`AuthError::GatewayNoValidToken`].
//!
//! ## Key validation
//!
//! [`GatewayAuthenticator::validate_key`] is permissive when no key is
//! configured: a gateway without a stored key passes the key check and must
//! authenticate by token instead.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use chrono::{Duration, Utc};
//! use gateway_auth::{
//!     AuthResult, CredentialStore, Exchanger, GatewayAuthenticator, IssuedToken,
//! };
//! use gateway_auth_storage::MemoryHashStore;
//!
//! struct Issuer;
//!
//! #[async_trait]
//! impl Exchanger for Issuer {
//!     async fn exchange(&self, gateway_id: &str, _key: &str) -> AuthResult<IssuedToken> {
//!         Ok(IssuedToken::new(format!("token-for-{gateway_id}"), Utc::now() + Duration::hours(1)))
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = CredentialStore::new(Arc::new(MemoryHashStore::new()), "gateway:");
//! store.set_exchanger(Some(Arc::new(Issuer)));
//!
//! store.set_key("eui-1", "secret").await?;
//! assert_eq!(store.get_token("eui-1").await?, "token-for-eui-1");
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - **`testutil`**: Enables the `testutil` module (scripted exchanger, `assert_auth_error!`).

#![deny(unsafe_code)]

mod coalesce;

/// The credential lifecycle trait.
pub mod authenticator;
/// Credential store configuration.
pub mod config;
/// Error types.
pub mod error;
/// The key-for-token exchange capability.
pub mod exchanger;
/// Typed view of stored credential fields.
pub mod record;
/// The hash-store-backed credential store.
pub mod store;
/// Test helpers.
#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use authenticator::GatewayAuthenticator;
pub use config::{CredentialStoreConfig, DEFAULT_PREFIX};
pub use error::{AuthError, AuthResult};
pub use exchanger::{Exchanger, IssuedToken};
pub use record::CredentialRecord;
pub use store::CredentialStore;
