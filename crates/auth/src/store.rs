//! [`CredentialStore`]: gateway credentials kept in a [`HashStore`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gateway_auth_storage::{HashStore, types::field_map};
use parking_lot::RwLock;
use zeroize::Zeroizing;

use crate::{
    authenticator::GatewayAuthenticator,
    coalesce::ExchangeLocks,
    config::CredentialStoreConfig,
    error::{AuthError, AuthResult},
    exchanger::Exchanger,
    record::{CredentialRecord, KEY_FIELD, TOKEN_EXPIRES_FIELD, TOKEN_FIELD, format_expiry},
};

/// Gateway credential store over a [`HashStore`].
///
/// Each gateway's key, token and token expiry live in one hash under
/// `<prefix><gateway_id>`. The store itself is the only source of truth; the
/// adapter holds no credential state, only the registered [`Exchanger`].
///
/// # Thread Safety
///
/// `CredentialStore` is `Send + Sync` and meant to be shared behind an
/// [`Arc`]. The exchanger reference is guarded by a lock and every
/// `get_token` call works on a snapshot of it.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use gateway_auth::{CredentialStore, GatewayAuthenticator};
/// use gateway_auth_storage::MemoryHashStore;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = CredentialStore::new(Arc::new(MemoryHashStore::new()), "");
///
/// store.set_key("eui-0102030405060708", "secret").await?;
/// store.set_token("eui-0102030405060708", "token", None).await?;
///
/// store.validate_key("eui-0102030405060708", "secret").await?;
/// assert_eq!(store.get_token("eui-0102030405060708").await?, "token");
/// # Ok(())
/// # }
/// ```
pub struct CredentialStore {
    store: Arc<dyn HashStore>,
    prefix: String,
    exchanger: RwLock<Option<Arc<dyn Exchanger>>>,
    /// Present when exchange coalescing is enabled.
    exchange_locks: Option<ExchangeLocks>,
}

impl CredentialStore {
    /// Creates a credential store using `prefix` as the key namespace.
    ///
    /// An empty prefix selects the default, `"gateway:"`. No exchanger is
    /// registered initially.
    pub fn new(store: Arc<dyn HashStore>, prefix: impl Into<String>) -> Self {
        Self::with_config(store, CredentialStoreConfig::builder().prefix(prefix).build())
    }

    /// Creates a credential store from a full configuration.
    pub fn with_config(store: Arc<dyn HashStore>, config: CredentialStoreConfig) -> Self {
        Self {
            store,
            prefix: config.prefix().to_owned(),
            exchanger: RwLock::new(None),
            exchange_locks: config.coalesce_exchanges().then(ExchangeLocks::default),
        }
    }

    /// The key namespace prefix in use.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether an exchanger is currently registered.
    #[must_use]
    pub fn has_exchanger(&self) -> bool {
        self.exchanger.read().is_some()
    }

    /// Checks that the underlying store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] with the store's error.
    pub async fn health_check(&self) -> AuthResult<()> {
        self.store.health_check().await.map_err(AuthError::from)
    }

    fn record_key(&self, gateway_id: &str) -> String {
        format!("{}{gateway_id}", self.prefix)
    }

    fn exchanger(&self) -> Option<Arc<dyn Exchanger>> {
        self.exchanger.read().clone()
    }

    async fn read_record(&self, gateway_id: &str) -> AuthResult<CredentialRecord> {
        let fields = match self.store.hash_get_all(&self.record_key(gateway_id)).await {
            Ok(fields) => fields,
            Err(err) if err.is_not_found() => return Err(AuthError::gateway_not_found(gateway_id)),
            Err(err) => return Err(err.into()),
        };

        if fields.is_empty() {
            return Err(AuthError::gateway_not_found(gateway_id));
        }
        Ok(CredentialRecord::from_fields(&fields))
    }

    async fn write_token(
        &self,
        gateway_id: &str,
        token: &str,
        expires: Option<DateTime<Utc>>,
    ) -> AuthResult<()> {
        let expires = format_expiry(expires);
        let fields = field_map([(TOKEN_FIELD, token), (TOKEN_EXPIRES_FIELD, expires.as_str())]);
        self.store.hash_multi_set(&self.record_key(gateway_id), &fields).await?;
        Ok(())
    }

    /// Exchanges `key` and stores the result. Only the exchange can fail.
    async fn refresh(
        &self,
        gateway_id: &str,
        key: &str,
        exchanger: &dyn Exchanger,
    ) -> AuthResult<String> {
        tracing::debug!("exchanging key for a fresh token");
        let issued = exchanger.exchange(gateway_id, key).await?;

        if let Err(err) = self.write_token(gateway_id, &issued.token, issued.expires).await {
            tracing::warn!(error = %err, "failed to persist exchanged token");
        }
        Ok(issued.token)
    }

    async fn refresh_coalesced(
        &self,
        locks: &ExchangeLocks,
        gateway_id: &str,
        exchanger: &dyn Exchanger,
    ) -> AuthResult<String> {
        let _guard = locks.acquire(gateway_id).await;

        // A caller that held the lock before us may already have refreshed it.
        let record = self.read_record(gateway_id).await?;
        if let Some(token) = record.valid_token_at(Utc::now()) {
            tracing::debug!("token refreshed by a concurrent caller");
            return Ok(token.to_owned());
        }

        match record.exchangeable_key() {
            Some(key) => self.refresh(gateway_id, key, exchanger).await,
            None => Err(AuthError::no_valid_token(gateway_id)),
        }
    }
}

#[async_trait]
impl GatewayAuthenticator for CredentialStore {
    #[tracing::instrument(skip(self, token))]
    async fn set_token(
        &self,
        gateway_id: &str,
        token: &str,
        expires: Option<DateTime<Utc>>,
    ) -> AuthResult<()> {
        self.write_token(gateway_id, token, expires).await
    }

    #[tracing::instrument(skip(self, key))]
    async fn set_key(&self, gateway_id: &str, key: &str) -> AuthResult<()> {
        self.store.hash_set(&self.record_key(gateway_id), KEY_FIELD, key).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, key))]
    async fn validate_key(&self, gateway_id: &str, key: &str) -> AuthResult<()> {
        let stored = match self.store.hash_get(&self.record_key(gateway_id), KEY_FIELD).await {
            Ok(stored) => Zeroizing::new(stored),
            Err(err) if err.is_not_found() => return Ok(()),
            Err(err) => return Err(err.into()),
        };

        // No key configured: the gateway authenticates by token only.
        // The comparison below is not constant-time.
        if stored.is_empty() || stored.as_str() == key {
            Ok(())
        } else {
            Err(AuthError::invalid_key(gateway_id))
        }
    }

    #[tracing::instrument(skip(self))]
    async fn get_token(&self, gateway_id: &str) -> AuthResult<String> {
        let record = self.read_record(gateway_id).await?;
        if let Some(token) = record.valid_token_at(Utc::now()) {
            return Ok(token.to_owned());
        }

        let (Some(key), Some(exchanger)) = (record.exchangeable_key(), self.exchanger()) else {
            return Err(AuthError::no_valid_token(gateway_id));
        };

        match &self.exchange_locks {
            Some(locks) => self.refresh_coalesced(locks, gateway_id, exchanger.as_ref()).await,
            None => self.refresh(gateway_id, key, exchanger.as_ref()).await,
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, gateway_id: &str) -> AuthResult<()> {
        self.store.delete(&self.record_key(gateway_id)).await?;
        Ok(())
    }

    fn set_exchanger(&self, exchanger: Option<Arc<dyn Exchanger>>) {
        let registered = exchanger.is_some();
        *self.exchanger.write() = exchanger;

        if registered {
            tracing::info!("token exchanger registered");
        } else {
            tracing::info!("token exchanger unregistered");
        }
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("prefix", &self.prefix)
            .field("has_exchanger", &self.has_exchanger())
            .field("pending_exchanges", &self.exchange_locks.as_ref().map(ExchangeLocks::len))
            .finish_non_exhaustive()
    }
}
