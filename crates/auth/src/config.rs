//! Credential store configuration.

use serde::{Deserialize, Serialize};

/// Namespace prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "gateway:";

/// Configuration for [`CredentialStore`](crate::CredentialStore).
///
/// # Example
///
/// ```
/// use gateway_auth::CredentialStoreConfig;
///
/// let config = CredentialStoreConfig::builder()
///     .prefix("ttn:gateway:")
///     .coalesce_exchanges(true)
///     .build();
/// assert_eq!(config.prefix(), "ttn:gateway:");
///
/// // An empty prefix falls back to the default namespace.
/// let config = CredentialStoreConfig::builder().prefix("").build();
/// assert_eq!(config.prefix(), "gateway:");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CredentialStoreConfig {
    /// Prefix prepended to the gateway ID to form the store key.
    prefix: String,

    /// Serialise concurrent exchanges for the same gateway so only one caller
    /// invokes the exchanger.
    coalesce_exchanges: bool,
}

impl Default for CredentialStoreConfig {
    fn default() -> Self {
        Self { prefix: DEFAULT_PREFIX.to_owned(), coalesce_exchanges: false }
    }
}

#[bon::bon]
impl CredentialStoreConfig {
    /// Creates a new configuration.
    ///
    /// # Optional Fields
    ///
    /// * `prefix` - default `"gateway:"`; an empty prefix also means the default
    /// * `coalesce_exchanges` - default `false`
    #[builder]
    pub fn new(
        #[builder(into, default = DEFAULT_PREFIX.to_owned())] prefix: String,
        #[builder(default)] coalesce_exchanges: bool,
    ) -> Self {
        Self { prefix, coalesce_exchanges }
    }

    /// Returns the key namespace prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        if self.prefix.is_empty() { DEFAULT_PREFIX } else { &self.prefix }
    }

    /// Returns whether concurrent exchanges for one gateway are coalesced.
    #[must_use]
    pub fn coalesce_exchanges(&self) -> bool {
        self.coalesce_exchanges
    }
}
