//! Typed view of a gateway's stored credential hash.
//!
//! A record is one hash under `<prefix><gateway_id>` with up to three fields:
//!
//! | field           | value                                             |
//! |-----------------|---------------------------------------------------|
//! | `key`           | long-lived shared secret                          |
//! | `token`         | current access token                              |
//! | `token_expires` | RFC 3339 timestamp, or `""` for "never expires"   |
//!
//! Empty strings are treated the same as absent fields.

use chrono::{DateTime, SecondsFormat, Utc};
use gateway_auth_storage::FieldMap;
use zeroize::Zeroizing;

/// Field holding the gateway's shared secret.
pub const KEY_FIELD: &str = "key";

/// Field holding the current access token.
pub const TOKEN_FIELD: &str = "token";

/// Field holding the token expiry.
pub const TOKEN_EXPIRES_FIELD: &str = "token_expires";

/// Parsed credential record.
///
/// Both secrets, the key and the token, are held in [`Zeroizing`] buffers so
/// they are wiped when the record is dropped. Neither appears in the `Debug`
/// output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialRecord {
    key: Option<Zeroizing<String>>,
    token: Option<Zeroizing<String>>,
    token_expires: Option<DateTime<Utc>>,
}

impl CredentialRecord {
    /// Builds a record from the raw hash fields.
    ///
    /// A `token_expires` value that is not valid RFC 3339 is treated as
    /// "never expires", so a malformed timestamp never invalidates an
    /// otherwise usable token.
    #[must_use]
    pub fn from_fields(fields: &FieldMap) -> Self {
        let non_empty = |name: &str| fields.get(name).filter(|value| !value.is_empty()).cloned();

        Self {
            key: non_empty(KEY_FIELD).map(Zeroizing::new),
            token: non_empty(TOKEN_FIELD).map(Zeroizing::new),
            token_expires: fields.get(TOKEN_EXPIRES_FIELD).and_then(|raw| parse_expiry(raw)),
        }
    }

    /// The stored key, if one is configured.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref().map(String::as_str)
    }

    /// The stored token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().map(String::as_str)
    }

    /// The token expiry; `None` means the token never expires.
    #[must_use]
    pub fn token_expires(&self) -> Option<DateTime<Utc>> {
        self.token_expires
    }

    /// Returns the token if it is still valid at `now`.
    ///
    /// A token is valid when it never expires or its expiry is strictly after
    /// `now`. A token expiring exactly at `now` is expired.
    #[must_use]
    pub fn valid_token_at(&self, now: DateTime<Utc>) -> Option<&str> {
        let token = self.token()?;
        match self.token_expires {
            Some(expires) if expires <= now => None,
            _ => Some(token),
        }
    }

    /// The key to hand to an exchanger, if the record has one.
    #[must_use]
    pub fn exchangeable_key(&self) -> Option<&str> {
        self.key()
    }
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |present: bool| if present { "<redacted>" } else { "<none>" };
        f.debug_struct("CredentialRecord")
            .field("key", &redact(self.key.is_some()))
            .field("token", &redact(self.token.is_some()))
            .field("token_expires", &self.token_expires)
            .finish()
    }
}

/// Parses a stored `token_expires` value.
///
/// Returns `None` for the empty string and for values that are not RFC 3339.
#[must_use]
pub fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(err) => {
            tracing::debug!(value = raw, error = %err, "ignoring malformed token expiry");
            None
        },
    }
}

/// Formats an expiry for storage: RFC 3339 with second precision, or `""`
/// when the token never expires.
#[must_use]
pub fn format_expiry(expires: Option<DateTime<Utc>>) -> String {
    expires.map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true)).unwrap_or_default()
}
