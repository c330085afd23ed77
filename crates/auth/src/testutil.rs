//! Shared test utilities for credential store testing.
//!
//! Provides a scripted [`Exchanger`] and the [`assert_auth_error!`] macro.
//! Feature-gated behind `testutil`.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! gateway-auth = { path = "../auth", features = ["testutil"] }
//! ```
//!
//! ```no_run
//! // Requires the `testutil` feature to be enabled.
//! use gateway_auth::testutil::ScriptedExchanger;
//! ```

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{
    error::{AuthError, AuthResult},
    exchanger::{Exchanger, IssuedToken},
};

/// Assert that an [`AuthResult`] failed with the given [`AuthError`] variant.
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use gateway_auth::{AuthError, AuthResult, assert_auth_error};
///
/// let result: AuthResult<String> = Err(AuthError::gateway_not_found("eui-1"));
/// assert_auth_error!(result, GatewayNotFound);
/// ```
#[macro_export]
macro_rules! assert_auth_error {
    ($result:expr, $variant:ident) => {{
        let result = $result;
        assert!(
            matches!(result, Err($crate::AuthError::$variant { .. })),
            concat!("expected AuthError::", stringify!($variant), ", got: {:?}"),
            result,
        );
    }};
}

/// One observed `exchange` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeCall {
    /// The gateway passed to the exchanger.
    pub gateway_id: String,
    /// The key passed to the exchanger.
    pub key: String,
}

#[derive(Debug)]
struct Script {
    outcome: AuthResult<IssuedToken>,
    delay: Option<Duration>,
    calls: Vec<ExchangeCall>,
}

/// An [`Exchanger`] that returns a fixed outcome and records every call.
///
/// Clones share the script and the call log, so a test can keep one clone
/// and register another on the store.
#[derive(Debug, Clone)]
pub struct ScriptedExchanger {
    script: Arc<Mutex<Script>>,
}

impl ScriptedExchanger {
    /// An exchanger that issues `token` on every call.
    #[must_use]
    pub fn returning(token: IssuedToken) -> Self {
        Self::with_outcome(Ok(token))
    }

    /// An exchanger that fails with `err` on every call.
    #[must_use]
    pub fn failing(err: AuthError) -> Self {
        Self::with_outcome(Err(err))
    }

    fn with_outcome(outcome: AuthResult<IssuedToken>) -> Self {
        Self { script: Arc::new(Mutex::new(Script { outcome, delay: None, calls: Vec::new() })) }
    }

    /// Makes each call wait for `delay` before answering.
    #[must_use]
    pub fn with_delay(self, delay: Duration) -> Self {
        self.script.lock().delay = Some(delay);
        self
    }

    /// Replaces the outcome of subsequent calls.
    pub fn set_outcome(&self, outcome: AuthResult<IssuedToken>) {
        self.script.lock().outcome = outcome;
    }

    /// Number of calls so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.script.lock().calls.len()
    }

    /// All calls so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<ExchangeCall> {
        self.script.lock().calls.clone()
    }

    /// Returns this exchanger as the trait object the store expects.
    #[must_use]
    pub fn shared(&self) -> Arc<dyn Exchanger> {
        Arc::new(self.clone())
    }
}

#[async_trait]
impl Exchanger for ScriptedExchanger {
    async fn exchange(&self, gateway_id: &str, key: &str) -> AuthResult<IssuedToken> {
        let delay = {
            let mut script = self.script.lock();
            script
                .calls
                .push(ExchangeCall { gateway_id: gateway_id.to_owned(), key: key.to_owned() });
            script.delay
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.script.lock().outcome.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_exchanger_records_calls() {
        let exchanger = ScriptedExchanger::returning(IssuedToken::never_expires("t"));

        let issued = exchanger.exchange("eui-1", "k1").await.expect("exchange");
        assert_eq!(issued.token, "t");
        assert_eq!(
            exchanger.calls(),
            vec![ExchangeCall { gateway_id: "eui-1".into(), key: "k1".into() }]
        );
    }

    #[tokio::test]
    async fn test_clones_share_log_and_outcome() {
        let exchanger = ScriptedExchanger::failing(AuthError::exchange("down"));
        let registered = exchanger.shared();

        assert_auth_error!(registered.exchange("eui-1", "k").await, Exchange);

        exchanger.set_outcome(Ok(IssuedToken::never_expires("up")));
        assert_eq!(registered.exchange("eui-1", "k").await.expect("exchange").token, "up");
        assert_eq!(exchanger.call_count(), 2);
    }
}
