//! Integration test verifying the spans and events `CredentialStore` emits,
//! and that secrets never end up in span fields.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use chrono::Utc;
use gateway_auth::{
    CredentialStore, GatewayAuthenticator, IssuedToken, testutil::ScriptedExchanger,
};
use gateway_auth_storage::{
    StorageError,
    testutil::{FaultyHashStore, HashOp},
};
use tracing::{
    Level, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{layer::SubscriberExt, registry::LookupSpan};

// ---------------------------------------------------------------------------
// Collecting layer: span names with their recorded fields, and events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct RecordedSpan {
    name: String,
    fields: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
struct RecordedEvent {
    level: Level,
    message: String,
}

#[derive(Default)]
struct FieldVisitor {
    fields: Vec<(String, String)>,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.fields.push((field.name().to_owned(), format!("{value:?}")));
    }
}

#[derive(Clone, Default)]
struct Collector {
    spans: Arc<Mutex<Vec<RecordedSpan>>>,
    events: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl<S> tracing_subscriber::Layer<S> for Collector
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor::default();
        attrs.record(&mut visitor);
        self.spans.lock().expect("lock poisoned").push(RecordedSpan {
            name: attrs.metadata().name().to_owned(),
            fields: visitor.fields,
        });
    }

    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let message = visitor
            .fields
            .iter()
            .find(|(name, _)| name == "message")
            .map(|(_, value)| value.clone())
            .unwrap_or_default();
        self.events
            .lock()
            .expect("lock poisoned")
            .push(RecordedEvent { level: *event.metadata().level(), message });
    }
}

impl Collector {
    fn span(&self, name: &str) -> RecordedSpan {
        self.spans
            .lock()
            .expect("lock poisoned")
            .iter()
            .find(|span| span.name == name)
            .cloned()
            .unwrap_or_else(|| panic!("no '{name}' span recorded"))
    }

    fn events_at(&self, level: Level) -> Vec<String> {
        self.events
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|event| event.level == level)
            .map(|event| event.message.clone())
            .collect()
    }
}

fn assert_no_secret(span: &RecordedSpan, secret: &str) {
    for (name, value) in &span.fields {
        assert!(!value.contains(secret), "span '{}' leaked secret in field '{name}'", span.name);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn operations_create_spans_with_gateway_id() {
    let collector = Collector::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(collector.clone()));

    let store = CredentialStore::new(Arc::new(FaultyHashStore::new()), "");
    store.set_key("eui-1", "k3y-s3cret").await.expect("set_key");
    store.set_token("eui-1", "t0ken-s3cret", None).await.expect("set_token");
    store.validate_key("eui-1", "k3y-s3cret").await.expect("validate_key");
    store.get_token("eui-1").await.expect("get_token");
    store.delete("eui-1").await.expect("delete");

    for name in ["set_key", "set_token", "validate_key", "get_token", "delete"] {
        let span = collector.span(name);
        assert!(
            span.fields
                .iter()
                .any(|(field, value)| field == "gateway_id" && value.contains("eui-1")),
            "span '{name}' should record gateway_id, got {:?}",
            span.fields
        );
        assert_no_secret(&span, "s3cret");
    }
}

#[tokio::test]
async fn store_spans_are_emitted_by_adapter_operations() {
    let collector = Collector::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(collector.clone()));

    let store = CredentialStore::new(Arc::new(gateway_auth_storage::MemoryHashStore::new()), "");
    store.set_token("eui-1", "tok", None).await.expect("set_token");

    collector.span("hash_multi_set");
}

#[tokio::test]
async fn persist_failure_is_logged_as_warning() {
    let collector = Collector::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(collector.clone()));

    let backend = FaultyHashStore::new();
    let store = CredentialStore::new(Arc::new(backend.clone()), "");
    let exchanger = ScriptedExchanger::returning(IssuedToken::new(
        "newtok",
        Utc::now() + chrono::Duration::hours(1),
    ));
    store.set_exchanger(Some(exchanger.shared()));
    store.set_key("eui-1", "K").await.expect("set_key");
    backend.fail(HashOp::MultiSet, StorageError::connection("redis down"));

    assert_eq!(store.get_token("eui-1").await.expect("get_token"), "newtok");

    let warnings = collector.events_at(Level::WARN);
    assert!(
        warnings.iter().any(|message| message.contains("failed to persist exchanged token")),
        "expected a persist warning, got {warnings:?}"
    );
}

#[tokio::test]
async fn exchanger_registration_is_logged() {
    let collector = Collector::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(collector.clone()));

    let store = CredentialStore::new(Arc::new(FaultyHashStore::new()), "");
    let exchanger = ScriptedExchanger::returning(IssuedToken::never_expires("t"));
    store.set_exchanger(Some(exchanger.shared()));
    store.set_exchanger(None);

    let infos = collector.events_at(Level::INFO);
    assert!(infos.iter().any(|m| m.contains("token exchanger registered")), "got {infos:?}");
    assert!(infos.iter().any(|m| m.contains("token exchanger unregistered")), "got {infos:?}");
}
