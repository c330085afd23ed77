//! Integration tests for the Redis hash store against a real server.
//!
//! These tests are skipped unless the `RUN_REDIS_INTEGRATION_TESTS`
//! environment variable is set.
//!
//! # Running the tests
//!
//! ```bash
//! docker run --rm -p 6379:6379 redis:7
//!
//! RUN_REDIS_INTEGRATION_TESTS=1 \
//! REDIS_URL=redis://localhost:6379 \
//! cargo test -p gateway-auth-storage-redis --test real_redis_integration
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    env,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use gateway_auth_storage::{HashStore, StorageError, conformance};
use gateway_auth_storage_redis::{RedisBackendConfig, RedisHashStore};

// ============================================================================
// Test Configuration
// ============================================================================

/// Counter for unique key prefixes, so tests never share hashes.
static PREFIX_COUNTER: AtomicU64 = AtomicU64::new(0);

fn should_run() -> bool {
    env::var("RUN_REDIS_INTEGRATION_TESTS").is_ok()
}

fn redis_url() -> String {
    env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
}

fn unique_prefix() -> String {
    format!(
        "gateway-auth-test:{}:{}:",
        std::process::id(),
        PREFIX_COUNTER.fetch_add(1, Ordering::SeqCst)
    )
}

async fn create_test_store() -> RedisHashStore {
    let config = RedisBackendConfig::builder().url(redis_url()).build().expect("valid config");
    RedisHashStore::new(config).await.expect("store creation should succeed")
}

macro_rules! skip_unless_enabled {
    () => {
        if !should_run() {
            eprintln!("Skipping real Redis test (RUN_REDIS_INTEGRATION_TESTS not set)");
            return;
        }
    };
}

// ============================================================================
// Conformance
// ============================================================================

#[tokio::test]
async fn test_real_redis_get_all_missing_is_not_found() {
    skip_unless_enabled!();
    conformance::get_all_missing_is_not_found(&create_test_store().await, &unique_prefix()).await;
}

#[tokio::test]
async fn test_real_redis_get_missing_key_is_not_found() {
    skip_unless_enabled!();
    conformance::get_missing_key_is_not_found(&create_test_store().await, &unique_prefix()).await;
}

#[tokio::test]
async fn test_real_redis_get_missing_field_is_not_found() {
    skip_unless_enabled!();
    conformance::get_missing_field_is_not_found(&create_test_store().await, &unique_prefix())
        .await;
}

#[tokio::test]
async fn test_real_redis_set_then_get() {
    skip_unless_enabled!();
    conformance::set_then_get_returns_value(&create_test_store().await, &unique_prefix()).await;
}

#[tokio::test]
async fn test_real_redis_multi_set_preserves_other_fields() {
    skip_unless_enabled!();
    conformance::multi_set_preserves_other_fields(&create_test_store().await, &unique_prefix())
        .await;
}

#[tokio::test]
async fn test_real_redis_set_overwrites_existing() {
    skip_unless_enabled!();
    conformance::set_overwrites_existing(&create_test_store().await, &unique_prefix()).await;
}

#[tokio::test]
async fn test_real_redis_empty_value_is_present() {
    skip_unless_enabled!();
    conformance::empty_value_is_present(&create_test_store().await, &unique_prefix()).await;
}

#[tokio::test]
async fn test_real_redis_delete_removes_whole_hash() {
    skip_unless_enabled!();
    conformance::delete_removes_whole_hash(&create_test_store().await, &unique_prefix()).await;
}

#[tokio::test]
async fn test_real_redis_delete_missing_is_noop() {
    skip_unless_enabled!();
    conformance::delete_missing_is_noop(&create_test_store().await, &unique_prefix()).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_real_redis_concurrent_multi_set_is_atomic() {
    skip_unless_enabled!();
    let store = Arc::new(create_test_store().await);
    conformance::concurrent_multi_set_is_atomic(store, &unique_prefix()).await;
}

// ============================================================================
// Connection Behavior
// ============================================================================

#[tokio::test]
async fn test_real_redis_health_check() {
    skip_unless_enabled!();
    create_test_store().await.health_check().await.expect("PING should succeed");
}

#[tokio::test]
async fn test_real_redis_clones_share_connection() {
    skip_unless_enabled!();
    let store = create_test_store().await;
    let clone = store.clone();
    let key = format!("{}shared", unique_prefix());

    store.hash_set(&key, "token", "t").await.expect("hash_set");
    assert_eq!(clone.hash_get(&key, "token").await.expect("hash_get"), "t");

    clone.delete(&key).await.expect("cleanup");
}

#[tokio::test]
async fn test_real_redis_unreachable_server_fails_to_connect() {
    skip_unless_enabled!();
    let config = RedisBackendConfig::builder()
        .url("redis://127.0.0.1:1")
        .connection_timeout(Duration::from_millis(200))
        .build()
        .expect("valid config");

    let err = RedisHashStore::new(config).await.expect_err("port 1 should refuse connections");
    let storage_err: StorageError = err.into();
    assert!(storage_err.is_transient(), "expected a transient error, got {storage_err:?}");
}
