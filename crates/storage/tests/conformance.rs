//! Conformance test suite for `MemoryHashStore`.
//!
//! Each test function corresponds to a single conformance check, providing
//! fine-grained failure reporting.

#![allow(clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use gateway_auth_storage::{MemoryHashStore, conformance};

const PREFIX: &str = "conformance:";

// ============================================================================
// Absence
// ============================================================================

#[tokio::test]
async fn get_all_missing_is_not_found() {
    conformance::get_all_missing_is_not_found(&MemoryHashStore::new(), PREFIX).await;
}

#[tokio::test]
async fn get_missing_key_is_not_found() {
    conformance::get_missing_key_is_not_found(&MemoryHashStore::new(), PREFIX).await;
}

#[tokio::test]
async fn get_missing_field_is_not_found() {
    conformance::get_missing_field_is_not_found(&MemoryHashStore::new(), PREFIX).await;
}

// ============================================================================
// Writes
// ============================================================================

#[tokio::test]
async fn set_then_get_returns_value() {
    conformance::set_then_get_returns_value(&MemoryHashStore::new(), PREFIX).await;
}

#[tokio::test]
async fn multi_set_preserves_other_fields() {
    conformance::multi_set_preserves_other_fields(&MemoryHashStore::new(), PREFIX).await;
}

#[tokio::test]
async fn set_overwrites_existing() {
    conformance::set_overwrites_existing(&MemoryHashStore::new(), PREFIX).await;
}

#[tokio::test]
async fn empty_value_is_present() {
    conformance::empty_value_is_present(&MemoryHashStore::new(), PREFIX).await;
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn delete_removes_whole_hash() {
    conformance::delete_removes_whole_hash(&MemoryHashStore::new(), PREFIX).await;
}

#[tokio::test]
async fn delete_missing_is_noop() {
    conformance::delete_missing_is_noop(&MemoryHashStore::new(), PREFIX).await;
}

// ============================================================================
// Concurrent
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_multi_set_is_atomic() {
    conformance::concurrent_multi_set_is_atomic(Arc::new(MemoryHashStore::new()), PREFIX).await;
}
