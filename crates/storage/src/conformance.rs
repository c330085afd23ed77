//! Conformance test suite for [`HashStore`] implementations.
//!
//! Async test functions that validate whether a [`HashStore`] implementation
//! satisfies the trait contract. The in-memory store runs the suite in this
//! crate's `tests/conformance.rs`; the Redis store runs it against a live
//! server in its integration tests.
//!
//! Each function takes a store and a key prefix. Passing a unique prefix per
//! test keeps runs against shared servers isolated.
//!
//! # Usage
//!
//! ```no_run
//! use gateway_auth_storage::{MemoryHashStore, conformance};
//!
//! #[tokio::test]
//! async fn get_all_missing_is_not_found() {
//!     conformance::get_all_missing_is_not_found(&MemoryHashStore::new(), "t:").await;
//! }
//! ```
//!
//! # Test Categories
//!
//! | Category | Contract aspect |
//! |----------|-----------------|
//! | Absence | Missing keys and fields surface as `NotFound` |
//! | Writes | Field-level merge, overwrite, empty values |
//! | Delete | Whole-hash removal, idempotence |
//! | Concurrent | Multi-field writes are never observed half-applied |

use std::sync::Arc;

use crate::{assert_not_found, backend::HashStore, types::field_map};

// ============================================================================
// Absence
// ============================================================================

/// `hash_get_all` on a missing key returns `NotFound`.
pub async fn get_all_missing_is_not_found<S: HashStore>(store: &S, prefix: &str) {
    let key = format!("{prefix}missing");
    assert_not_found!(store.hash_get_all(&key).await);
}

/// `hash_get` on a missing key returns `NotFound`.
pub async fn get_missing_key_is_not_found<S: HashStore>(store: &S, prefix: &str) {
    let key = format!("{prefix}missing");
    assert_not_found!(store.hash_get(&key, "field").await);
}

/// `hash_get` of an absent field on an existing hash returns `NotFound`.
pub async fn get_missing_field_is_not_found<S: HashStore>(store: &S, prefix: &str) {
    let key = format!("{prefix}partial");
    store.hash_set(&key, "present", "1").await.expect("hash_set");
    assert_not_found!(store.hash_get(&key, "absent").await);
}

// ============================================================================
// Writes
// ============================================================================

/// `hash_set` then `hash_get` returns the value.
pub async fn set_then_get_returns_value<S: HashStore>(store: &S, prefix: &str) {
    let key = format!("{prefix}roundtrip");
    store.hash_set(&key, "f", "v").await.expect("hash_set");
    assert_eq!(store.hash_get(&key, "f").await.expect("hash_get"), "v");
}

/// `hash_multi_set` leaves fields it does not name untouched.
pub async fn multi_set_preserves_other_fields<S: HashStore>(store: &S, prefix: &str) {
    let key = format!("{prefix}merge");
    store.hash_set(&key, "key", "secret").await.expect("hash_set");
    store
        .hash_multi_set(&key, &field_map([("token", "t"), ("token_expires", "")]))
        .await
        .expect("hash_multi_set");

    let fields = store.hash_get_all(&key).await.expect("hash_get_all");
    assert_eq!(fields.len(), 3, "unexpected fields: {fields:?}");
    assert_eq!(fields.get("key").map(String::as_str), Some("secret"));
}

/// Writing a field again overwrites it.
pub async fn set_overwrites_existing<S: HashStore>(store: &S, prefix: &str) {
    let key = format!("{prefix}overwrite");
    store.hash_set(&key, "f", "old").await.expect("first hash_set");
    store.hash_multi_set(&key, &field_map([("f", "new")])).await.expect("hash_multi_set");
    assert_eq!(store.hash_get(&key, "f").await.expect("hash_get"), "new");
}

/// An empty string is a present value, distinct from an absent field.
pub async fn empty_value_is_present<S: HashStore>(store: &S, prefix: &str) {
    let key = format!("{prefix}empty");
    store.hash_set(&key, "token_expires", "").await.expect("hash_set");
    assert_eq!(store.hash_get(&key, "token_expires").await.expect("hash_get"), "");
}

// ============================================================================
// Delete
// ============================================================================

/// `delete` removes every field of the hash.
pub async fn delete_removes_whole_hash<S: HashStore>(store: &S, prefix: &str) {
    let key = format!("{prefix}doomed");
    store.hash_multi_set(&key, &field_map([("a", "1"), ("b", "2")])).await.expect("hash_multi_set");
    store.delete(&key).await.expect("delete");

    assert_not_found!(store.hash_get_all(&key).await);
    assert_not_found!(store.hash_get(&key, "a").await);
}

/// `delete` of a missing key succeeds.
pub async fn delete_missing_is_noop<S: HashStore>(store: &S, prefix: &str) {
    let key = format!("{prefix}ghost");
    let result = store.delete(&key).await;
    assert!(result.is_ok(), "delete of missing key should not error: {result:?}");
}

// ============================================================================
// Concurrent
// ============================================================================

/// Readers never observe a multi-field write half-applied.
///
/// Writers alternate between two complete field sets; every read must match
/// one of them exactly.
pub async fn concurrent_multi_set_is_atomic<S: HashStore + 'static>(store: Arc<S>, prefix: &str) {
    let key = format!("{prefix}atomic");
    let first = field_map([("token", "a"), ("token_expires", "2030-01-01T00:00:00Z")]);
    let second = field_map([("token", "b"), ("token_expires", "")]);
    store.hash_multi_set(&key, &first).await.expect("seed");

    let mut writers = Vec::new();
    for task in 0..4 {
        let store = Arc::clone(&store);
        let key = key.clone();
        let fields = if task % 2 == 0 { first.clone() } else { second.clone() };
        writers.push(tokio::spawn(async move {
            for _ in 0..50 {
                store.hash_multi_set(&key, &fields).await.expect("concurrent hash_multi_set");
            }
        }));
    }

    for _ in 0..100 {
        let observed = store.hash_get_all(&key).await.expect("concurrent hash_get_all");
        assert!(observed == first || observed == second, "torn write observed: {observed:?}");
    }

    for writer in writers {
        writer.await.expect("writer task panicked");
    }
}
