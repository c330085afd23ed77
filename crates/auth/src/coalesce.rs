//! Per-gateway exchange locks.
//!
//! Used when exchange coalescing is enabled: callers that need a fresh token
//! for the same gateway take turns, and each re-reads the record after
//! acquiring the lock. Entries are dropped from the table once nobody holds
//! or waits on them.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub(crate) struct ExchangeLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl ExchangeLocks {
    /// Waits for exclusive access to `gateway_id`'s exchange.
    pub(crate) async fn acquire(&self, gateway_id: &str) -> ExchangeGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock();
            Arc::clone(locks.entry(gateway_id.to_owned()).or_default())
        };

        // Built before awaiting so a cancelled wait still cleans up its entry.
        let mut guard = ExchangeGuard { locks: self, gateway_id: gateway_id.to_owned(), held: None };
        guard.held = Some(lock.lock_owned().await);
        guard
    }

    /// Number of gateways with a held or awaited lock.
    pub(crate) fn len(&self) -> usize {
        self.locks.lock().len()
    }

    fn release(&self, gateway_id: &str) {
        let mut locks = self.locks.lock();
        // The table's own reference is the last one.
        if locks.get(gateway_id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(gateway_id);
        }
    }
}

pub(crate) struct ExchangeGuard<'a> {
    locks: &'a ExchangeLocks,
    gateway_id: String,
    held: Option<OwnedMutexGuard<()>>,
}

impl Drop for ExchangeGuard<'_> {
    fn drop(&mut self) {
        drop(self.held.take());
        self.locks.release(&self.gateway_id);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_entry_removed_after_release() {
        let locks = ExchangeLocks::default();

        let guard = locks.acquire("eui-1").await;
        assert_eq!(locks.len(), 1);

        drop(guard);
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn test_distinct_gateways_do_not_contend() {
        let locks = ExchangeLocks::default();

        let _a = locks.acquire("eui-1").await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.acquire("eui-2")).await;

        assert!(b.is_ok(), "a different gateway should not wait");
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_same_gateway_waits_for_holder() {
        let locks = Arc::new(ExchangeLocks::default());
        let guard = locks.acquire("eui-1").await;

        let waiter = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire("eui-1").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished(), "second caller should be waiting");

        drop(guard);
        waiter.await.expect("waiter panicked");
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_wait_does_not_leak_entry() {
        let locks = ExchangeLocks::default();
        let guard = locks.acquire("eui-1").await;

        let timed_out =
            tokio::time::timeout(Duration::from_millis(20), locks.acquire("eui-1")).await;
        assert!(timed_out.is_err());

        drop(guard);
        assert_eq!(locks.len(), 0);
    }
}
