//! Per-key asynchronous mutual exclusion.
//!
//! Domain services use [`KeyedMutex`] to serialize read-modify-write
//! cycles on a single aggregate (one user's order, one product's
//! rating set) without blocking operations on unrelated keys.
//!
//! # Usage
//!
//! ```rust
//! use keyed_lock::KeyedMutex;
//!
//! # async fn example() {
//! let locks: KeyedMutex<u64> = KeyedMutex::new();
//! let _guard = locks.lock(42).await;
//! // critical section for key 42; other keys remain unlocked
//! # }
//! ```

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// An async mutex keyed by an arbitrary hashable value.
///
/// Clones share the same underlying lock table. Slots are created on
/// first use and retained for the lifetime of the table; the expected
/// key space (users, products) is small enough that no eviction is
/// performed.
#[derive(Debug, Default, Clone)]
pub struct KeyedMutex<K> {
    slots: Arc<Mutex<HashMap<K, Arc<Mutex<()>>>>>,
}

impl<K: Eq + Hash + Clone> KeyedMutex<K> {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Acquire the lock for `key`, creating its slot on first use.
    ///
    /// The returned guard releases the lock on drop. Holding the guard
    /// across `.await` points is the intended usage.
    pub async fn lock(&self, key: K) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().await;
            slots.entry(key).or_default().clone()
        };
        slot.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::time::Duration;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_same_key_serializes() {
        let locks: KeyedMutex<Uuid> = KeyedMutex::new();
        let key = Uuid::now_v7();
        let counter = Arc::new(AtomicI32::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let counter = Arc::clone(&counter);
            handles.push(tokio::spawn(async move {
                let _guard = locks.lock(key).await;
                // Non-atomic read-modify-write; only safe under the lock.
                let seen = counter.load(Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(1)).await;
                counter.store(seen + 1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks: KeyedMutex<Uuid> = KeyedMutex::new();
        let held = Uuid::now_v7();
        let other = Uuid::now_v7();

        let _guard = locks.lock(held).await;

        // Locking an unrelated key must complete immediately.
        tokio::time::timeout(Duration::from_secs(1), locks.lock(other))
            .await
            .expect("unrelated key should not contend");
    }

    #[tokio::test]
    async fn test_guard_drop_releases() {
        let locks: KeyedMutex<u64> = KeyedMutex::new();
        {
            let _guard = locks.lock(7).await;
        }
        tokio::time::timeout(Duration::from_secs(1), locks.lock(7))
            .await
            .expect("lock should be free after guard drop");
    }
}
