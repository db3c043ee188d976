//! Per-user mutation locks.
//!
//! The store offers last-write-wins semantics, so two concurrent
//! read-modify-write sequences on the same roadmap document would lose
//! updates. Every roadmap mutation path acquires the owning user's lock for
//! the duration of its load-merge-persist sequence.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct UserLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for one user. Entries are never evicted; the
    /// per-user footprint is a single Arc'd mutex.
    pub async fn acquire(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(user_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
