use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per user id, created on first use. The engine takes the
/// owner's lock around its read-validate-write sequence so two concurrent
/// submissions for the same user cannot both pass the overlap and quota
/// checks. Operations for different users never contend.
#[derive(Default)]
pub struct UserLocks {
    locks: DashMap<u64, Arc<Mutex<()>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquires the lock for `user_id`, registering it on first use.
    /// Entries are never pruned; the registry grows by one small entry per
    /// distinct user seen during the process lifetime.
    pub async fn acquire(&self, user_id: u64) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        lock.lock_owned().await
    }
}
