use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use futures::lock::Mutex as AsyncMutex;

/// Per-user advisory locks. Request-affecting operations (create, update,
/// status change, delete) hold the owner's lock across the
/// {overlap check, balance check, write} sequence, so two concurrent
/// operations for the same user cannot interleave their checks and writes.
/// Operations for different users never contend.
#[derive(Default)]
pub struct UserLocks {
    inner: Mutex<HashMap<u64, Arc<AsyncMutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock for one user, created on first use. The map grows by one
    /// entry per user seen; entries are never evicted.
    pub fn for_user(&self, user_id: u64) -> Arc<AsyncMutex<()>> {
        let mut map = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        map.entry(user_id)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_user_gets_the_same_lock() {
        let locks = UserLocks::new();
        let a = locks.for_user(7);
        let b = locks.for_user(7);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_users_get_independent_locks() {
        let locks = UserLocks::new();
        let a = locks.for_user(1);
        let b = locks.for_user(2);
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[actix_web::test]
    async fn lock_serializes_holders() {
        let locks = UserLocks::new();
        let lock = locks.for_user(1);
        let guard = lock.lock().await;
        // A second holder must not acquire while the guard lives.
        assert!(locks.for_user(1).try_lock().is_none());
        drop(guard);
        assert!(locks.for_user(1).try_lock().is_some());
    }
}
