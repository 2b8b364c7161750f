//! Per-match serialization
//!
//! Each match code gets its own async mutex. Everything that reads and then
//! writes a match holds that code's lock for the whole read-modify-write, so
//! two operations on one match never interleave while different matches never
//! wait on each other.
//!
//! Entries only live while someone holds or waits on them. Dropping the last
//! [`MatchGuard`] for a code removes its mutex from the registry.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Default)]
pub struct MatchLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

/// Exclusive access to one match; releases the registry entry on drop
pub struct MatchGuard<'a> {
    locks: &'a MatchLocks,
    code: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for MatchGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.locks.release(&self.code);
    }
}

impl MatchLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `code`
    pub async fn lock(&self, code: &str) -> MatchGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock();
            locks
                .entry(code.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        let guard = lock.lock_owned().await;
        MatchGuard {
            locks: self,
            code: code.to_string(),
            guard: Some(guard),
        }
    }

    /// Drop the entry for `code` if nobody holds or waits on it
    fn release(&self, code: &str) {
        let mut locks = self.locks.lock();
        if locks.get(code).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(code);
        }
    }

    /// Codes currently held or waited on
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_code_serializes() {
        let locks = MatchLocks::new();
        let _held = locks.lock("AAAA0000").await;

        let waiting = tokio::time::timeout(Duration::from_millis(20), locks.lock("AAAA0000")).await;
        assert!(waiting.is_err(), "second lock on the same code must wait");
    }

    #[tokio::test]
    async fn test_different_codes_do_not_contend() {
        let locks = MatchLocks::new();
        let _a = locks.lock("AAAA0000").await;
        let b = tokio::time::timeout(Duration::from_millis(20), locks.lock("BBBB1111")).await;
        assert!(b.is_ok());
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_entry_removed_when_last_guard_drops() {
        let locks = MatchLocks::new();
        let guard = locks.lock("AAAA0000").await;
        assert_eq!(locks.len(), 1, "held lock stays registered");

        drop(guard);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_entry_kept_while_another_task_waits() {
        let locks = Arc::new(MatchLocks::new());
        let first = locks.lock("AAAA0000").await;

        let waiter = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _second = locks.lock("AAAA0000").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        drop(first);
        assert_eq!(locks.len(), 1, "waiter still holds the entry");
        waiter.await.unwrap();
        assert!(locks.is_empty());
    }
}
