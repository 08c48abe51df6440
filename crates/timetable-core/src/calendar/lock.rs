//! Keyed mutex for calendar rebuilds.
//!
//! At most one in-flight sync per calendar name. Entries carry their
//! acquisition time; a holder that never released (crash, lost task) is
//! reclaimed once the TTL elapses, so a leaked entry cannot block the
//! calendar forever.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::{CoreError, Result};

/// Default reclamation TTL for abandoned locks.
pub const LOCK_TTL: Duration = Duration::from_secs(300);

pub struct SyncLocks {
    ttl: Duration,
    held: Mutex<HashMap<String, Instant>>,
}

impl SyncLocks {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            held: Mutex::new(HashMap::new()),
        }
    }

    /// Acquire the lock for `key`, or reject with the remaining wait when a
    /// live holder exists. A holder older than the TTL is treated as
    /// abandoned and reclaimed.
    pub fn try_acquire(&self, key: &str) -> Result<SyncGuard<'_>> {
        let mut held = self.held.lock().expect("lock map poisoned");
        if let Some(acquired_at) = held.get(key) {
            let age = acquired_at.elapsed();
            if age < self.ttl {
                return Err(CoreError::ThrottleRejected {
                    wait_secs: (self.ttl - age).as_secs().max(1),
                });
            }
            tracing::warn!(key, age_secs = age.as_secs(), "reclaiming abandoned sync lock");
        }
        held.insert(key.to_string(), Instant::now());
        Ok(SyncGuard { locks: self, key: key.to_string() })
    }
}

impl Default for SyncLocks {
    fn default() -> Self {
        Self::new(LOCK_TTL)
    }
}

/// Releases the keyed lock on drop, so every exit path -- success, error or
/// panic unwind -- gives the calendar back.
pub struct SyncGuard<'a> {
    locks: &'a SyncLocks,
    key: String,
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut held) = self.locks.held.lock() {
            held.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_rejected_while_held() {
        let locks = SyncLocks::default();
        let guard = locks.try_acquire("БПИ22-01").unwrap();
        match locks.try_acquire("БПИ22-01") {
            Err(CoreError::ThrottleRejected { wait_secs }) => assert!(wait_secs <= 300),
            other => panic!("expected throttle, got {:?}", other.map(|_| ())),
        }
        drop(guard);
        assert!(locks.try_acquire("БПИ22-01").is_ok());
    }

    #[test]
    fn different_keys_do_not_contend() {
        let locks = SyncLocks::default();
        let _a = locks.try_acquire("БПИ22-01").unwrap();
        assert!(locks.try_acquire("Иванов И.И.").is_ok());
    }

    #[test]
    fn stale_lock_is_reclaimed_after_ttl() {
        let locks = SyncLocks::new(Duration::from_millis(10));
        let guard = locks.try_acquire("БПИ22-01").unwrap();
        std::mem::forget(guard); // simulate a crashed holder
        std::thread::sleep(Duration::from_millis(20));
        assert!(locks.try_acquire("БПИ22-01").is_ok());
    }
}
