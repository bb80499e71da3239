//! Per-session mutual exclusion.
//!
//! Telecom gateways retry on timeout, so the same turn can arrive twice
//! concurrently. The session row is read-modify-write, so turns for one
//! session id must serialize; turns for different ids proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Upper bound before idle entries are pruned from the registry.
const PRUNE_THRESHOLD: usize = 1024;

/// Registry of one async mutex per gateway session id.
#[derive(Clone, Default)]
pub struct SessionLocks {
    inner: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl SessionLocks {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for one session id, waiting if a duplicate turn
    /// holds it.
    pub async fn acquire(&self, session_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self
                .inner
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if map.len() > PRUNE_THRESHOLD {
                // Entries only the registry still references are idle.
                map.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            map.entry(session_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
