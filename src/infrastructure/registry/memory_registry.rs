//! In-process click registry.

use super::service::{ClickRegistry, RegistryResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Process-lifetime IP → token-set map.
///
/// Unbounded and never evicted: memory grows with distinct `(ip, token)`
/// pairs until restart. Use [`super::RedisClickRegistry`] with a TTL when that
/// matters.
///
/// The check-and-insert runs under a single mutex acquisition, so it is
/// atomic on a multi-threaded runtime. No `.await` happens while the lock
/// is held.
#[derive(Debug, Default)]
pub struct InMemoryClickRegistry {
    seen: Mutex<HashMap<String, HashSet<String>>>,
}

impl InMemoryClickRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, HashSet<String>>> {
        // A panic elsewhere cannot leave the map half-updated: insert is the only mutation.
        self.seen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Synchronous compare-and-insert.
    pub fn record(&self, ip: &str, token: &str) -> bool {
        let mut seen = self.lock();

        match seen.get_mut(ip) {
            Some(tokens) => {
                if tokens.contains(token) {
                    false
                } else {
                    tokens.insert(token.to_string())
                }
            }
            None => {
                seen.insert(ip.to_string(), HashSet::from([token.to_string()]));
                true
            }
        }
    }

    /// Number of distinct source IPs observed.
    pub fn tracked_ips(&self) -> usize {
        self.lock().len()
    }
}

#[async_trait]
impl ClickRegistry for InMemoryClickRegistry {
    async fn check_and_record(&self, ip: &str, token: &str) -> RegistryResult<bool> {
        Ok(self.record(ip, token))
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
