//! Per-resource mutual exclusion

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Guard for one resource key; the key is released when it drops.
pub type KeyGuard = OwnedMutexGuard<()>;

/// Table of async locks keyed by resource, e.g. `"dns_zone:example.com"`.
///
/// Entries are created on first use and held weakly, so a key nobody holds or
/// waits on is pruned on the next acquisition.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    entries: Mutex<HashMap<String, Weak<Mutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock `key`, waiting while another task holds it.
    pub async fn acquire(&self, key: &str) -> KeyGuard {
        let lock = {
            let mut entries = self.entries.lock().await;
            entries.retain(|_, weak| weak.strong_count() > 0);
            if let Some(existing) = entries.get(key).and_then(Weak::upgrade) {
                existing
            } else {
                let created = Arc::new(Mutex::new(()));
                entries.insert(key.to_string(), Arc::downgrade(&created));
                created
            }
        };
        log::debug!("[locks] waiting for {key}");
        lock.lock_owned().await
    }

    /// Number of keys currently held or awaited.
    pub async fn active_keys(&self) -> usize {
        self.entries
            .lock()
            .await
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

/// Lock key of a resource in a family.
pub fn resource_key(family: &str, name: &str) -> String {
    format!("{family}:{name}")
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn same_key_is_exclusive() {
        let locks = Arc::new(KeyedLocks::new());
        let guard = locks.acquire("dns_zone:river.com").await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _g = locks.acquire("dns_zone:river.com").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn different_keys_do_not_block() {
        let locks = KeyedLocks::new();
        let _a = locks.acquire("dns_zone:river.com").await;
        let _b = locks.acquire("gtm_domain:river.com").await;
        assert_eq!(locks.active_keys().await, 2);
    }

    #[tokio::test]
    async fn released_keys_are_pruned() {
        let locks = KeyedLocks::new();
        drop(locks.acquire("dns_zone:a.com").await);
        drop(locks.acquire("dns_zone:b.com").await);
        assert_eq!(locks.active_keys().await, 0);

        let _c = locks.acquire("dns_zone:c.com").await;
        assert_eq!(locks.entries.lock().await.len(), 1);
    }

    #[test]
    fn key_format() {
        assert_eq!(resource_key("gtm_domain", "example.akadns.net"), "gtm_domain:example.akadns.net");
    }
}
