use moka::future::Cache;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Entries untouched for this long are dropped from the table.
/// Must stay far above the duration of one check-and-write.
const LOCK_IDLE: Duration = Duration::from_secs(600);

/// One async mutex per key, so check-then-write sequences on the same key
/// run one at a time while different keys proceed in parallel.
pub struct KeyedLocks<K> {
    locks: Cache<K, Arc<Mutex<()>>>,
}

impl<K> KeyedLocks<K>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            locks: Cache::builder().time_to_idle(LOCK_IDLE).build(),
        }
    }

    pub async fn acquire(&self, key: K) -> OwnedMutexGuard<()> {
        // get_with runs the initializer once per key even under contention
        let lock = self
            .locks
            .get_with(key, async { Arc::new(Mutex::new(())) })
            .await;
        lock.lock_owned().await
    }
}

impl<K> Default for KeyedLocks<K>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
