//! Time-aware caching with an injectable clock.
//!
//! This module provides a small TTL cache keyed by string, used to avoid
//! redundant remote identity verification. Entries expire after a fixed
//! time-to-live and the least recently used entries are evicted once a
//! size cap is reached, so an attacker cycling credentials cannot exhaust
//! memory. A miss is never an error; callers simply re-verify.

use std::sync::Arc;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use tokio::sync::RwLock;

/// Default maximum number of entries before LRU eviction.
const DEFAULT_MAX_ENTRIES: usize = 10000;

/// A monotonic time source.
///
/// Production code uses [`SystemClock`]; tests inject a manual clock to
/// exercise expiry without sleeping.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// The real clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A TTL cache with LRU eviction.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use chat_core::TtlCache;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let cache: TtlCache<String> = TtlCache::new(Duration::from_secs(60));
///     cache.insert("token", "user-1".to_string()).await;
///     assert_eq!(cache.get("token").await, Some("user-1".to_string()));
/// }
/// ```
pub struct TtlCache<V: Clone + Send + Sync> {
    /// Map from key to (value, inserted_at).
    /// Uses IndexMap to maintain insertion order for LRU eviction.
    entries: RwLock<IndexMap<String, (V, Instant)>>,
    ttl: Duration,
    max_entries: usize,
    clock: Arc<dyn Clock>,
}

impl<V: Clone + Send + Sync> TtlCache<V> {
    /// Create a cache with the given TTL and the default size cap.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, DEFAULT_MAX_ENTRIES, Arc::new(SystemClock))
    }

    /// Create a cache with a custom size cap and clock.
    pub fn with_clock(ttl: Duration, max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(IndexMap::new()),
            ttl,
            max_entries,
            clock,
        }
    }

    /// Look up a key, returning `None` for missing or expired entries.
    ///
    /// A hit marks the entry as recently used; an expired entry is removed.
    pub async fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;

        let (value, inserted_at) = entries.shift_remove(key)?;
        if now.duration_since(inserted_at) >= self.ttl {
            return None;
        }

        // Re-insert at the end to mark as recently used
        entries.insert(key.to_string(), (value.clone(), inserted_at));
        Some(value)
    }

    /// Insert a value, resetting its TTL.
    pub async fn insert(&self, key: &str, value: V) {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;

        entries.shift_remove(key);
        entries.insert(key.to_string(), (value, now));

        while entries.len() > self.max_entries {
            entries.shift_remove_index(0);
        }
    }

    /// Remove a key.
    pub async fn remove(&self, key: &str) {
        let mut entries = self.entries.write().await;
        entries.shift_remove(key);
    }

    /// Current number of entries, including not-yet-collected expired ones.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.len()
    }

    /// Whether the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// A clock that only advances when told to.
    struct ManualClock {
        now: Mutex<Instant>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                now: Mutex::new(Instant::now()),
            }
        }

        fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.now.lock().unwrap()
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        cache.insert("a", 1).await;
        assert_eq!(cache.get("a").await, Some(1));
        assert_eq!(cache.get("missing").await, None);
    }

    #[tokio::test]
    async fn test_expiry() {
        let clock = Arc::new(ManualClock::new());
        let cache: TtlCache<u32> =
            TtlCache::with_clock(Duration::from_secs(60), 100, clock.clone());

        cache.insert("a", 1).await;
        clock.advance(Duration::from_secs(59));
        assert_eq!(cache.get("a").await, Some(1));

        clock.advance(Duration::from_secs(2));
        assert_eq!(cache.get("a").await, None);
    }

    #[tokio::test]
    async fn test_insert_resets_ttl() {
        let clock = Arc::new(ManualClock::new());
        let cache: TtlCache<u32> =
            TtlCache::with_clock(Duration::from_secs(60), 100, clock.clone());

        cache.insert("a", 1).await;
        clock.advance(Duration::from_secs(45));
        cache.insert("a", 2).await;
        clock.advance(Duration::from_secs(45));

        // 90s after the first insert but only 45s after the second
        assert_eq!(cache.get("a").await, Some(2));
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let clock = Arc::new(ManualClock::new());
        let cache: TtlCache<u32> = TtlCache::with_clock(Duration::from_secs(60), 3, clock);

        cache.insert("a", 1).await;
        cache.insert("b", 2).await;
        cache.insert("c", 3).await;

        // Touch "a" so "b" becomes the eviction candidate
        let _ = cache.get("a").await;
        cache.insert("d", 4).await;

        assert_eq!(cache.len().await, 3);
        assert_eq!(cache.get("b").await, None);
        assert_eq!(cache.get("a").await, Some(1));
        assert_eq!(cache.get("d").await, Some(4));
    }

    #[tokio::test]
    async fn test_remove() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        cache.insert("a", 1).await;
        cache.remove("a").await;
        assert_eq!(cache.get("a").await, None);
        assert!(cache.is_empty().await);
    }
}
