//! Process-local page cache, used when no Redis server is configured.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;

use yatube_core::ports::{Cache, CacheError, Clock, SystemClock};

struct Slot {
    page: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Slot {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

/// Pages keyed by string, expired against an injected [`Clock`].
///
/// Dead slots are dropped lazily on read and swept on every write, so the map
/// only grows with the number of pages requested within one TTL.
pub struct InMemoryCache {
    slots: RwLock<HashMap<String, Slot>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of slots currently held, live or not yet swept.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }

    /// Remove `key` only if it is still dead at `now`. A writer may have
    /// replaced it between our read and this write lock.
    async fn evict_if_dead(&self, key: &str, now: DateTime<Utc>) {
        let mut slots = self.slots.write().await;
        if slots.get(key).is_some_and(|slot| !slot.is_live(now)) {
            tracing::trace!(cache_key = %key, "Dropping expired page");
            slots.remove(key);
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        {
            let slots = self.slots.read().await;
            match slots.get(key) {
                None => return None,
                Some(slot) if slot.is_live(now) => return Some(slot.page.clone()),
                Some(_) => {}
            }
        }

        self.evict_if_dead(key, now).await;
        None
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let now = self.clock.now();
        let expires_at = ttl
            .map(|ttl| {
                TimeDelta::from_std(ttl)
                    .map(|ttl| now + ttl)
                    .map_err(|e| CacheError::Operation(e.to_string()))
            })
            .transpose()?;

        let mut slots = self.slots.write().await;
        slots.retain(|_, slot| slot.is_live(now));
        slots.insert(
            key.to_string(),
            Slot {
                page: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.slots.write().await.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> bool {
        self.get(key).await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const TTL: Duration = Duration::from_secs(20);

    fn cache_at_now() -> (Arc<ManualClock>, InMemoryCache) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = InMemoryCache::with_clock(clock.clone());
        (clock, cache)
    }

    #[tokio::test]
    async fn entry_without_ttl_stays() {
        let (clock, cache) = cache_at_now();
        cache.set("about", "<html>", None).await.unwrap();

        clock.advance(TimeDelta::days(365));

        assert_eq!(cache.get("about").await.as_deref(), Some("<html>"));
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let (_, cache) = cache_at_now();
        cache.set("index_page:1", "<html>", Some(TTL)).await.unwrap();
        cache.delete("index_page:1").await.unwrap();

        assert!(!cache.exists("index_page:1").await);
    }

    #[tokio::test]
    async fn entry_dies_exactly_at_deadline() {
        let (clock, cache) = cache_at_now();
        cache.set("index_page:1", "<html>", Some(TTL)).await.unwrap();

        clock.advance(TimeDelta::seconds(19));
        assert!(cache.exists("index_page:1").await);

        clock.advance(TimeDelta::seconds(1));
        assert_eq!(cache.get("index_page:1").await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn eviction_spares_a_replacement_written_meanwhile() {
        let (clock, cache) = cache_at_now();
        cache.set("index_page:1", "old", Some(TTL)).await.unwrap();
        let expired_at = clock.now() + TimeDelta::seconds(20);

        // A reader saw the old slot dead at `expired_at`; before it evicts,
        // another request stores a fresh page.
        clock.set(expired_at);
        cache.set("index_page:1", "new", Some(TTL)).await.unwrap();
        cache.evict_if_dead("index_page:1", expired_at).await;

        assert_eq!(cache.get("index_page:1").await.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn writes_sweep_dead_slots() {
        let (clock, cache) = cache_at_now();
        for page in 1..=5 {
            cache
                .set(&format!("index_page:{page}"), "<html>", Some(TTL))
                .await
                .unwrap();
        }

        clock.advance(TimeDelta::seconds(30));
        cache.set("index_page:1", "fresh", Some(TTL)).await.unwrap();

        assert_eq!(cache.len().await, 1);
    }
}
