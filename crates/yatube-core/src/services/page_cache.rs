//! Whole-page cache in front of rendered listings.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::ports::Cache;

/// Caches rendered pages for a fixed TTL.
///
/// Within the TTL every caller sees the same snapshot, even if the
/// underlying listing has changed.
#[derive(Clone)]
pub struct PageCache {
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl PageCache {
    pub fn new(cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Return the cached page under `key`, rendering and storing it on a miss.
    pub async fn get_or_render<F, Fut, E>(&self, key: &str, render: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        if let Some(page) = self.cache.get(key).await {
            tracing::debug!(cache_key = %key, "Page cache hit");
            return Ok(page);
        }

        let page = render().await?;
        if let Err(e) = self.cache.set(key, &page, Some(self.ttl)).await {
            tracing::warn!(cache_key = %key, error = %e, "Failed to store rendered page");
        }
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::CacheError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct MapCache(Mutex<HashMap<String, String>>);

    #[async_trait]
    impl Cache for MapCache {
        async fn get(&self, key: &str) -> Option<String> {
            self.0.lock().await.get(key).cloned()
        }

        async fn set(&self, key: &str, value: &str, _ttl: Option<Duration>) -> Result<(), CacheError> {
            self.0.lock().await.insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<(), CacheError> {
            self.0.lock().await.remove(key);
            Ok(())
        }

        async fn exists(&self, key: &str) -> bool {
            self.0.lock().await.contains_key(key)
        }
    }

    #[tokio::test]
    async fn second_call_is_served_from_cache() {
        let pages = PageCache::new(Arc::new(MapCache::default()), Duration::from_secs(20));

        let first: Result<String, ()> = pages.get_or_render("index_page:1", || async { Ok("one".to_string()) }).await;
        let second: Result<String, ()> = pages.get_or_render("index_page:1", || async { Ok("two".to_string()) }).await;

        assert_eq!(first.unwrap(), "one");
        assert_eq!(second.unwrap(), "one");
    }

    #[tokio::test]
    async fn render_errors_are_not_cached() {
        let pages = PageCache::new(Arc::new(MapCache::default()), Duration::from_secs(20));

        let failed: Result<String, &str> = pages.get_or_render("k", || async { Err("boom") }).await;
        let rendered: Result<String, &str> = pages.get_or_render("k", || async { Ok("page".to_string()) }).await;

        assert!(failed.is_err());
        assert_eq!(rendered.unwrap(), "page");
    }
}
