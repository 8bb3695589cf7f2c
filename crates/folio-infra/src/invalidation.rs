//! Invalidation of the rendered public view cache.

use std::sync::Arc;

use async_trait::async_trait;

use folio_core::ports::{Cache, CacheInvalidator};

/// Cache key under which the rendered view for `path` is stored.
pub fn view_cache_key(path: &str) -> String {
    format!("view:{path}")
}

/// Drops cached public views when their content changes.
pub struct ViewCacheInvalidator {
    cache: Arc<dyn Cache>,
}

impl ViewCacheInvalidator {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl CacheInvalidator for ViewCacheInvalidator {
    async fn invalidate(&self, path: &str) {
        match self.cache.delete(&view_cache_key(path)).await {
            Ok(()) => tracing::debug!(path = %path, "View invalidated"),
            // A stale view expires on its own TTL; the write already succeeded.
            Err(e) => tracing::warn!(path = %path, error = %e, "View invalidation failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCache;

    #[tokio::test]
    async fn test_invalidate_drops_only_that_view() {
        let cache = Arc::new(InMemoryCache::new());
        cache.set(&view_cache_key("/blog"), "[]", None).await.unwrap();
        cache.set(&view_cache_key("/projects"), "[]", None).await.unwrap();

        ViewCacheInvalidator::new(cache.clone())
            .invalidate("/blog")
            .await;

        assert_eq!(cache.get("view:/blog").await, None);
        assert_eq!(cache.get("view:/projects").await, Some("[]".to_string()));
    }
}
