//! Cache invalidation signal for the rendering layer.

use async_trait::async_trait;

/// Fire-and-forget "re-render path X" notification.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    async fn invalidate(&self, path: &str);
}
