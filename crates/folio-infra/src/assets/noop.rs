use async_trait::async_trait;

use folio_core::ports::{AssetError, AssetStore};

/// Used when no asset store is configured. Every release succeeds, so
/// deletes are never blocked by missing storage credentials.
#[derive(Debug, Default)]
pub struct NoopAssetStore;

#[async_trait]
impl AssetStore for NoopAssetStore {
    async fn delete_image(&self, url: &str) -> Result<bool, AssetError> {
        tracing::debug!(url = %url, "No asset store configured; skipping release");
        Ok(true)
    }
}
