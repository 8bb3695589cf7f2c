//! External asset store port.

use async_trait::async_trait;

/// Storage for uploaded images.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Best-effort removal of a previously uploaded image.
    ///
    /// `Ok(false)` means the store declined; both that and `Err` count as a failed release.
    async fn delete_image(&self, url: &str) -> Result<bool, AssetError>;
}

/// Asset store errors.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset store request failed: {0}")]
    Request(String),

    #[error("Could not derive a file key from '{0}'")]
    InvalidUrl(String),
}
