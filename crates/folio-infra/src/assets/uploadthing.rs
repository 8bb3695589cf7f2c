use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use folio_core::ports::{AssetError, AssetStore};

const DELETE_PATH: &str = "/v6/deleteFiles";
const API_KEY_HEADER: &str = "x-uploadthing-api-key";

/// UploadThing credentials.
#[derive(Debug, Clone)]
pub struct UploadThingConfig {
    pub api_key: String,
    pub api_url: String,
    pub timeout: Duration,
}

impl UploadThingConfig {
    pub const DEFAULT_API_URL: &'static str = "https://api.uploadthing.com";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: Self::DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteFilesRequest<'a> {
    file_keys: [&'a str; 1],
}

#[derive(Deserialize)]
struct DeleteFilesResponse {
    success: bool,
}

/// Deletes uploaded images through the UploadThing REST API.
///
/// Files are addressed by key, which is the last path segment of the
/// public URL (`https://utfs.io/f/<key>`).
pub struct UploadThingAssetStore {
    client: reqwest::Client,
    config: UploadThingConfig,
}

impl UploadThingAssetStore {
    pub fn new(config: UploadThingConfig) -> Result<Self, AssetError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AssetError::Request(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}{DELETE_PATH}", self.config.api_url.trim_end_matches('/'))
    }
}

/// File key for an UploadThing URL.
pub fn file_key(url: &str) -> Result<String, AssetError> {
    let parsed = Url::parse(url).map_err(|_| AssetError::InvalidUrl(url.to_string()))?;
    parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AssetError::InvalidUrl(url.to_string()))
}

#[async_trait]
impl AssetStore for UploadThingAssetStore {
    async fn delete_image(&self, url: &str) -> Result<bool, AssetError> {
        let key = file_key(url)?;

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&DeleteFilesRequest { file_keys: [key.as_str()] })
            .send()
            .await
            .map_err(|e| AssetError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(file_key = %key, status = %status, "UploadThing rejected delete");
            return Ok(false);
        }

        let body: DeleteFilesResponse = response
            .json()
            .await
            .map_err(|e| AssetError::Request(e.to_string()))?;
        tracing::debug!(file_key = %key, success = body.success, "UploadThing delete finished");
        Ok(body.success)
    }
}
