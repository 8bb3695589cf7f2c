//! Data Transfer Objects - response types for the API.
//!
//! Entities serialize as themselves (camelCase); these types cover the
//! responses that add derived data.

use serde::Serialize;

use folio_core::domain::Post;
use folio_core::sanitize::reading_time_minutes;

/// A published post as rendered on its own page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    /// Estimated minutes to read at 200 words per minute.
    pub reading_time: usize,
}

impl From<Post> for PostDetail {
    fn from(post: Post) -> Self {
        let reading_time = reading_time_minutes(&post.content);
        Self { post, reading_time }
    }
}

/// Liveness/readiness report.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// `"connected"`, `"unreachable"` or `"in-memory"`.
    pub storage: &'static str,
}
