//! Cached rendering of public read views.

use std::future::Future;

use actix_web::{HttpResponse, http::header::ContentType};
use serde::Serialize;

use folio_core::DomainError;
use folio_infra::view_cache_key;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Serve the view for `path` from the cache, or `load` it and cache the JSON.
///
/// Failures from `load` are returned as-is and never cached.
pub async fn cached_json<T, F, Fut>(state: &AppState, path: &str, load: F) -> AppResult<HttpResponse>
where
    T: Serialize,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let key = view_cache_key(path);
    if let Some(body) = state.cache.get(&key).await {
        tracing::debug!(path = %path, "View cache hit");
        return Ok(json_body(body));
    }

    let value = load().await?;
    let body =
        serde_json::to_string(&value).map_err(|e| DomainError::Unexpected(e.to_string()))?;

    if let Err(e) = state
        .cache
        .set(&key, &body, Some(state.view_cache_ttl))
        .await
    {
        tracing::warn!(path = %path, error = %e, "Failed to cache view");
    }

    Ok(json_body(body))
}

fn json_body(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(body)
}
