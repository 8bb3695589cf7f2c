//! Blog post endpoints.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use folio_core::service::paths;
use folio_shared::{ApiResponse, PostDetail};

use super::authorized_json;
use super::views::cached_json;
use crate::middleware::auth::CallerSession;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts
pub async fn list_published(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    cached_json(&state, paths::BLOG, || state.publishing.list_published_posts()).await
}

/// GET /api/dashboard/posts
pub async fn list_all(
    state: web::Data<AppState>,
    session: CallerSession,
) -> AppResult<HttpResponse> {
    let posts = state.publishing.list_all_posts(session.as_ref()).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.publishing.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// GET /api/posts/slug/{slug}
pub async fn get_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let publishing = &state.publishing;
    cached_json(&state, &paths::blog_post(&slug), || async move {
        let post = publishing.get_published_post_by_slug(&slug).await?;
        Ok(PostDetail::from(post))
    })
    .await
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    session: CallerSession,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let payload = authorized_json(state.publishing.gate(), session.as_ref(), &body)?;
    let post = state
        .publishing
        .create_post(session.as_ref(), &payload)
        .await?;
    Ok(HttpResponse::Created().json(post))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    session: CallerSession,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let payload = authorized_json(state.publishing.gate(), session.as_ref(), &body)?;
    let post = state
        .publishing
        .update_post(session.as_ref(), path.into_inner(), &payload)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    session: CallerSession,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .publishing
        .delete_post(session.as_ref(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Post deleted")))
}
