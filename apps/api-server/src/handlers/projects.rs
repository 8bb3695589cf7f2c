//! Portfolio project endpoints.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use folio_core::service::paths;
use folio_shared::ApiResponse;

use super::authorized_json;
use super::views::cached_json;
use crate::middleware::auth::CallerSession;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/projects
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    cached_json(&state, paths::PROJECTS, || state.publishing.list_projects()).await
}

/// GET /api/projects/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    cached_json(&state, &paths::project(&id), || state.publishing.get_project(id)).await
}

/// POST /api/projects
pub async fn create(
    state: web::Data<AppState>,
    session: CallerSession,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let payload = authorized_json(state.publishing.gate(), session.as_ref(), &body)?;
    let project = state
        .publishing
        .create_project(session.as_ref(), &payload)
        .await?;
    Ok(HttpResponse::Created().json(project))
}

/// PUT /api/projects/{id}
pub async fn update(
    state: web::Data<AppState>,
    session: CallerSession,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let payload = authorized_json(state.publishing.gate(), session.as_ref(), &body)?;
    let project = state
        .publishing
        .update_project(session.as_ref(), path.into_inner(), &payload)
        .await?;
    Ok(HttpResponse::Ok().json(project))
}

/// DELETE /api/projects/{id}
pub async fn delete(
    state: web::Data<AppState>,
    session: CallerSession,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .publishing
        .delete_project(session.as_ref(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Project deleted")))
}
