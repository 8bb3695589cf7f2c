//! Contact form and inbox endpoints.

use actix_web::{HttpResponse, web};
use serde_json::Value;
use uuid::Uuid;

use folio_shared::ApiResponse;

use crate::middleware::auth::CallerSession;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/contact
///
/// Public; throttled per client by `RateLimitMiddleware`.
pub async fn submit(state: web::Data<AppState>, body: web::Json<Value>) -> AppResult<HttpResponse> {
    let message = state.messages.submit(&body).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(message, "Message sent")))
}

/// GET /api/contact
pub async fn inbox(
    state: web::Data<AppState>,
    session: CallerSession,
) -> AppResult<HttpResponse> {
    let messages = state.messages.list(session.as_ref()).await?;
    Ok(HttpResponse::Ok().json(messages))
}

/// PATCH /api/messages/{id}/read
pub async fn mark_read(
    state: web::Data<AppState>,
    session: CallerSession,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let message = state
        .messages
        .mark_read(session.as_ref(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        message,
        "Message marked as read",
    )))
}

/// DELETE /api/messages/{id}
pub async fn delete(
    state: web::Data<AppState>,
    session: CallerSession,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .messages
        .delete(session.as_ref(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Message deleted")))
}
