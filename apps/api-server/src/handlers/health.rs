//! Health check endpoint.

use actix_web::{HttpResponse, web};

use folio_shared::HealthResponse;

use crate::state::AppState;

/// Health check endpoint - returns server and storage status.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let storage = state.storage_status().await;
    let response = HealthResponse {
        status: if storage == "unreachable" { "degraded" } else { "ok" },
        version: env!("CARGO_PKG_VERSION"),
        storage,
    };

    HttpResponse::Ok().json(response)
}
