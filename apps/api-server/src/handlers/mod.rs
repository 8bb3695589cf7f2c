//! HTTP handlers and route configuration.

mod health;
mod messages;
mod posts;
mod projects;
mod views;


use actix_web::{HttpRequest, HttpResponse, error::InternalError, web};
use serde_json::Value;

use folio_core::ports::Session;
use folio_core::AuthorizationGate;
use folio_shared::ErrorResponse;

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::observability::RequestId;

const JSON_LIMIT: usize = 2 * 1024 * 1024;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .app_data(web::PayloadConfig::new(JSON_LIMIT))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                // Blog
                .service(
                    web::resource("/posts")
                        .route(web::get().to(posts::list_published))
                        .route(web::post().to(posts::create)),
                )
                .route("/posts/slug/{slug}", web::get().to(posts::get_by_slug))
                .service(
                    web::resource("/posts/{id}")
                        .route(web::get().to(posts::get))
                        .route(web::put().to(posts::update))
                        .route(web::delete().to(posts::delete)),
                )
                .route("/dashboard/posts", web::get().to(posts::list_all))
                // Portfolio
                .service(
                    web::resource("/projects")
                        .route(web::get().to(projects::list))
                        .route(web::post().to(projects::create)),
                )
                .service(
                    web::resource("/projects/{id}")
                        .route(web::get().to(projects::get))
                        .route(web::put().to(projects::update))
                        .route(web::delete().to(projects::delete)),
                )
                // Contact form and inbox
                .service(
                    web::resource("/contact")
                        .route(web::get().to(messages::inbox))
                        .route(
                            web::post()
                                .to(messages::submit)
                                .wrap(RateLimitMiddleware),
                        ),
                )
                .route("/messages/{id}", web::delete().to(messages::delete))
                .route("/messages/{id}/read", web::patch().to(messages::mark_read)),
        );
}

/// Body of a gated write, parsed only once the caller is authorized.
///
/// Gated handlers take raw bytes so that anonymous or non-allow-listed
/// callers get 401/403 whatever they sent.
pub(crate) fn authorized_json(
    gate: &AuthorizationGate,
    session: Option<&Session>,
    body: &[u8],
) -> AppResult<Value> {
    gate.authorize(session)?;
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))
}

/// Malformed JSON bodies get the standard error envelope.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().limit(JSON_LIMIT).error_handler(|err, req| {
        let body = with_request_id(ErrorResponse::new(format!("Invalid JSON body: {err}")), req);
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

/// Unparseable ids can never match a record.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        let body = with_request_id(ErrorResponse::not_found("Not found"), req);
        InternalError::from_response(err, HttpResponse::NotFound().json(body)).into()
    })
}

fn with_request_id(body: ErrorResponse, req: &HttpRequest) -> ErrorResponse {
    match RequestId::of(req) {
        Some(id) => body.with_request_id(id.0),
        None => body,
    }
}
