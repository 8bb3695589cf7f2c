//! Error handling - maps domain failures onto HTTP responses.

use std::time::Duration;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use folio_core::DomainError;
use folio_shared::ErrorResponse;

/// Application-level error type returned by handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Rate limit exceeded, retry in {}s", .retry_after.as_secs())]
    RateLimited { retry_after: Duration },
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Domain(err) => match err {
                DomainError::Validation(_) => StatusCode::BAD_REQUEST,
                DomainError::Unauthenticated => StatusCode::UNAUTHORIZED,
                DomainError::Forbidden => StatusCode::FORBIDDEN,
                DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
                DomainError::AssetRelease(_) => StatusCode::BAD_GATEWAY,
                DomainError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::Domain(err) => match err {
                DomainError::Validation(fields) => ErrorResponse::fields(fields.as_map().clone()),
                DomainError::Unauthenticated => ErrorResponse::unauthorized(),
                DomainError::Forbidden => ErrorResponse::forbidden(),
                DomainError::NotFound { entity_type, .. } => {
                    ErrorResponse::not_found(format!("{entity_type} not found"))
                }
                DomainError::AssetRelease(detail) => {
                    tracing::error!(detail = %detail, "Image release failed");
                    ErrorResponse::new("Failed to delete the attached image")
                }
                DomainError::Unexpected(detail) => {
                    tracing::error!(detail = %detail, "Internal error");
                    ErrorResponse::internal_error()
                }
            },
            AppError::BadRequest(detail) => ErrorResponse::new(detail.clone()),
            AppError::RateLimited { .. } => ErrorResponse::too_many_requests(),
        };

        let mut response = HttpResponse::build(self.status_code());
        if let AppError::RateLimited { retry_after } = self {
            response.insert_header(("Retry-After", retry_after.as_secs().max(1).to_string()));
        }
        response.json(error)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use folio_core::FieldErrors;
    use serde_json::{Value, json};

    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn test_validation_maps_to_field_errors() {
        let mut fields = FieldErrors::new();
        fields.add("title", "is required");
        let (status, body) = body_of(DomainError::Validation(fields).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": { "title": ["is required"] } }));
    }

    #[actix_web::test]
    async fn test_auth_failures() {
        let (status, body) = body_of(DomainError::Unauthenticated.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Unauthorized" }));

        let (status, body) = body_of(DomainError::Forbidden.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": "Forbidden" }));
    }

    #[actix_web::test]
    async fn test_internal_details_are_not_leaked() {
        let (status, body) =
            body_of(DomainError::Unexpected("password=hunter2".into()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.to_string().contains("hunter2"));

        let (status, body) = body_of(DomainError::AssetRelease("token=abc".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!body.to_string().contains("token"));
    }

    #[actix_web::test]
    async fn test_not_found_names_the_entity() {
        let (status, body) = body_of(DomainError::not_found("Post", "x").into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Post not found" }));
    }

    #[actix_web::test]
    async fn test_rate_limited_sets_retry_after() {
        let response = AppError::RateLimited {
            retry_after: Duration::from_secs(12),
        }
        .error_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get("Retry-After").unwrap(), "12");
    }
}
