//! Session extraction for gated routes.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::Future;
use std::pin::Pin;

use folio_core::DomainError;
use folio_core::ports::{RequestCredentials, Session};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// The caller's session as reported by the auth service, if any.
///
/// Extraction never rejects an anonymous caller; the services decide
/// whether a session is required:
/// ```ignore
/// async fn create(session: CallerSession, ...) -> AppResult<HttpResponse> {
///     state.publishing.create_post(session.as_ref(), &body).await?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CallerSession(pub Option<Session>);

impl CallerSession {
    pub fn as_ref(&self) -> Option<&Session> {
        self.0.as_ref()
    }
}

/// Cookie and Authorization headers, forwarded verbatim.
pub fn credentials(req: &HttpRequest) -> RequestCredentials {
    let read = |name: header::HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };

    RequestCredentials {
        cookie: read(header::COOKIE),
        authorization: read(header::AUTHORIZATION),
    }
}

impl FromRequest for CallerSession {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let credentials = credentials(req);
        let sessions = req
            .app_data::<web::Data<AppState>>()
            .map(|state| state.sessions.clone());

        Box::pin(async move {
            let Some(sessions) = sessions else {
                tracing::error!("AppState not found in app data");
                return Err(DomainError::Unexpected("Server configuration error".into()).into());
            };

            match sessions.get_session(&credentials).await {
                Ok(session) => Ok(CallerSession(session)),
                Err(e) => {
                    tracing::error!(error = %e, "Session lookup failed");
                    Err(DomainError::Unexpected(e.to_string()).into())
                }
            }
        })
    }
}
