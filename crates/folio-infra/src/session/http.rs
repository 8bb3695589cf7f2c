use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, COOKIE};

use folio_core::ports::{RequestCredentials, Session, SessionError, SessionProvider};

const SESSION_PATH: &str = "/api/auth/get-session";

/// Asks the auth service who owns the forwarded credentials.
///
/// The service answers `null` (or 401) for anonymous callers and
/// `{ "session": …, "user": { "email", "name", … } }` otherwise.
pub struct HttpSessionProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSessionProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SessionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SessionError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}{SESSION_PATH}", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    async fn get_session(
        &self,
        credentials: &RequestCredentials,
    ) -> Result<Option<Session>, SessionError> {
        if credentials.is_empty() {
            return Ok(None);
        }

        let mut request = self.client.get(&self.endpoint);
        if let Some(cookie) = &credentials.cookie {
            request = request.header(COOKIE, cookie);
        }
        if let Some(authorization) = &credentials.authorization {
            request = request.header(AUTHORIZATION, authorization);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, "Auth service request failed");
            SessionError::Unavailable(e.to_string())
        })?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Ok(None),
            status if !status.is_success() => {
                tracing::error!(status = %status, "Auth service returned an error");
                return Err(SessionError::Unavailable(format!(
                    "auth service returned {status}"
                )));
            }
            _ => {}
        }

        response
            .json::<Option<Session>>()
            .await
            .map_err(|e| SessionError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(server: &mockito::Server) -> HttpSessionProvider {
        HttpSessionProvider::new(&server.url(), Duration::from_secs(2)).unwrap()
    }

    fn cookie(value: &str) -> RequestCredentials {
        RequestCredentials {
            cookie: Some(value.to_string()),
            authorization: None,
        }
    }

    #[tokio::test]
    async fn test_forwards_cookie_and_parses_user() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", SESSION_PATH)
            .match_header("cookie", "session_token=abc")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"session":{"id":"s1","expiresAt":"2030-01-01T00:00:00Z"},
                    "user":{"id":"u1","email":"owner@example.com","name":"owner-gh","image":null}}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let session = provider(&server)
            .get_session(&cookie("session_token=abc"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(session, Session::new("owner@example.com", "owner-gh"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_null_body_means_no_session() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", SESSION_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("null")
            .create_async()
            .await;

        let session = provider(&server)
            .get_session(&cookie("stale"))
            .await
            .unwrap();
        assert!(session.is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_means_no_session() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", SESSION_PATH)
            .with_status(401)
            .create_async()
            .await;

        let session = provider(&server)
            .get_session(&RequestCredentials {
                cookie: None,
                authorization: Some("Bearer nope".to_string()),
            })
            .await
            .unwrap();
        assert!(session.is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", SESSION_PATH)
            .with_status(503)
            .create_async()
            .await;

        let err = provider(&server)
            .get_session(&cookie("abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_garbage_body_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", SESSION_PATH)
            .with_status(200)
            .with_body(r#"{"user": 42}"#)
            .create_async()
            .await;

        let err = provider(&server)
            .get_session(&cookie("abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_no_credentials_skips_the_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", SESSION_PATH)
            .expect(0)
            .create_async()
            .await;

        let session = provider(&server)
            .get_session(&RequestCredentials::default())
            .await
            .unwrap();
        assert!(session.is_none());
        mock.assert_async().await;
    }
}
