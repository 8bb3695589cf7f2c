//! Identity/session provider port.
//!
//! Sign-in itself (GitHub OAuth) lives in an external auth service. The
//! backend only asks it who the caller is.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Credentials forwarded from an inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RequestCredentials {
    pub cookie: Option<String>,
    pub authorization: Option<String>,
}

impl RequestCredentials {
    pub fn is_empty(&self) -> bool {
        self.cookie.is_none() && self.authorization.is_none()
    }
}

/// Account attached to a resolved session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: String,
    /// Account handle (the GitHub login).
    pub name: String,
}

/// A session resolved by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: SessionUser,
}

impl Session {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user: SessionUser {
                email: email.into(),
                name: name.into(),
            },
        }
    }
}

/// Resolves request credentials to a session, if any.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn get_session(
        &self,
        credentials: &RequestCredentials,
    ) -> Result<Option<Session>, SessionError>;
}

/// Session lookup errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Auth service unreachable: {0}")]
    Unavailable(String),

    #[error("Malformed session response: {0}")]
    Malformed(String),
}
