//! Operator allow-list gate for mutating operations.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::DomainError;
use crate::ports::Session;

/// Accounts permitted to mutate content.
///
/// Both the email and the account handle must be listed. Entries are
/// compared trimmed and case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    emails: HashSet<String>,
    handles: HashSet<String>,
}

impl AllowList {
    pub fn new<E, H>(emails: E, handles: H) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        H: IntoIterator,
        H::Item: AsRef<str>,
    {
        Self {
            emails: normalize_entries(emails),
            handles: normalize_entries(handles),
        }
    }

    /// Parse comma-separated lists, e.g. `ALLOWED_GITHUB_EMAILS`.
    pub fn from_csv(emails: &str, handles: &str) -> Self {
        Self::new(emails.split(','), handles.split(','))
    }

    /// True when nobody can pass the gate.
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() || self.handles.is_empty()
    }

    pub fn permits(&self, email: &str, handle: &str) -> bool {
        self.emails.contains(&normalize(email)) && self.handles.contains(&normalize(handle))
    }
}

fn normalize(entry: &str) -> String {
    entry.trim().to_lowercase()
}

fn normalize_entries<I>(entries: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    entries
        .into_iter()
        .map(|e| normalize(e.as_ref()))
        .filter(|e| !e.is_empty())
        .collect()
}

/// Identity of an allow-listed caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operator {
    pub email: String,
    pub handle: String,
}

/// Checks resolved sessions against the [`AllowList`].
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    allow_list: AllowList,
}

impl AuthorizationGate {
    pub fn new(allow_list: AllowList) -> Self {
        if allow_list.is_empty() {
            tracing::warn!("Operator allow-list is empty; all mutations will be rejected");
        }
        Self { allow_list }
    }

    /// `Unauthenticated` without a session, `Forbidden` when not allow-listed.
    pub fn authorize(&self, session: Option<&Session>) -> Result<Operator, DomainError> {
        let Some(session) = session else {
            tracing::debug!("Rejected request without a session");
            return Err(DomainError::Unauthenticated);
        };

        let user = &session.user;
        if self.allow_list.permits(&user.email, &user.name) {
            Ok(Operator {
                email: user.email.clone(),
                handle: user.name.clone(),
            })
        } else {
            tracing::warn!(
                user_email = %mask_email(&user.email),
                handle = %user.name,
                "Rejected account outside the operator allow-list"
            );
            Err(DomainError::Forbidden)
        }
    }
}

/// Mask an email for logging to avoid PII in logs.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}@{domain}")
        }
        None => "***".to_string(),
    }
}
