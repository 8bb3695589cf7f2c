//! # Folio Core
//!
//! The domain layer of the Folio content backend: entities, ports, and the
//! publishing pipeline (validation, Markdown sanitization, slugs,
//! allow-list authorization) that sits in front of every write.

pub mod auth;
pub mod domain;
pub mod error;
pub mod ports;
pub mod sanitize;
pub mod service;
pub mod slug;
pub mod validation;

pub use auth::{AllowList, AuthorizationGate, Operator};
pub use error::{DomainError, FieldErrors, RepoError};
pub use service::{MessageService, PublishingService};
