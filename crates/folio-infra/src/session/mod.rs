//! Session resolution against the external auth service.

mod cached;
mod http;

pub use cached::{CachedSessionProvider, DEFAULT_SESSION_TTL};
pub use http::HttpSessionProvider;
