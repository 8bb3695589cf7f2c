//! # Folio Shared
//!
//! Wire types of the JSON API, shared by the server and its clients.

pub mod dto;
pub mod response;

pub use dto::{HealthResponse, PostDetail};
pub use response::{ApiResponse, ErrorDetail, ErrorResponse};
