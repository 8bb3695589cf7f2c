//! # Folio Infrastructure
//!
//! Concrete implementations of the ports defined in `folio-core`.
//! This crate contains database, cache, and external service integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No database driver or governor, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `rate-limit` - Rate limiting via governor

pub mod assets;
pub mod cache;
pub mod database;
pub mod invalidation;
pub mod session;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-exports - In-Memory
pub use cache::InMemoryCache;
pub use database::{
    DatabaseConfig, InMemoryMessageRepository, InMemoryPostRepository, InMemoryProjectRepository,
};
pub use invalidation::{ViewCacheInvalidator, view_cache_key};

// Re-exports - External services
pub use assets::{NoopAssetStore, UploadThingAssetStore, UploadThingConfig};
pub use session::{CachedSessionProvider, HttpSessionProvider};

#[cfg(feature = "postgres")]
pub use database::{
    DatabaseConnections, PostgresMessageRepository, PostgresPostRepository,
    PostgresProjectRepository,
};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
