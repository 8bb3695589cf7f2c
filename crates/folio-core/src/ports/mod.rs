//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod assets;
mod cache;
mod invalidation;
mod rate_limit;
mod repository;
mod session;

pub use assets::{AssetError, AssetStore};
pub use cache::{Cache, CacheError};
pub use invalidation::CacheInvalidator;
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{
    BaseRepository, MessageRepository, PostRepository, PostVisibility, ProjectRepository,
};
pub use session::{RequestCredentials, Session, SessionError, SessionProvider, SessionUser};
