//! Content storage: PostgreSQL via SeaORM, plus an in-memory fallback.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::DatabaseConfig;
pub use memory::{
    InMemoryMessageRepository, InMemoryPostRepository, InMemoryProjectRepository,
    InMemoryRepository, Record,
};

#[cfg(feature = "postgres")]
pub use connections::DatabaseConnections;

#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresMessageRepository, PostgresPostRepository, PostgresProjectRepository,
};
