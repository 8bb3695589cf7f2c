use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{ContactMessage, Post, Project};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with `RepoError::NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Which posts a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostVisibility {
    /// Only `published = true` (public consumption).
    Published,
    /// Everything (administrative listing).
    All,
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Exact slug match.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Posts ordered by `created_at`, newest first.
    async fn list(&self, visibility: PostVisibility) -> Result<Vec<Post>, RepoError>;
}

/// Project repository.
#[async_trait]
pub trait ProjectRepository: BaseRepository<Project, Uuid> {
    /// Projects ordered by `created_at`, newest first.
    async fn list(&self) -> Result<Vec<Project>, RepoError>;
}

/// Contact message repository.
#[async_trait]
pub trait MessageRepository: BaseRepository<ContactMessage, Uuid> {
    /// Messages ordered by `created_at`, newest first.
    async fn list(&self) -> Result<Vec<ContactMessage>, RepoError>;

    /// Flag a message as read and return it.
    async fn mark_read(&self, id: Uuid) -> Result<ContactMessage, RepoError>;
}
