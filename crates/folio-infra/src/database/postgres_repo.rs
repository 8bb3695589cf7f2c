//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use folio_core::domain::{ContactMessage, Post, Project};
use folio_core::error::RepoError;
use folio_core::ports::{MessageRepository, PostRepository, PostVisibility, ProjectRepository};

use super::entity::contact_message::{self, Entity as MessageEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::project::{self, Entity as ProjectEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL project repository.
pub type PostgresProjectRepository = PostgresBaseRepository<ProjectEntity>;

/// PostgreSQL contact message repository.
pub type PostgresMessageRepository = PostgresBaseRepository<MessageEntity>;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        tracing::debug!(slug = %slug, "Finding post by slug");

        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self, visibility: PostVisibility) -> Result<Vec<Post>, RepoError> {
        let mut query = PostEntity::find();
        if visibility == PostVisibility::Published {
            query = query.filter(post::Column::Published.eq(true));
        }

        let result = query
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn list(&self) -> Result<Vec<Project>, RepoError> {
        let result = ProjectEntity::find()
            .order_by_desc(project::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn list(&self) -> Result<Vec<ContactMessage>, RepoError> {
        let result = MessageEntity::find()
            .order_by_desc(contact_message::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn mark_read(&self, id: Uuid) -> Result<ContactMessage, RepoError> {
        // Only `read` is Set, so the UPDATE touches that single column.
        let model = contact_message::ActiveModel {
            id: Set(id),
            read: Set(true),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }
}
