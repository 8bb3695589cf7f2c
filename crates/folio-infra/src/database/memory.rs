//! In-memory repositories - used when no `DATABASE_URL` is configured.
//!
//! Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use folio_core::domain::{ContactMessage, Post, Project};
use folio_core::error::RepoError;
use folio_core::ports::{
    BaseRepository, MessageRepository, PostRepository, PostVisibility, ProjectRepository,
};

/// A stored row.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;

    /// Value that must be unique across the table, if any.
    fn unique_key(&self) -> Option<&str> {
        None
    }
}

impl Record for Post {
    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.slug)
    }
}

impl Record for Project {
    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for ContactMessage {
    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// HashMap-backed table with async RwLock.
pub struct InMemoryRepository<T> {
    rows: RwLock<HashMap<Uuid, T>>,
}

pub type InMemoryPostRepository = InMemoryRepository<Post>;
pub type InMemoryProjectRepository = InMemoryRepository<Project>;
pub type InMemoryMessageRepository = InMemoryRepository<ContactMessage>;

impl<T: Record> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    /// Rows matching `keep`, newest first.
    async fn newest_first(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        let rows = self.rows.read().await;
        let mut matching: Vec<T> = rows.values().filter(|r| keep(r)).cloned().collect();
        matching.sort_by_key(|r| std::cmp::Reverse(r.created_at()));
        matching
    }

    fn check_unique(rows: &HashMap<Uuid, T>, entity: &T) -> Result<(), RepoError> {
        let Some(key) = entity.unique_key() else {
            return Ok(());
        };
        let taken = rows
            .values()
            .any(|other| other.id() != entity.id() && other.unique_key() == Some(key));
        if taken {
            return Err(RepoError::Constraint(format!("'{key}' already exists")));
        }
        Ok(())
    }
}

impl<T: Record> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> BaseRepository<T, Uuid> for InMemoryRepository<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn insert(&self, entity: T) -> Result<T, RepoError> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&entity.id()) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        Self::check_unique(&rows, &entity)?;
        rows.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&entity.id()) {
            return Err(RepoError::NotFound);
        }
        Self::check_unique(&rows, &entity)?;
        rows.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.rows.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.values().find(|p| p.slug == slug).cloned())
    }

    async fn list(&self, visibility: PostVisibility) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .newest_first(|p| visibility == PostVisibility::All || p.published)
            .await)
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn list(&self) -> Result<Vec<Project>, RepoError> {
        Ok(self.newest_first(|_| true).await)
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn list(&self) -> Result<Vec<ContactMessage>, RepoError> {
        Ok(self.newest_first(|_| true).await)
    }

    async fn mark_read(&self, id: Uuid) -> Result<ContactMessage, RepoError> {
        let mut rows = self.rows.write().await;
        let message = rows.get_mut(&id).ok_or(RepoError::NotFound)?;
        message.read = true;
        Ok(message.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn post(title: &str, slug: &str, published: bool, age_minutes: i64) -> Post {
        let mut post = Post::new(
            title.to_string(),
            slug.to_string(),
            "<p>body</p>".to_string(),
            vec!["rust".to_string()],
        );
        post.published = published;
        post.created_at = Utc::now() - Duration::minutes(age_minutes);
        post
    }

    #[tokio::test]
    async fn test_published_listing_is_filtered_and_newest_first() {
        let repo = InMemoryPostRepository::new();
        let old = repo.insert(post("Old", "old", true, 30)).await.unwrap();
        let new = repo.insert(post("New", "new", true, 1)).await.unwrap();
        repo.insert(post("Draft", "draft", false, 0)).await.unwrap();

        let published = repo.list(PostVisibility::Published).await.unwrap();
        assert_eq!(published, vec![new, old]);

        let all = repo.list(PostVisibility::All).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].slug, "draft");
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_a_constraint_violation() {
        let repo = InMemoryPostRepository::new();
        repo.insert(post("One", "same", false, 0)).await.unwrap();
        let err = repo.insert(post("Two", "same", false, 0)).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_own_slug_and_requires_row() {
        let repo = InMemoryPostRepository::new();
        let mut stored = repo.insert(post("One", "one", false, 0)).await.unwrap();
        stored.title = "Renamed".to_string();
        let updated = repo.update(stored.clone()).await.unwrap();
        assert_eq!(updated.title, "Renamed");

        repo.delete(stored.id).await.unwrap();
        assert!(matches!(
            repo.update(stored).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_find_by_slug() {
        let repo = InMemoryPostRepository::new();
        let stored = repo.insert(post("One", "one", false, 0)).await.unwrap();
        assert_eq!(repo.find_by_slug("one").await.unwrap(), Some(stored));
        assert_eq!(repo.find_by_slug("two").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_mark_read() {
        let repo = InMemoryMessageRepository::new();
        let message = ContactMessage::new("a@example.com".into(), "hello there".into());
        repo.insert(message.clone()).await.unwrap();

        let read = repo.mark_read(message.id).await.unwrap();
        assert!(read.read);
        assert!(repo.find_by_id(message.id).await.unwrap().unwrap().read);
        assert!(matches!(
            repo.mark_read(Uuid::new_v4()).await,
            Err(RepoError::NotFound)
        ));
    }
}
