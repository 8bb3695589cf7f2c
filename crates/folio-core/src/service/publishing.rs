//! Publishing orchestrator for posts and projects.
//!
//! Every write runs authorize → load (updates and deletes) → validate →
//! transform → persist → invalidate, stopping at the first failure. The
//! repository write is the last durable step, except on delete where the
//! image is released first and a failed release aborts the delete.
//!
//! There is no version field, so concurrent updates to one entity are
//! last-write-wins.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use super::paths;
use crate::auth::AuthorizationGate;
use crate::domain::{Post, Project};
use crate::error::DomainError;
use crate::ports::{
    AssetStore, CacheInvalidator, PostRepository, PostVisibility, ProjectRepository, Session,
};
use crate::sanitize::sanitize_markdown;
use crate::slug::{slugify, with_suffix};
use crate::validation::{
    validate_new_post, validate_new_project, validate_post_patch, validate_project_patch,
};

/// Numbered suffixes tried before falling back to an id-derived one.
const MAX_SLUG_SUFFIX: u32 = 9;

pub struct PublishingService {
    gate: AuthorizationGate,
    posts: Arc<dyn PostRepository>,
    projects: Arc<dyn ProjectRepository>,
    assets: Arc<dyn AssetStore>,
    invalidator: Arc<dyn CacheInvalidator>,
}

impl PublishingService {
    pub fn new(
        gate: AuthorizationGate,
        posts: Arc<dyn PostRepository>,
        projects: Arc<dyn ProjectRepository>,
        assets: Arc<dyn AssetStore>,
        invalidator: Arc<dyn CacheInvalidator>,
    ) -> Self {
        Self {
            gate,
            posts,
            projects,
            assets,
            invalidator,
        }
    }

    pub fn gate(&self) -> &AuthorizationGate {
        &self.gate
    }

    // ---- Posts: reads ----

    /// Published posts, newest first.
    pub async fn list_published_posts(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list(PostVisibility::Published).await?)
    }

    /// Every post including drafts, for the dashboard.
    pub async fn list_all_posts(&self, session: Option<&Session>) -> Result<Vec<Post>, DomainError> {
        self.gate.authorize(session)?;
        Ok(self.posts.list(PostVisibility::All).await?)
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.load_post(id).await
    }

    /// Drafts are reported as not found.
    pub async fn get_published_post_by_slug(&self, slug: &str) -> Result<Post, DomainError> {
        self.posts
            .find_by_slug(slug)
            .await?
            .filter(|post| post.published)
            .ok_or_else(|| DomainError::not_found("Post", slug))
    }

    // ---- Posts: writes ----

    pub async fn create_post(
        &self,
        session: Option<&Session>,
        payload: &Value,
    ) -> Result<Post, DomainError> {
        let operator = self.gate.authorize(session)?;
        let input = validate_new_post(payload)?;

        let content = sanitize_markdown(&input.content);
        let mut post = Post::new(input.title, String::new(), content, input.tags);
        let base = match input.slug {
            Some(slug) => slug,
            None => slug_base(&post.title, post.id),
        };
        post.slug = self.unique_slug(&base, post.id).await?;
        post.published = input.published;
        post.featured_image = input.featured_image;

        let post = self.posts.insert(post).await?;
        tracing::info!(
            post_id = %post.id,
            slug = %post.slug,
            operator = %operator.handle,
            "Post created"
        );

        self.invalidate_post_views([post.slug.as_str()]).await;
        Ok(post)
    }

    pub async fn update_post(
        &self,
        session: Option<&Session>,
        id: Uuid,
        payload: &Value,
    ) -> Result<Post, DomainError> {
        let operator = self.gate.authorize(session)?;
        let mut post = self.load_post(id).await?;
        let patch = validate_post_patch(payload)?;
        let previous_slug = post.slug.clone();

        if let Some(slug) = patch.slug {
            if slug != post.slug {
                post.slug = self.unique_slug(&slug, post.id).await?;
            }
        } else if let Some(title) = patch.title.as_deref()
            && title != post.title
        {
            post.slug = self.unique_slug(&slug_base(title, post.id), post.id).await?;
        }

        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(markdown) = patch.content {
            post.content = sanitize_markdown(&markdown);
        }
        if let Some(tags) = patch.tags {
            post.tags = tags;
        }
        if let Some(published) = patch.published {
            post.published = published;
        }
        if let Some(image) = patch.featured_image
            && image != post.featured_image
        {
            if let Some(stale) = post.featured_image.as_deref() {
                self.release_stale_image(stale).await;
            }
            post.featured_image = image;
        }
        post.touch();

        let post = self
            .posts
            .update(post)
            .await
            .map_err(|e| e.for_entity("Post", id))?;
        tracing::info!(
            post_id = %post.id,
            slug = %post.slug,
            operator = %operator.handle,
            "Post updated"
        );

        self.invalidate_post_views([previous_slug.as_str(), post.slug.as_str()])
            .await;
        Ok(post)
    }

    pub async fn delete_post(&self, session: Option<&Session>, id: Uuid) -> Result<(), DomainError> {
        let operator = self.gate.authorize(session)?;
        let post = self.load_post(id).await?;

        if let Some(url) = post.featured_image.as_deref() {
            self.release_image(url).await.inspect_err(|e| {
                tracing::error!(post_id = %id, error = %e, "Aborting post delete");
            })?;
        }

        self.posts
            .delete(id)
            .await
            .map_err(|e| e.for_entity("Post", id))?;
        tracing::info!(post_id = %id, operator = %operator.handle, "Post deleted");

        self.invalidate_post_views([post.slug.as_str()]).await;
        Ok(())
    }

    // ---- Projects ----

    /// Projects, newest first.
    pub async fn list_projects(&self) -> Result<Vec<Project>, DomainError> {
        Ok(self.projects.list().await?)
    }

    pub async fn get_project(&self, id: Uuid) -> Result<Project, DomainError> {
        self.load_project(id).await
    }

    pub async fn create_project(
        &self,
        session: Option<&Session>,
        payload: &Value,
    ) -> Result<Project, DomainError> {
        let operator = self.gate.authorize(session)?;
        let input = validate_new_project(payload)?;

        let now = chrono::Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            role: input.role,
            tools: input.tools,
            summary: input.summary,
            outcome: input.outcome,
            image_url: input.image_url,
            github_url: input.github_url,
            live_url: input.live_url,
            created_at: now,
            updated_at: now,
        };

        let project = self.projects.insert(project).await?;
        tracing::info!(project_id = %project.id, operator = %operator.handle, "Project created");

        self.invalidate_project_views(&project.id).await;
        Ok(project)
    }

    pub async fn update_project(
        &self,
        session: Option<&Session>,
        id: Uuid,
        payload: &Value,
    ) -> Result<Project, DomainError> {
        let operator = self.gate.authorize(session)?;
        let mut project = self.load_project(id).await?;
        let patch = validate_project_patch(payload)?;

        if let Some(title) = patch.title {
            project.title = title;
        }
        if let Some(description) = patch.description {
            project.description = description;
        }
        if let Some(role) = patch.role {
            project.role = role;
        }
        if let Some(tools) = patch.tools {
            project.tools = tools;
        }
        if let Some(summary) = patch.summary {
            project.summary = summary;
        }
        if let Some(outcome) = patch.outcome {
            project.outcome = outcome;
        }
        if let Some(github_url) = patch.github_url {
            project.github_url = github_url;
        }
        if let Some(live_url) = patch.live_url {
            project.live_url = live_url;
        }
        if let Some(image) = patch.image_url
            && image != project.image_url
        {
            if let Some(stale) = project.image_url.as_deref() {
                self.release_stale_image(stale).await;
            }
            project.image_url = image;
        }
        project.touch();

        let project = self
            .projects
            .update(project)
            .await
            .map_err(|e| e.for_entity("Project", id))?;
        tracing::info!(project_id = %project.id, operator = %operator.handle, "Project updated");

        self.invalidate_project_views(&project.id).await;
        Ok(project)
    }

    pub async fn delete_project(
        &self,
        session: Option<&Session>,
        id: Uuid,
    ) -> Result<(), DomainError> {
        let operator = self.gate.authorize(session)?;
        let project = self.load_project(id).await?;

        if let Some(url) = project.image_url.as_deref() {
            self.release_image(url).await.inspect_err(|e| {
                tracing::error!(project_id = %id, error = %e, "Aborting project delete");
            })?;
        }

        self.projects
            .delete(id)
            .await
            .map_err(|e| e.for_entity("Project", id))?;
        tracing::info!(project_id = %id, operator = %operator.handle, "Project deleted");

        self.invalidate_project_views(&id).await;
        Ok(())
    }

    // ---- Helpers ----

    async fn load_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    async fn load_project(&self, id: Uuid) -> Result<Project, DomainError> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Project", id))
    }

    /// First free slug among `base`, `base-2` … `base-9`, then `base-<id prefix>`.
    ///
    /// A slug already held by `owner` counts as free.
    async fn unique_slug(&self, base: &str, owner: Uuid) -> Result<String, DomainError> {
        for attempt in 1..=MAX_SLUG_SUFFIX {
            let candidate = if attempt == 1 {
                base.to_string()
            } else {
                with_suffix(base, attempt)
            };

            match self.posts.find_by_slug(&candidate).await? {
                Some(existing) if existing.id != owner => continue,
                _ => {
                    if attempt > 1 {
                        tracing::warn!(
                            requested = %base,
                            assigned = %candidate,
                            "Slug already taken; assigned a suffixed slug"
                        );
                    }
                    return Ok(candidate);
                }
            }
        }

        let candidate = with_suffix(base, short_id(owner));
        tracing::warn!(
            requested = %base,
            assigned = %candidate,
            "Slug suffixes exhausted; assigned an id-derived slug"
        );
        Ok(candidate)
    }

    async fn release_image(&self, url: &str) -> Result<(), DomainError> {
        match self.assets.delete_image(url).await {
            Ok(true) => {
                tracing::debug!(url = %url, "Image released");
                Ok(())
            }
            Ok(false) => Err(DomainError::AssetRelease(format!(
                "asset store declined to delete {url}"
            ))),
            Err(e) => Err(DomainError::AssetRelease(e.to_string())),
        }
    }

    /// Release an image that is being replaced. Failure only logs.
    async fn release_stale_image(&self, url: &str) {
        if let Err(e) = self.release_image(url).await {
            tracing::warn!(url = %url, error = %e, "Stale image was not released");
        }
    }

    async fn invalidate_post_views<'a>(&self, slugs: impl IntoIterator<Item = &'a str>) {
        self.invalidator.invalidate(paths::HOME).await;
        self.invalidator.invalidate(paths::BLOG).await;

        let mut seen: Vec<&str> = Vec::new();
        for slug in slugs {
            if !seen.contains(&slug) {
                self.invalidator.invalidate(&paths::blog_post(slug)).await;
                seen.push(slug);
            }
        }
    }

    async fn invalidate_project_views(&self, id: &Uuid) {
        self.invalidator.invalidate(paths::HOME).await;
        self.invalidator.invalidate(paths::PROJECTS).await;
        self.invalidator.invalidate(&paths::project(id)).await;
    }
}

/// Slug for a title, or `post-<id prefix>` when the title has no usable characters.
fn slug_base(title: &str, id: Uuid) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        with_suffix("post", short_id(id))
    } else {
        slug
    }
}

fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}
