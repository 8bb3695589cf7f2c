//! Application services sequencing validation, transformation and persistence.

mod messages;
mod publishing;


pub use messages::MessageService;
pub use publishing::PublishingService;

/// Rendered views that depend on stored content.
pub mod paths {
    pub const HOME: &str = "/";
    pub const BLOG: &str = "/blog";
    pub const PROJECTS: &str = "/projects";

    pub fn blog_post(slug: &str) -> String {
        format!("{BLOG}/{slug}")
    }

    pub fn project(id: &uuid::Uuid) -> String {
        format!("{PROJECTS}/{id}")
    }
}
