//! Domain entities - the core business objects.

mod message;
mod post;
mod project;

pub use message::ContactMessage;
pub use post::Post;
pub use project::Project;
