//! SeaORM entities for the content tables.

pub mod contact_message;
pub mod post;
pub mod project;
