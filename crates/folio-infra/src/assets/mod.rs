//! Asset store implementations.

mod noop;
mod uploadthing;

pub use noop::NoopAssetStore;
pub use uploadthing::{UploadThingAssetStore, UploadThingConfig};
