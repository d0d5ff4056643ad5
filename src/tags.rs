//! Tag access: a typed snapshot of one file's tags and the capability to
//! read and write it.
//!
//! Everything above this module works on `RawTags` and never touches the
//! tag library directly, so tests can swap in an in-memory store.

mod lofty_store;
mod model;

pub use lofty_store::LoftyTagStore;
pub use model::*;

use std::path::Path;

use crate::error::TagError;

/// Read/write capability for the tags of a single file.
pub trait TagStore {
    fn read(&self, path: &Path) -> Result<RawTags, TagError>;
    fn write(&self, path: &Path, tags: &RawTags) -> Result<(), TagError>;
}

#[cfg(test)]
pub mod memory;
