use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{RawTags, TagStore};
use crate::error::TagError;

/// In-memory `TagStore`; paths without an entry read as broken files.
#[derive(Default)]
pub struct MemoryTagStore {
    files: RefCell<HashMap<PathBuf, RawTags>>,
    pub writes: RefCell<usize>,
}

impl MemoryTagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, tags: RawTags) {
        self.files.borrow_mut().insert(path.into(), tags);
    }

    pub fn get(&self, path: &Path) -> Option<RawTags> {
        self.files.borrow().get(path).cloned()
    }
}

impl TagStore for MemoryTagStore {
    fn read(&self, path: &Path) -> Result<RawTags, TagError> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| TagError::Read {
                path: path.to_path_buf(),
                message: "no such entry".to_string(),
            })
    }

    fn write(&self, path: &Path, tags: &RawTags) -> Result<(), TagError> {
        *self.writes.borrow_mut() += 1;
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), tags.clone());
        Ok(())
    }
}
