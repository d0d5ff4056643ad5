use std::cell::Cell;
use std::collections::HashMap;

use super::{Direction, Work, WorkCatalog, WorkRelation};
use crate::error::CatalogError;

/// In-memory catalog; unknown ids answer `NotFound`.
#[derive(Default)]
pub struct FakeCatalog {
    works: HashMap<String, Work>,
    recordings: HashMap<String, String>,
    pub calls: Cell<usize>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a work, optionally pointing at its parent.
    pub fn with_work(mut self, id: &str, title: &str, parent: Option<&str>) -> Self {
        let relations = parent
            .map(|p| {
                vec![WorkRelation {
                    kind: "parts".to_string(),
                    direction: Direction::Backward,
                    target_id: p.to_string(),
                }]
            })
            .unwrap_or_default();
        self.works.insert(
            id.to_string(),
            Work {
                id: id.to_string(),
                title: title.to_string(),
                relations,
            },
        );
        self
    }

    pub fn with_recording(mut self, recording_id: &str, work_id: &str) -> Self {
        self.recordings
            .insert(recording_id.to_string(), work_id.to_string());
        self
    }
}

impl WorkCatalog for FakeCatalog {
    fn work(&self, id: &str) -> Result<Work, CatalogError> {
        self.calls.set(self.calls.get() + 1);
        self.works.get(id).cloned().ok_or(CatalogError::NotFound {
            entity: "work",
            id: id.to_string(),
        })
    }

    fn recording_work_id(&self, recording_id: &str) -> Result<Option<String>, CatalogError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.recordings.get(recording_id).cloned())
    }
}
