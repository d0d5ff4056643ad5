//! Classical work catalog: the MusicBrainz client and the work hierarchy
//! resolver built on top of it.

mod client;
mod hierarchy;

pub use client::MusicBrainzClient;
pub use hierarchy::*;

use crate::error::CatalogError;

/// Direction of a relation as seen from the queried work.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkRelation {
    /// Relation type, e.g. `parts`.
    pub kind: String,
    pub direction: Direction,
    pub target_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Work {
    pub id: String,
    pub title: String,
    pub relations: Vec<WorkRelation>,
}

impl Work {
    /// The work this one is a part of, if any.
    pub fn parent_id(&self) -> Option<&str> {
        self.relations
            .iter()
            .find(|r| r.kind == "parts" && r.direction == Direction::Backward)
            .map(|r| r.target_id.as_str())
    }
}

/// Read access to an external classical-work catalog.
pub trait WorkCatalog {
    fn work(&self, id: &str) -> Result<Work, CatalogError>;

    /// Id of the work a recording is a performance of.
    fn recording_work_id(&self, recording_id: &str) -> Result<Option<String>, CatalogError>;
}

#[cfg(test)]
pub mod fake;
