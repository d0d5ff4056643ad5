use std::collections::HashSet;

use super::WorkCatalog;

/// Upper bound on hierarchy depth; catalog data is not trusted to be acyclic.
pub const MAX_HIERARCHY_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkNode {
    pub id: String,
    pub title: String,
}

/// Chain from the queried work up to its root ancestor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkHierarchy {
    pub nodes: Vec<WorkNode>,
}

impl WorkHierarchy {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The queried work.
    pub fn leaf(&self) -> Option<&WorkNode> {
        self.nodes.first()
    }

    /// Titles root first, joined by " -> ".
    pub fn titles(&self) -> String {
        self.nodes
            .iter()
            .rev()
            .map(|n| n.title.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Ids root first, joined by "/".
    pub fn ids(&self) -> String {
        self.nodes
            .iter()
            .rev()
            .map(|n| n.id.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Follow `parts` relations upwards from `work_id`.
///
/// Lookup failures end the walk; whatever was collected so far is returned.
/// A revisited id or `MAX_HIERARCHY_DEPTH` also end it.
pub fn resolve_work_hierarchy(catalog: &dyn WorkCatalog, work_id: &str) -> WorkHierarchy {
    let mut hierarchy = WorkHierarchy::default();
    let mut visited: HashSet<String> = HashSet::new();
    let mut next = Some(work_id.to_string());

    while let Some(id) = next.take() {
        if !visited.insert(id.clone()) {
            tracing::warn!(work_id = %id, "cycle in work hierarchy, stopping");
            break;
        }
        if hierarchy.len() >= MAX_HIERARCHY_DEPTH {
            tracing::warn!(depth = MAX_HIERARCHY_DEPTH, "work hierarchy too deep, stopping");
            break;
        }

        let work = match catalog.work(&id) {
            Ok(work) => work,
            Err(e) => {
                tracing::warn!(work_id = %id, "work lookup failed: {e}");
                break;
            }
        };

        next = work.parent_id().map(str::to_string);
        hierarchy.nodes.push(WorkNode {
            id: work.id,
            title: work.title,
        });
    }

    hierarchy
}
