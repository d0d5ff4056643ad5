//! Metadata model: raw tags of one file plus everything derived from them.
//!
//! A `Meta` is built fresh for every file and never caches derived values;
//! `derived()` recomputes them from the snapshot. The two mutating actions,
//! `enrich_metadata` and `remap_classical`, only change the in-memory
//! snapshot. Persisting is a separate `save` call.

pub mod derived;
pub mod performer;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{CatalogError, TagError};
use crate::musicbrainz::{resolve_work_hierarchy, WorkCatalog, WorkHierarchy};
use crate::tags::{RawTags, TagStore};

pub use performer::Performer;

const ORIGINAL_MARKER: &str = "Original metadata:";

/// Template field name to value. Only defined, non-empty values are present.
pub type FieldMap = BTreeMap<String, String>;

/// The parts of the settings that influence derived fields.
#[derive(Debug, Clone, Default)]
pub struct MetaPolicy {
    pub shell_friendly: bool,
    /// Treat every file as classical music.
    pub classical: bool,
    /// Genres that mark a file as classical (case-insensitive).
    pub genre_classical: Vec<String>,
    /// Release group types that mark a file as a soundtrack.
    pub soundtrack_types: Vec<String>,
}

/// Which path template a file is rendered with, in priority order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Classification {
    Soundtrack,
    Compilation,
    Classical,
    Default,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedFields {
    pub combined_album: Option<String>,
    pub initial_album: Option<String>,
    pub combined_artist: Option<String>,
    pub combined_artist_sort: String,
    pub initial_artist: Option<String>,
    pub combined_composer: Option<String>,
    pub initial_composer: Option<String>,
    pub combined_disctrack: Option<String>,
    pub classical_album: Option<String>,
    pub classical_title: Option<String>,
    pub classical_track: Option<String>,
    pub performer_raw: Vec<Performer>,
    pub performer: Option<String>,
    pub performer_short: Option<String>,
    pub classical_performer: Option<String>,
    pub combined_soundtrack: bool,
    pub combined_year: Option<u32>,
    pub work_top: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Meta {
    path: PathBuf,
    tags: RawTags,
    policy: MetaPolicy,
}

impl Meta {
    pub fn new(path: impl Into<PathBuf>, tags: RawTags, policy: MetaPolicy) -> Self {
        Self {
            path: path.into(),
            tags,
            policy,
        }
    }

    /// Read the tags of `path`. A read failure is the broken-file condition.
    pub fn load(store: &dyn TagStore, path: &Path, policy: MetaPolicy) -> Result<Self, TagError> {
        let tags = store.read(path)?;
        Ok(Self::new(path, tags, policy))
    }

    pub fn save(&self, store: &dyn TagStore) -> Result<(), TagError> {
        store.write(&self.path, &self.tags)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tags(&self) -> &RawTags {
        &self.tags
    }

    pub fn derived(&self) -> DerivedFields {
        let tags = &self.tags;
        let combined_album = derived::combined_album(tags);
        let combined_artist_sort = derived::combined_artist_sort(tags, self.policy.shell_friendly);
        let combined_composer = derived::combined_composer(tags);
        let performer_raw = performer::performer_raw(tags);

        DerivedFields {
            initial_album: combined_album.as_deref().and_then(derived::initial),
            combined_album,
            combined_artist: derived::combined_artist(tags),
            initial_artist: derived::initial(&combined_artist_sort),
            combined_artist_sort,
            initial_composer: combined_composer.as_deref().and_then(derived::initial),
            combined_composer,
            combined_disctrack: derived::combined_disctrack(tags),
            classical_album: derived::classical_album(tags),
            classical_title: derived::classical_title(tags),
            classical_track: derived::classical_track(tags),
            performer: performer::performer(&performer_raw),
            performer_short: performer::performer_short(&performer_raw),
            classical_performer: performer::classical_performer(
                &performer_raw,
                tags.albumartist.as_deref(),
            ),
            performer_raw,
            combined_soundtrack: derived::combined_soundtrack(tags, &self.policy.soundtrack_types),
            combined_year: derived::combined_year(tags),
            work_top: derived::work_top(tags),
        }
    }

    pub fn is_classical(&self) -> bool {
        self.policy.classical
            || self.tags.genre.as_deref().is_some_and(|genre| {
                self.policy
                    .genre_classical
                    .iter()
                    .any(|g| g.eq_ignore_ascii_case(genre.trim()))
            })
    }

    pub fn classification(&self) -> Classification {
        if derived::combined_soundtrack(&self.tags, &self.policy.soundtrack_types) {
            Classification::Soundtrack
        } else if self.tags.comp == Some(true) {
            Classification::Compilation
        } else if self.is_classical() {
            Classification::Classical
        } else {
            Classification::Default
        }
    }

    /// All raw and derived values by template field name.
    pub fn fields(&self) -> FieldMap {
        let t = &self.tags;
        let d = self.derived();
        let mut map = FieldMap::new();

        let mut put = |name: &str, value: Option<String>| {
            if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
                map.insert(name.to_string(), v);
            }
        };

        put("title", t.title.clone());
        put("artist", t.artist.clone());
        put("artist_sort", t.artist_sort.clone());
        put("artist_credit", t.artist_credit.clone());
        put("albumartist", t.albumartist.clone());
        put("albumartist_sort", t.albumartist_sort.clone());
        put("albumartist_credit", t.albumartist_credit.clone());
        put("album", t.album.clone());
        put("composer", t.composer.clone());
        put("composer_sort", t.composer_sort.clone());
        put("track", t.track.map(|n| n.to_string()));
        put("tracktotal", t.tracktotal.map(|n| n.to_string()));
        put("disc", t.disc.map(|n| n.to_string()));
        put("disctotal", t.disctotal.map(|n| n.to_string()));
        put("year", t.year.map(|n| n.to_string()));
        put("original_year", t.original_year.map(|n| n.to_string()));
        put("genre", t.genre.clone());
        put("comp", t.comp.filter(|c| *c).map(|_| "1".to_string()));
        put("releasegroup_types", Some(t.releasegroup_types.join(", ")));
        put("work", t.work.clone());
        put("work_id", t.work_id.clone());
        put("work_hierarchy", t.work_hierarchy.clone());
        put("work_hierarchy_ids", t.work_hierarchy_ids.clone());
        put("recording_id", t.recording_id.clone());
        put("conductor", t.conductor.clone());
        put("comment", t.comment.clone());
        put("codec", t.properties.codec.clone());
        put("bitrate", t.properties.bitrate.map(|n| n.to_string()));

        put("combined_album", d.combined_album);
        put("initial_album", d.initial_album);
        put("combined_artist", d.combined_artist);
        put("combined_artist_sort", Some(d.combined_artist_sort));
        put("initial_artist", d.initial_artist);
        put("combined_composer", d.combined_composer);
        put("initial_composer", d.initial_composer);
        put("combined_disctrack", d.combined_disctrack);
        put("classical_album", d.classical_album);
        put("classical_title", d.classical_title);
        put("classical_track", d.classical_track);
        put("performer", d.performer);
        put("performer_short", d.performer_short);
        put("classical_performer", d.classical_performer);
        put("combined_soundtrack", d.combined_soundtrack.then(|| "1".to_string()));
        put("combined_year", d.combined_year.map(|n| n.to_string()));
        put("work_top", d.work_top);

        map
    }

    /// Value of a single field, `None` when absent or empty.
    pub fn field(&self, name: &str) -> Option<String> {
        self.fields().remove(name)
    }

    /// Fill in the work and its ancestors from the catalog.
    ///
    /// The work id comes from the tags or, when missing, from the recording.
    /// Returns the resolved hierarchy, or `None` when nothing was found.
    pub fn enrich_metadata(&mut self, catalog: &dyn WorkCatalog) -> Option<WorkHierarchy> {
        let work_id = match self.work_id(catalog) {
            Ok(Some(id)) => id,
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "no work id to enrich from");
                return None;
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "recording lookup failed: {e}");
                return None;
            }
        };

        let hierarchy = resolve_work_hierarchy(catalog, &work_id);
        let leaf = hierarchy.leaf()?;

        self.tags.work = Some(leaf.title.clone());
        self.tags.work_id = Some(leaf.id.clone());
        self.tags.work_hierarchy = Some(hierarchy.titles());
        self.tags.work_hierarchy_ids = Some(hierarchy.ids());
        Some(hierarchy)
    }

    fn work_id(&self, catalog: &dyn WorkCatalog) -> Result<Option<String>, CatalogError> {
        if let Some(id) = self.tags.work_id.as_deref().filter(|id| !id.is_empty()) {
            return Ok(Some(id.to_string()));
        }
        match self.tags.recording_id.as_deref().filter(|id| !id.is_empty()) {
            Some(recording) => catalog.recording_work_id(recording),
            None => Ok(None),
        }
    }

    /// Replace album, title and track with their classical equivalents.
    ///
    /// The originals are recorded in the comment field. A file whose comment
    /// already carries them has been remapped before and is left alone.
    /// Returns whether anything changed.
    pub fn remap_classical(&mut self) -> bool {
        let already_recorded = self
            .tags
            .comment
            .as_deref()
            .is_some_and(|c| c.starts_with(ORIGINAL_MARKER));
        if already_recorded {
            return false;
        }

        let d = self.derived();
        let Some(album) = d.classical_album else {
            return false;
        };

        self.tags.comment = Some(format!(
            "{ORIGINAL_MARKER} album: {}; title: {}; track: {}",
            self.tags.album.as_deref().unwrap_or_default(),
            self.tags.title.as_deref().unwrap_or_default(),
            self.tags.track.map(|n| n.to_string()).unwrap_or_default(),
        ));
        self.tags.album = Some(album);
        if let Some(title) = d.classical_title {
            self.tags.title = Some(title);
        }
        if let Some(track) = d.classical_track.and_then(|t| t.parse::<u32>().ok()) {
            self.tags.track = Some(track);
        }
        true
    }
}

#[cfg(test)]
mod tests;
