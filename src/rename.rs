//! Per-file action engine.
//!
//! `Job::process` walks one file through a small state machine:
//!
//! ```text
//! load tags ── broken ─────────────────────────────▶ Broken file
//!    │ skip field empty ───────────────────────────▶ No field
//!    ▼
//! metadata actions ── renaming disabled ───────────▶ No rename
//!    ▼
//! build target ── already there ───────────────────▶ Renamed
//!    │ nothing at target ──────────────────────────▶ Move | Copy | Dry run
//!    ▼
//! target exists ── best format off ────────────────▶ Exists
//!    │ target better ──────────────────────────────▶ Exists
//!    │ source better, cleaning = do-nothing ───────▶ Exists
//!    ▼
//! backup/delete target ────────────────────────────▶ Move | Copy | Dry run
//! ```
//!
//! Every terminal state increments exactly one counter. Errors from the file
//! system or the quality comparison propagate and leave the counters alone.
//! The lookup of an existing target and the following move are not atomic.

mod counters;
pub mod ops;
pub mod path;

pub use counters::{Counters, Outcome};

use counters::TrackListing;

use std::path::{Path, PathBuf};

use crate::batch;
use crate::config::{CleaningAction, MoveAction, Settings};
use crate::error::{RenameError, TagError, TemplateError};
use crate::meta::{Meta, MetaPolicy};
use crate::musicbrainz::WorkCatalog;
use crate::quality::{self, Verdict, Winner};
use crate::tags::TagStore;

use ops::FileOps;
use path::Templates;

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub outcome: Outcome,
    pub source: PathBuf,
    pub target: Option<PathBuf>,
    pub verdict: Option<Verdict>,
}

/// One run over a set of files: settings, collaborators and counters.
pub struct Job<'a> {
    settings: Settings,
    templates: Templates,
    policy: MetaPolicy,
    target_root: PathBuf,
    store: &'a dyn TagStore,
    catalog: Option<&'a dyn WorkCatalog>,
    ops: FileOps,
    counters: Counters,
    listing: TrackListing,
    extensions: Vec<String>,
}

impl<'a> Job<'a> {
    pub fn new(
        settings: Settings,
        target_root: impl Into<PathBuf>,
        store: &'a dyn TagStore,
        catalog: Option<&'a dyn WorkCatalog>,
    ) -> Result<Self, TemplateError> {
        let templates = Templates::from_settings(&settings.path)?;
        let policy = MetaPolicy {
            shell_friendly: settings.path.shell_friendly,
            classical: settings.metadata.classical,
            genre_classical: settings.metadata.genre_classical.clone(),
            soundtrack_types: settings.metadata.soundtrack_types.clone(),
        };
        Ok(Self {
            ops: FileOps::new(settings.rename.dry_run),
            extensions: settings.library.normalized_extensions(),
            settings,
            templates,
            policy,
            target_root: target_root.into(),
            store,
            catalog,
            counters: Counters::default(),
            listing: TrackListing::default(),
        })
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    fn finish(
        &mut self,
        outcome: Outcome,
        source: &Path,
        target: Option<PathBuf>,
        verdict: Option<Verdict>,
    ) -> Report {
        self.counters.record(outcome);
        match &target {
            Some(t) => tracing::info!("{outcome}: {} -> {}", source.display(), t.display()),
            None => tracing::info!("{outcome}: {}", source.display()),
        }
        Report {
            outcome,
            source: source.to_path_buf(),
            target,
            verdict,
        }
    }

    /// Run one file through the action state machine.
    pub fn process(&mut self, source: &Path) -> Result<Report, RenameError> {
        let mut meta = match Meta::load(self.store, source, self.policy.clone()) {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!("{e}");
                return Ok(self.finish(Outcome::BrokenFile, source, None, None));
            }
        };

        if let Some(field) = self.settings.filter.field_skip.as_deref() {
            if meta.field(field).is_none() {
                return Ok(self.finish(Outcome::NoField, source, None, None));
            }
        }

        self.metadata_actions(&mut meta)?;

        if self.settings.rename.action == MoveAction::NoRename {
            return Ok(self.finish(Outcome::NoRename, source, None, None));
        }

        let target = self.target_path(&meta)?;
        if path::same_file(&target, source) {
            return Ok(self.finish(Outcome::Renamed, source, Some(target), None));
        }

        let base = strip_extension(&target);
        let source_ext = path::extension_of(source).unwrap_or_default();
        match path::find_existing(&base, &source_ext, &self.extensions) {
            None => self.execute(source, target, None),
            Some(existing) => self.resolve_existing(&meta, source, target, existing),
        }
    }

    /// Process every file below `root` that passes the album filters.
    ///
    /// A file whose action fails is logged and skipped. Returns the number
    /// of such failures.
    pub fn run(&mut self, root: &Path) -> usize {
        let settings = self.settings.clone();
        let store = self.store;
        let mut failures = 0;
        batch::traverse(root, &settings, store, |path| {
            if let Err(e) = self.process(path) {
                tracing::error!("{}: {e}", path.display());
                failures += 1;
            }
        });
        failures
    }

    /// Absolute target path of `meta`, with the source's extension.
    pub fn target_path(&self, meta: &Meta) -> Result<PathBuf, RenameError> {
        let relative = path::relative_target(meta, &self.templates, &self.settings.path)?;
        if relative.is_empty() {
            return Err(RenameError::EmptyTarget(meta.path().to_path_buf()));
        }
        let base = self.target_root.join(relative);
        Ok(match path::extension_of(meta.path()) {
            Some(ext) => path::with_extension(&base, &ext),
            None => base,
        })
    }

    fn metadata_actions(&mut self, meta: &mut Meta) -> Result<(), RenameError> {
        let before = meta.tags().clone();

        if self.settings.metadata.enrich {
            match self.catalog {
                Some(catalog) => {
                    meta.enrich_metadata(catalog);
                }
                None => tracing::warn!("metadata enrichment requested without a catalog"),
            }
        }
        if self.settings.metadata.remap_classical {
            meta.remap_classical();
        }

        if meta.tags() != &before {
            if self.ops.is_dry_run() {
                tracing::info!("dry run: would update tags of {}", meta.path().display());
            } else {
                meta.save(self.store)?;
            }
        }
        Ok(())
    }

    fn execute(
        &mut self,
        source: &Path,
        target: PathBuf,
        verdict: Option<Verdict>,
    ) -> Result<Report, RenameError> {
        let outcome = match self.settings.rename.action {
            MoveAction::Copy => {
                self.ops.copy_file(source, &target)?;
                Outcome::Copied
            }
            _ => {
                self.ops.move_file(source, &target)?;
                Outcome::Moved
            }
        };
        let outcome = if self.ops.is_dry_run() {
            Outcome::DryRun
        } else {
            outcome
        };
        Ok(self.finish(outcome, source, Some(target), verdict))
    }

    fn resolve_existing(
        &mut self,
        meta: &Meta,
        source: &Path,
        target: PathBuf,
        existing: PathBuf,
    ) -> Result<Report, RenameError> {
        if !self.settings.rename.best_format {
            if self.settings.rename.delete_existing {
                self.ops.delete(source)?;
                tracing::info!("deleted duplicate {}", source.display());
            }
            return Ok(self.finish(Outcome::Exists, source, Some(existing), None));
        }

        let target_tags = self.store.read(&existing)?;
        let verdict = quality::arbitrate(&meta.tags().properties, &target_tags.properties)?;
        tracing::debug!(winner = %verdict.winner, "{}", verdict.reason);

        match verdict.winner {
            Winner::Source => match self.settings.rename.cleaning {
                CleaningAction::Backup => {
                    let folder = self.settings.rename.backup_folder.clone();
                    let dest = self.ops.backup(&existing, folder.as_deref())?;
                    tracing::info!("backed up {} to {}", existing.display(), dest.display());
                    self.execute(source, target, Some(verdict))
                }
                CleaningAction::Delete => {
                    self.ops.delete(&existing)?;
                    tracing::info!("deleted worse target {}", existing.display());
                    self.execute(source, target, Some(verdict))
                }
                CleaningAction::DoNothing => {
                    Ok(self.finish(Outcome::Exists, source, Some(existing), Some(verdict)))
                }
            },
            Winner::Target => {
                if self.settings.rename.delete_existing {
                    self.ops.delete(source)?;
                    tracing::info!("deleted worse source {}", source.display());
                }
                Ok(self.finish(Outcome::Exists, source, Some(existing), Some(verdict)))
            }
        }
    }

    /// All fields of `path`, one `name: value` per line.
    pub fn field_list(&self, path: &Path) -> Result<String, TagError> {
        let meta = Meta::load(self.store, path, self.policy.clone())?;
        let mut out = format!("{}\n", path.display());
        for (name, value) in meta.fields() {
            out.push_str(&format!("  {name}: {value}\n"));
        }
        Ok(out)
    }

    /// Next numbered line of a classical track listing.
    pub fn track_listing_line(&mut self, path: &Path) -> Result<String, TagError> {
        let meta = Meta::load(self.store, path, self.policy.clone())?;
        let d = meta.derived();
        let n = self.listing.next_number();
        Ok(format!(
            "{n:>2}. {}: {} - {}",
            d.combined_composer.as_deref().unwrap_or("Unknown"),
            d.work_top.as_deref().unwrap_or_default(),
            d.classical_title.as_deref().unwrap_or_default(),
        ))
    }
}

fn strip_extension(path: &Path) -> PathBuf {
    match (path.parent(), path.file_stem()) {
        (Some(parent), Some(stem)) if path.extension().is_some() => parent.join(stem),
        _ => path.to_path_buf(),
    }
}
