use std::path::PathBuf;

use crate::config::FilterSettings;

/// One file as the batcher sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub album: Option<String>,
    pub track: Option<u32>,
}

/// A maximal run of consecutive files sharing one album title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumBatch {
    pub album: Option<String>,
    pub entries: Vec<BatchEntry>,
}

impl AlbumBatch {
    fn start(entry: BatchEntry) -> Self {
        Self {
            album: entry.album.clone(),
            entries: vec![entry],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest track number seen in the batch, 0 when none is tagged.
    pub fn max_track(&self) -> u32 {
        self.entries.iter().filter_map(|e| e.track).max().unwrap_or(0)
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.entries.iter().map(|e| &e.path)
    }

    pub fn title(&self) -> &str {
        self.album.as_deref().unwrap_or("<no album>")
    }
}

/// Album-level filters. Both apply when both are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlbumFilter {
    /// Reject batches with this many tracks or fewer.
    pub min: Option<usize>,
    /// Reject batches whose size differs from their highest track number.
    pub complete: bool,
}

impl AlbumFilter {
    pub fn from_settings(settings: &FilterSettings) -> Self {
        Self {
            min: settings.album_min,
            complete: settings.album_complete,
        }
    }

    pub fn check(&self, batch: AlbumBatch) -> Release {
        if let Some(min) = self.min {
            if batch.len() <= min {
                let reason = format!("{} tracks, need more than {min}", batch.len());
                return Release::Rejected { batch, reason };
            }
        }
        if self.complete && batch.len() != batch.max_track() as usize {
            let reason = format!(
                "{} tracks, highest track number {}",
                batch.len(),
                batch.max_track()
            );
            return Release::Rejected { batch, reason };
        }
        Release::Accepted(batch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Release {
    Accepted(AlbumBatch),
    Rejected { batch: AlbumBatch, reason: String },
}

/// Single-pass grouping of a sorted file stream into album batches.
///
/// Same-album files must be contiguous in the input. A run that is split by
/// another album comes out as separate batches, each filtered on its own.
#[derive(Debug, Default)]
pub struct AlbumBatcher {
    filter: AlbumFilter,
    current: Option<AlbumBatch>,
}

impl AlbumBatcher {
    pub fn new(filter: AlbumFilter) -> Self {
        Self {
            filter,
            current: None,
        }
    }

    /// Add the next file; returns the previous batch when the album changes.
    pub fn push(&mut self, entry: BatchEntry) -> Option<Release> {
        match self.current.as_mut() {
            Some(batch) if batch.album == entry.album => {
                batch.entries.push(entry);
                None
            }
            _ => {
                let done = self.current.replace(AlbumBatch::start(entry));
                done.map(|b| self.filter.check(b))
            }
        }
    }

    /// Release the last batch at the end of the stream.
    pub fn finish(&mut self) -> Option<Release> {
        self.current.take().map(|b| self.filter.check(b))
    }
}
