//! Traversal of a source tree and album batching.

mod album;
mod walk;

pub use album::{AlbumBatcher, AlbumFilter, BatchEntry, Release};
pub use walk::audio_files;

use std::path::Path;

use crate::config::Settings;
use crate::tags::TagStore;

/// Walk `root` and hand every file that passes the album filters to `visit`.
///
/// Without album filters each audio file is visited in traversal order.
/// With filters the files go through an [`AlbumBatcher`] first; files whose
/// tags cannot be read skip the batcher so `visit` can report them as broken.
/// Returns the number of files visited.
pub fn traverse<F>(root: &Path, settings: &Settings, store: &dyn TagStore, mut visit: F) -> usize
where
    F: FnMut(&Path),
{
    let files = audio_files(root, &settings.library);
    tracing::debug!(root = %root.display(), files = files.len(), "traversal");

    if !settings.filter.batches_albums() {
        for path in &files {
            visit(path);
        }
        return files.len();
    }

    let mut visited = 0;
    let mut batcher = AlbumBatcher::new(AlbumFilter::from_settings(&settings.filter));
    for path in files {
        let tags = match store.read(&path) {
            Ok(tags) => tags,
            Err(_) => {
                visit(&path);
                visited += 1;
                continue;
            }
        };
        let entry = BatchEntry {
            path,
            album: tags.album,
            track: tags.track,
        };
        if let Some(r) = batcher.push(entry) {
            visited += release(r, &mut visit);
        }
    }
    if let Some(r) = batcher.finish() {
        visited += release(r, &mut visit);
    }
    visited
}

fn release<F>(released: Release, visit: &mut F) -> usize
where
    F: FnMut(&Path),
{
    match released {
        Release::Accepted(batch) => {
            tracing::debug!(album = batch.title(), tracks = batch.len(), "album accepted");
            for path in batch.paths() {
                visit(path);
            }
            batch.len()
        }
        Release::Rejected { batch, reason } => {
            tracing::info!("skipping album {}: {reason}", batch.title());
            0
        }
    }
}
