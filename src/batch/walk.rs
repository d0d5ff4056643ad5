use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::LibrarySettings;

fn is_audio_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Audio files below `root` in lexicographic traversal order.
///
/// Entries in each directory are sorted by file name, so the files of one
/// album directory come out as one contiguous run. A file `root` yields
/// itself when its extension is configured.
pub fn audio_files(root: &Path, settings: &LibrarySettings) -> Vec<PathBuf> {
    let extensions = settings.normalized_extensions();

    if root.is_file() {
        return if is_audio_file(root, &extensions) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        };
    }

    let mut walker = WalkDir::new(root)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() || entry.path().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_audio_file(path, &extensions))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let exts = LibrarySettings::default().normalized_extensions();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &exts));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &exts));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &exts));
        assert!(is_audio_file(Path::new("/tmp/a.m4a"), &exts));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &exts));
        assert!(!is_audio_file(Path::new("/tmp/a"), &exts));
    }

    #[test]
    fn walk_filters_non_audio_and_sorts_by_path() {
        let dir = tempdir().unwrap();
        let b = dir.path().join("B album");
        let a = dir.path().join("A album");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        fs::write(b.join("01.mp3"), b"x").unwrap();
        fs::write(a.join("02.flac"), b"x").unwrap();
        fs::write(a.join("01.flac"), b"x").unwrap();
        fs::write(a.join("cover.jpg"), b"x").unwrap();

        let files = audio_files(dir.path(), &LibrarySettings::default());
        assert_eq!(files, vec![a.join("01.flac"), a.join("02.flac"), b.join("01.mp3")]);
    }

    #[test]
    fn walk_respects_include_hidden_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();
        let hidden_dir = dir.path().join(".cache");
        fs::create_dir_all(&hidden_dir).unwrap();
        fs::write(hidden_dir.join("x.mp3"), b"not real").unwrap();

        let files = audio_files(dir.path(), &LibrarySettings::default());
        assert_eq!(names(&files), vec!["visible.mp3"]);
    }

    #[test]
    fn walk_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        assert_eq!(names(&audio_files(dir.path(), &settings)), vec!["root.mp3"]);
    }

    #[test]
    fn walk_respects_max_depth() {
        let dir = tempdir().unwrap();
        let d1 = dir.path().join("d1");
        let d2 = d1.join("d2");
        fs::create_dir_all(&d2).unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        fs::write(d1.join("one.mp3"), b"not real").unwrap();
        fs::write(d2.join("two.mp3"), b"not real").unwrap();

        // Root is depth 0, so depth 2 reaches d1/* but not d1/d2/*.
        let settings = LibrarySettings {
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        let found = names(&audio_files(dir.path(), &settings));
        assert!(found.contains(&"root.mp3".to_string()));
        assert!(found.contains(&"one.mp3".to_string()));
        assert!(!found.contains(&"two.mp3".to_string()));
    }

    #[test]
    fn file_root_yields_itself() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("song.ogg");
        fs::write(&file, b"x").unwrap();
        assert_eq!(audio_files(&file, &LibrarySettings::default()), vec![file]);

        let other = dir.path().join("notes.txt");
        fs::write(&other, b"x").unwrap();
        assert!(audio_files(&other, &LibrarySettings::default()).is_empty());
    }
}
