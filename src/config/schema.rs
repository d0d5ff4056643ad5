use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tunesort/config.toml` or `~/.config/tunesort/config.toml`
///
/// Precedence (highest wins):
/// 1) Command-line arguments
/// 2) Environment variables (prefix `TUNESORT__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub rename: RenameSettings,
    pub filter: FilterSettings,
    pub path: PathSettings,
    pub metadata: MetadataSettings,
    pub musicbrainz: MusicBrainzSettings,
    pub library: LibrarySettings,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveAction {
    Move,
    Copy,
    #[serde(alias = "no_rename", alias = "norename")]
    NoRename,
}

/// What happens to a worse file sitting at the target path.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CleaningAction {
    Backup,
    Delete,
    #[serde(alias = "do_nothing", alias = "nothing")]
    DoNothing,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenameSettings {
    pub action: MoveAction,
    pub cleaning: CleaningAction,
    /// Keep whichever of source and existing target has the better format.
    pub best_format: bool,
    /// Remove the source when an equal or better target already exists.
    pub delete_existing: bool,
    /// Report what would happen without touching any file.
    pub dry_run: bool,
    /// Root directory of the renamed files. Defaults to the source root.
    pub target: Option<PathBuf>,
    /// Move replaced targets here instead of renaming them to `*.bak`.
    pub backup_folder: Option<PathBuf>,
}

impl Default for RenameSettings {
    fn default() -> Self {
        Self {
            action: MoveAction::Move,
            cleaning: CleaningAction::DoNothing,
            best_format: false,
            delete_existing: false,
            dry_run: false,
            target: None,
            backup_folder: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Skip albums with this many tracks or fewer.
    pub album_min: Option<usize>,
    /// Skip albums whose track count differs from the highest track number.
    pub album_complete: bool,
    /// Skip files where this field is empty.
    pub field_skip: Option<String>,
}

impl FilterSettings {
    pub fn batches_albums(&self) -> bool {
        self.album_min.is_some() || self.album_complete
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathSettings {
    pub default: String,
    pub compilation: String,
    pub soundtrack: String,
    pub classical: String,
    /// Transliterate target paths to ASCII.
    pub ascii: bool,
    /// Avoid characters that need quoting in a shell.
    pub shell_friendly: bool,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            default: "$initial_artist/%shorten{$combined_artist_sort}/%shorten{$combined_album}%ifdef{combined_year,_$combined_year}/${combined_disctrack}_%shorten{$title}".to_string(),
            compilation: "_compilations/$initial_album/%shorten{$combined_album}%ifdef{combined_year,_$combined_year}/${combined_disctrack}_%shorten{$title}".to_string(),
            soundtrack: "_soundtrack/$initial_album/%shorten{$combined_album}%ifdef{combined_year,_$combined_year}/${combined_disctrack}_%shorten{$artist}_%shorten{$title}".to_string(),
            classical: "$initial_composer/%shorten{$combined_composer}/%shorten{$work_top,48}_[%shorten{$classical_performer,32}]/${classical_track}_%shorten{$classical_title,64}".to_string(),
            ascii: false,
            shell_friendly: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetadataSettings {
    /// Use the classical template for every file.
    pub classical: bool,
    /// Genres rendered with the classical template.
    pub genre_classical: Vec<String>,
    /// Release group types rendered with the soundtrack template.
    pub soundtrack_types: Vec<String>,
    /// Fetch the work hierarchy and write it to the tags.
    pub enrich: bool,
    /// Rewrite album/title/track with their classical equivalents.
    pub remap_classical: bool,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            classical: false,
            genre_classical: vec![
                "classical".into(),
                "klassik".into(),
                "opera".into(),
                "chamber music".into(),
            ],
            soundtrack_types: vec!["soundtrack".into()],
            enrich: false,
            remap_classical: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MusicBrainzSettings {
    pub base_url: String,
    pub user_agent: String,
    /// Minimum delay between two requests (milliseconds).
    pub rate_limit_ms: u64,
    pub timeout_secs: u64,
}

impl Default for MusicBrainzSettings {
    fn default() -> Self {
        Self {
            base_url: "https://musicbrainz.org/ws/2".to_string(),
            user_agent: concat!("tunesort/", env!("CARGO_PKG_VERSION")).to_string(),
            rate_limit_ms: 1000,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    /// Also the candidates probed when looking for an existing target.
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "flac".into(),
                "m4a".into(),
                "mp3".into(),
                "ogg".into(),
                "opus".into(),
                "wma".into(),
            ],
            follow_links: false,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

impl LibrarySettings {
    /// Configured extensions, lower-cased and without leading dots.
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect()
    }
}
