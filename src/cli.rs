//! Command-line interface definitions.
//!
//! This module contains the `clap`-powered CLI surface area. Every option
//! that mirrors a settings key is turned into an override so the command
//! line wins over the config file and the environment.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::Override;

#[derive(Parser, Debug, Default)]
#[command(name = "tunesort", version, about)]
pub struct Args {
    /// Audio file or directory to process
    pub source: PathBuf,

    /// Root directory of the renamed files (defaults to the source root)
    #[arg(short, long)]
    pub target: Option<PathBuf>,

    /// Config file (overrides TUNESORT_CONFIG_PATH)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Copy instead of move
    #[arg(short = 'C', long, conflicts_with = "no_rename")]
    pub copy: bool,

    /// Only run the metadata actions, do not rename
    #[arg(long)]
    pub no_rename: bool,

    /// Show what would happen without touching any file
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Keep whichever of source and existing target has the better format
    #[arg(short = 'b', long)]
    pub best_format: bool,

    /// Back up a replaced target (`*.bak` or the backup folder)
    #[arg(long, conflicts_with = "delete")]
    pub backup: bool,

    /// Delete a replaced target
    #[arg(long)]
    pub delete: bool,

    /// Folder for backed up targets
    #[arg(long)]
    pub backup_folder: Option<PathBuf>,

    /// Delete the source when the target already exists and is not worse
    #[arg(short = 'D', long)]
    pub delete_existing: bool,

    /// Skip albums with this many tracks or fewer
    #[arg(long, value_name = "COUNT")]
    pub album_min: Option<usize>,

    /// Skip albums whose track count differs from the highest track number
    #[arg(long)]
    pub album_complete: bool,

    /// Skip files where this field is empty
    #[arg(long, value_name = "FIELD")]
    pub skip_if_empty: Option<String>,

    /// Audio file extensions, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub extension: Vec<String>,

    /// Path template for regular files
    #[arg(short, long)]
    pub format: Option<String>,

    /// Path template for compilations
    #[arg(long)]
    pub compilation: Option<String>,

    /// Path template for soundtracks
    #[arg(long)]
    pub soundtrack: Option<String>,

    /// Use the classical template for every file
    #[arg(short = 'k', long)]
    pub classical: bool,

    /// Transliterate target paths to ASCII
    #[arg(long)]
    pub ascii: bool,

    /// Avoid characters that need quoting in a shell
    #[arg(short = 'S', long)]
    pub shell_friendly: bool,

    /// Fetch the classical work hierarchy and store it in the tags
    #[arg(long)]
    pub enrich_metadata: bool,

    /// Rewrite album, title and track with their classical equivalents
    #[arg(long)]
    pub remap_classical: bool,

    /// Print all fields of each file instead of renaming
    #[arg(long)]
    pub field_list: bool,

    /// Print a numbered classical track listing instead of renaming
    #[arg(long)]
    pub track_listing: bool,

    /// Print the effective settings and exit
    #[arg(long)]
    pub show_config: bool,

    /// Print a summary of all outcomes at the end
    #[arg(short, long)]
    pub stats: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Settings overrides for every option given on the command line.
    pub fn overrides(&self) -> Vec<Override> {
        let mut out: Vec<Override> = Vec::new();
        let mut flag = |key: &'static str, set: bool| {
            if set {
                out.push((key, true.into()));
            }
        };

        flag("rename.dry_run", self.dry_run);
        flag("rename.best_format", self.best_format);
        flag("rename.delete_existing", self.delete_existing);
        flag("filter.album_complete", self.album_complete);
        flag("metadata.classical", self.classical);
        flag("metadata.enrich", self.enrich_metadata);
        flag("metadata.remap_classical", self.remap_classical);
        flag("path.ascii", self.ascii);
        flag("path.shell_friendly", self.shell_friendly);

        if self.copy {
            out.push(("rename.action", "copy".into()));
        } else if self.no_rename {
            out.push(("rename.action", "no-rename".into()));
        }
        if self.backup {
            out.push(("rename.cleaning", "backup".into()));
        } else if self.delete {
            out.push(("rename.cleaning", "delete".into()));
        }

        let path = |p: &PathBuf| -> ::config::Value { p.to_string_lossy().into_owned().into() };
        if let Some(target) = &self.target {
            out.push(("rename.target", path(target)));
        }
        if let Some(folder) = &self.backup_folder {
            out.push(("rename.backup_folder", path(folder)));
        }
        if let Some(min) = self.album_min {
            out.push(("filter.album_min", (min as i64).into()));
        }
        if let Some(field) = &self.skip_if_empty {
            out.push(("filter.field_skip", field.clone().into()));
        }
        if !self.extension.is_empty() {
            out.push(("library.extensions", self.extension.clone().into()));
        }
        if let Some(t) = &self.format {
            out.push(("path.default", t.clone().into()));
        }
        if let Some(t) = &self.compilation {
            out.push(("path.compilation", t.clone().into()));
        }
        if let Some(t) = &self.soundtrack {
            out.push(("path.soundtrack", t.clone().into()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_into_overrides() {
        let args = Args::try_parse_from([
            "tunesort",
            "/music",
            "--copy",
            "--dry-run",
            "--backup",
            "--album-min",
            "3",
            "-e",
            "flac,mp3",
        ])
        .unwrap();

        let keys: Vec<&str> = args.overrides().iter().map(|(k, _)| *k).collect();
        assert!(keys.contains(&"rename.action"));
        assert!(keys.contains(&"rename.dry_run"));
        assert!(keys.contains(&"rename.cleaning"));
        assert!(keys.contains(&"filter.album_min"));
        assert!(keys.contains(&"library.extensions"));
        assert!(!keys.contains(&"rename.best_format"));
        assert_eq!(args.extension, vec!["flac".to_string(), "mp3".to_string()]);
    }

    #[test]
    fn no_flags_means_no_overrides() {
        let args = Args::try_parse_from(["tunesort", "/music"]).unwrap();
        assert!(args.overrides().is_empty());
    }

    #[test]
    fn copy_and_no_rename_conflict() {
        assert!(Args::try_parse_from(["tunesort", "/m", "--copy", "--no-rename"]).is_err());
    }

    #[test]
    fn overrides_reach_settings() {
        let args = Args::try_parse_from(["tunesort", "/m", "--no-rename", "--delete", "-t", "/out"])
            .unwrap();
        let s = crate::config::Settings::load_with(None, &args.overrides()).unwrap();
        assert_eq!(s.rename.action, crate::config::MoveAction::NoRename);
        assert_eq!(s.rename.cleaning, crate::config::CleaningAction::Delete);
        assert_eq!(s.rename.target, Some(PathBuf::from("/out")));
    }
}
