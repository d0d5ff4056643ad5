use std::path::{Path, PathBuf};

use clap::Parser;

use crate::batch;
use crate::cli::Args;
use crate::config::Settings;
use crate::musicbrainz::{MusicBrainzClient, WorkCatalog};
use crate::rename::Job;
use crate::tags::LoftyTagStore;

mod logging;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init(args.verbose);

    let settings = settings::load_settings(&args)?;
    if args.show_config {
        print!("{}", toml::to_string_pretty(&settings)?);
        return Ok(());
    }

    let source = absolute(&args.source)?;
    if !source.exists() {
        return Err(format!("{} does not exist", source.display()).into());
    }
    let target_root = target_root(&settings, &source)?;
    tracing::debug!(source = %source.display(), target = %target_root.display(), "paths");

    let store = LoftyTagStore;
    let client = settings
        .metadata
        .enrich
        .then(|| MusicBrainzClient::new(&settings.musicbrainz));
    let catalog = client.as_ref().map(|c| c as &dyn WorkCatalog);

    let mut job = Job::new(settings.clone(), target_root, &store, catalog)?;

    if args.field_list {
        batch::traverse(&source, &settings, &store, |path| match job.field_list(path) {
            Ok(listing) => print!("{listing}"),
            Err(e) => tracing::warn!("{e}"),
        });
        return Ok(());
    }

    if args.track_listing {
        batch::traverse(&source, &settings, &store, |path| {
            match job.track_listing_line(path) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!("{e}"),
            }
        });
        return Ok(());
    }

    let failures = job.run(&source);

    if args.stats {
        println!("{}", job.counters());
        if failures > 0 {
            println!("{:<12} {failures}", "Failed:");
        }
    }

    if failures > 0 {
        return Err(format!("{failures} file(s) failed").into());
    }
    Ok(())
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// The configured target, else the source directory (or a file's parent).
fn target_root(settings: &Settings, source: &Path) -> std::io::Result<PathBuf> {
    if let Some(target) = &settings.rename.target {
        return absolute(target);
    }
    if source.is_file() {
        return Ok(source.parent().map(Path::to_path_buf).unwrap_or_default());
    }
    Ok(source.to_path_buf())
}
