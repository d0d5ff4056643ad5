//! File-system mutations. Every operation creates missing parent
//! directories first and does nothing but log under dry run.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::RenameError;

#[derive(Debug, Clone, Copy)]
pub struct FileOps {
    dry_run: bool,
}

impl FileOps {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn ensure_parent(&self, path: &Path) -> Result<(), RenameError> {
        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
                fs::create_dir_all(dir).map_err(|e| RenameError::io("create directory", dir, e))
            }
            _ => Ok(()),
        }
    }

    /// Rename `from` to `to`. Only a cross-device rename falls back to
    /// copy and remove; a failed fallback leaves no copy behind.
    pub fn move_file(&self, from: &Path, to: &Path) -> Result<(), RenameError> {
        if self.dry_run {
            tracing::debug!(from = %from.display(), to = %to.display(), "dry run: skip move");
            return Ok(());
        }
        self.ensure_parent(to)?;
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(e) if crosses_devices(&e) => copy_then_remove(from, to),
            Err(e) => Err(RenameError::io("move", from, e)),
        }
    }

    pub fn copy_file(&self, from: &Path, to: &Path) -> Result<(), RenameError> {
        if self.dry_run {
            tracing::debug!(from = %from.display(), to = %to.display(), "dry run: skip copy");
            return Ok(());
        }
        self.ensure_parent(to)?;
        fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| RenameError::io("copy", from, e))
    }

    pub fn delete(&self, path: &Path) -> Result<(), RenameError> {
        if self.dry_run {
            tracing::debug!(path = %path.display(), "dry run: skip delete");
            return Ok(());
        }
        fs::remove_file(path).map_err(|e| RenameError::io("delete", path, e))
    }

    /// Move `path` out of the way: into `folder` when given, else to
    /// `<path>.bak`. An earlier backup of the same name is never replaced.
    pub fn backup(&self, path: &Path, folder: Option<&Path>) -> Result<PathBuf, RenameError> {
        let dest = unused_path(backup_path(path, folder));
        if self.dry_run {
            tracing::debug!(path = %path.display(), to = %dest.display(), "dry run: skip backup");
            return Ok(dest);
        }
        self.move_file(path, &dest)?;
        Ok(dest)
    }
}

fn crosses_devices(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::CrossesDevices
}

fn copy_then_remove(from: &Path, to: &Path) -> Result<(), RenameError> {
    if let Err(e) = fs::copy(from, to) {
        let _ = fs::remove_file(to);
        return Err(RenameError::io("move", from, e));
    }
    if let Err(e) = fs::remove_file(from) {
        if let Err(cleanup) = fs::remove_file(to) {
            tracing::warn!("could not remove partial copy {}: {cleanup}", to.display());
        }
        return Err(RenameError::io("remove after copy", from, e));
    }
    Ok(())
}

pub fn backup_path(path: &Path, folder: Option<&Path>) -> PathBuf {
    match (folder, path.file_name()) {
        (Some(folder), Some(name)) => folder.join(name),
        _ => with_suffix(path, "bak"),
    }
}

/// `path` itself when free, else the first free `<path>.1`, `<path>.2`, ...
pub fn unused_path(path: PathBuf) -> PathBuf {
    if !path.exists() {
        return path;
    }
    let mut n: u32 = 1;
    loop {
        let candidate = with_suffix(&path, &n.to_string());
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(".");
    s.push(suffix);
    PathBuf::from(s)
}
