//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the tag reader/writer.
#[derive(Error, Debug)]
pub enum TagError {
    /// The file could not be parsed: treated as a broken file.
    #[error("broken file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("no writable tag in {0}")]
    NoTag(PathBuf),

    #[error("failed to write tags to {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Failures of the classical-work catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("catalog request failed: {0}")]
    Transport(String),

    #[error("unexpected catalog response: {0}")]
    BadResponse(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QualityError {
    #[error("no ranking for codec '{0}'")]
    UnknownCodec(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unterminated function call '%{0}' at offset {1}")]
    Unterminated(String, usize),

    #[error("unknown template function '%{0}'")]
    UnknownFunction(String),

    #[error("invalid arguments to '%{name}': {message}")]
    BadArguments { name: String, message: String },
}

/// Failures that abort the action for one file.
#[derive(Error, Debug)]
pub enum RenameError {
    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Quality(#[from] QualityError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Tag(#[from] TagError),

    #[error("target path of {0} renders empty")]
    EmptyTarget(PathBuf),
}

impl RenameError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
