//! Error types for libpack-tool

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while planning or writing a package
#[derive(Debug, Error)]
pub enum PackError {
    #[error("missing required setting: {0}")]
    MissingSetting(&'static str),

    #[error("library file name '{0}' must be a plain file name without path separators")]
    InvalidLibraryName(String),

    #[error("invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write archive {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: async_zip::error::ZipError,
    },

    #[error("two archives would be written to {0}")]
    DuplicateArchiveName(PathBuf),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl PackError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PackError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the underlying I/O error kind, if this error came from the filesystem.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            PackError::Io { source, .. } | PackError::Runtime(source) => Some(source.kind()),
            PackError::Walk { source, .. } => source.io_error().map(|e| e.kind()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PackError>;
