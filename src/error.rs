//! Fatal errors of a generation run.
//!
//! Anything here aborts the run. Conditions the resolver recovers from
//! locally are [`Diagnostic`](crate::hir::Diagnostic)s instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error as ThisError;

/// Crate-wide result alias.
pub type Result<T, E = GenError> = std::result::Result<T, E>;

#[derive(Debug, ThisError)]
pub enum GenError {
    #[error("annotation marker is empty")]
    EmptyMarker,

    #[error("no source paths given")]
    NoSources,

    #[error("cannot read source path {}: {source}", .path.display())]
    UnreadablePath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read file list {}: {source}", .path.display())]
    UnreadableFileList {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write output {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

impl GenError {
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        GenError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}
