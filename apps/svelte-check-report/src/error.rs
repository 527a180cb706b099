//! Crate error type.
//!
//! Only the collaborators around the store can fail: compiling globs,
//! reading config and change lists, and spawning external tools. The store
//! itself is total and never produces an `Error`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("svelte-check failed in {} (exit code {code}): {stderr}", .root.display())]
    ToolFailed {
        root: PathBuf,
        code: i32,
        stderr: String,
    },

    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("unsupported glob pattern '{pattern}': extglob groups are not supported")]
    UnsupportedGlob { pattern: String },

    #[error("invalid root pattern '{pattern}': {source}")]
    InvalidRootGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("invalid config file {}: {message}", .path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("git: {message}")]
    Git { message: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
