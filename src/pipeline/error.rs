//! Build pipeline error kinds.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::IllegalTransition;
use crate::minify::{MinifyError, ToolError};

/// Fatal build failure. Every variant aborts the running target.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Missing version, missing source directory, missing dependency file,
    /// or no matching files.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The external minifier could not be located.
    #[error(transparent)]
    ToolNotFound(#[from] ToolError),

    /// Minifying one file failed.
    #[error("failed to minify `{file}`: {source}")]
    Invocation {
        file: String,
        #[source]
        source: MinifyError,
    },

    /// The artifact could not be written. No partial artifact is left behind.
    #[error("failed to write `{}`: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Operator interrupt.
    #[error("build cancelled")]
    Cancelled,

    /// The pipeline was driven out of order, e.g. run a second time.
    #[error(transparent)]
    Transition(#[from] IllegalTransition),
}

impl BuildError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
