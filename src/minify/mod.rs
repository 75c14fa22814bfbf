//! Minification backends.
//!
//! A [`Minifier`] turns one source file into one minified fragment. The JS
//! target shells out to an external tool ([`ExternalMinifier`]); the CSS target
//! runs the built-in lexical reducer ([`CssReducer`]).

mod css;
mod external;

pub use css::CssReducer;
pub use external::{ExternalMinifier, ToolError, ToolSpec, is_command_name, resolve_tool};

use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Why a single file could not be minified.
#[derive(Debug, Error)]
pub enum MinifyError {
    #[error("cannot read source")]
    Read(#[source] std::io::Error),

    #[error("{0}")]
    Failed(String),

    #[error("minifier produced no output")]
    EmptyOutput,

    #[error("timed out after {}s", .0.as_secs_f32())]
    TimedOut(Duration),

    #[error("interrupted")]
    Cancelled,
}

/// Capability: minify the file at `path` and return the fragment text.
///
/// Implementations must be independent per call; the invoker may call them
/// from several threads at once when parallel minification is enabled.
pub trait Minifier: Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    fn minify(&self, path: &Path) -> Result<String, MinifyError>;
}
