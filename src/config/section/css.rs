//! `[css]` section configuration.
//!
//! ```toml
//! [css]
//! enable = true
//! src = "css"
//! pattern = "*.css"
//! header = true
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::FilePattern;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CssConfig {
    pub enable: bool,
    pub src: PathBuf,
    pub pattern: String,
    pub header: bool,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            enable: true,
            src: PathBuf::from("css"),
            pattern: "*.css".to_string(),
            header: true,
        }
    }
}

impl CssConfig {
    pub const SRC: FieldPath = FieldPath::new("css.src");
    pub const PATTERN: FieldPath = FieldPath::new("css.pattern");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.enable {
            return;
        }
        if !self.src.is_dir() {
            diag.error_with_hint(
                Self::SRC,
                format!("source directory `{}` not found", self.src.display()),
                "pass --css-src <DIR>, or --no-css to skip the CSS artifact",
            );
        }
        if let Err(e) = FilePattern::new(&self.pattern) {
            diag.error(Self::PATTERN, format!("invalid pattern `{}`: {e}", self.pattern));
        }
    }
}
