//! `[package]` section configuration.
//!
//! ```toml
//! [package]
//! src = "src"
//! ignore = ["a*", "_*"]   # matched against each entry's file name
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::FilePattern;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    pub src: PathBuf,
    pub ignore: Vec<String>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            src: PathBuf::from("src"),
            ignore: vec!["a*".into(), "_*".into()],
        }
    }
}

impl PackageConfig {
    pub const SRC: FieldPath = FieldPath::new("package.src");
    pub const IGNORE: FieldPath = FieldPath::new("package.ignore");

    /// Compiled ignore patterns; invalid ones are reported by `validate`.
    pub fn ignore_patterns(&self) -> Vec<FilePattern> {
        self.ignore
            .iter()
            .filter_map(|p| FilePattern::new(p).ok())
            .collect()
    }

    /// Only checked by `package`.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.src.is_dir() {
            diag.error_with_hint(
                Self::SRC,
                format!("source tree `{}` not found", self.src.display()),
                "set [package] src or pass --src",
            );
        }
        for pattern in &self.ignore {
            if let Err(e) = FilePattern::new(pattern) {
                diag.error(Self::IGNORE, format!("invalid pattern `{pattern}`: {e}"));
            }
        }
    }
}
