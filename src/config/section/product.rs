//! `[product]` section configuration.
//!
//! ```toml
//! [product]
//! name = "JSLITE"
//! version = "1.2.0"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductConfig {
    /// Artifact prefix and header product name.
    pub name: String,
    /// Release version; `--release` overrides it.
    pub version: Option<String>,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            name: "JSLITE".to_string(),
            version: None,
        }
    }
}

impl ProductConfig {
    pub const NAME: FieldPath = FieldPath::new("product.name");
    pub const VERSION: FieldPath = FieldPath::new("product.version");

    /// Version, or empty when unset (validation rejects that before use).
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or_default()
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.name.trim().is_empty() {
            diag.error(Self::NAME, "product name must not be empty");
        } else if !is_file_name_safe(&self.name) {
            diag.error(Self::NAME, format!("`{}` is not usable in a file name", self.name));
        }

        match self.version.as_deref().map(str::trim) {
            None | Some("") => diag.error_with_hint(
                Self::VERSION,
                "a version is required",
                "pass --release <VERSION> or set [product] version",
            ),
            Some(v) if !is_file_name_safe(v) => {
                diag.error(Self::VERSION, format!("`{v}` is not usable in a file name"));
            }
            Some(_) => {}
        }
    }
}

fn is_file_name_safe(s: &str) -> bool {
    !s.chars()
        .any(|c| c == '/' || c == '\\' || c.is_whitespace() || c.is_control())
}
