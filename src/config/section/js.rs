//! `[js]` section configuration.
//!
//! ```toml
//! [js]
//! enable = true
//! src = "src"
//! pattern = "JSLITE*.js"
//! dependencies = ["JSLITE.prototype.js", "JSLITE.js"]
//! header = false
//!
//! [js.minifier]
//! tool = "~/bin/yuicompressor.jar"   # or $YUICOMPRESSOR
//! env = "YUICOMPRESSOR"
//! runner = ["java", "-jar"]          # [] runs the tool directly
//! args = []
//! timeout = 60                       # seconds per file
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::minify::{ToolSpec, is_command_name};
use crate::utils::path::{FilePattern, expand_path};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsConfig {
    pub enable: bool,
    pub src: PathBuf,
    pub pattern: String,
    /// File names minified first, in this order.
    pub dependencies: Vec<String>,
    /// Prefix the artifact with the license header.
    pub header: bool,
    pub minifier: MinifierConfig,
}

impl Default for JsConfig {
    fn default() -> Self {
        Self {
            enable: true,
            src: PathBuf::from("src"),
            pattern: "JSLITE*.js".to_string(),
            dependencies: vec!["JSLITE.prototype.js".into(), "JSLITE.js".into()],
            header: false,
            minifier: MinifierConfig::default(),
        }
    }
}

impl JsConfig {
    pub const SRC: FieldPath = FieldPath::new("js.src");
    pub const PATTERN: FieldPath = FieldPath::new("js.pattern");
    pub const DEPENDENCIES: FieldPath = FieldPath::new("js.dependencies");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.enable {
            return;
        }

        if !self.src.is_dir() {
            diag.error_with_hint(
                Self::SRC,
                format!("source directory `{}` not found", self.src.display()),
                "pass --js-src <DIR>, or --no-js to skip the JS artifact",
            );
        }

        if let Err(e) = FilePattern::new(&self.pattern) {
            diag.error(Self::PATTERN, format!("invalid pattern `{}`: {e}", self.pattern));
        }

        for dep in &self.dependencies {
            if dep.is_empty() || dep.contains('/') || dep.contains('\\') {
                diag.error(
                    Self::DEPENDENCIES,
                    format!("`{dep}` must be a plain file name inside {}", Self::SRC.as_str()),
                );
            }
        }

        self.minifier.validate(diag);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinifierConfig {
    /// Tool path; falls back to `$<env>` when unset.
    pub tool: Option<PathBuf>,
    /// Environment variable consulted last.
    pub env: String,
    pub runner: Vec<String>,
    pub args: Vec<String>,
    /// Per-file timeout in seconds.
    pub timeout: u64,
}

impl Default for MinifierConfig {
    fn default() -> Self {
        Self {
            tool: None,
            env: "YUICOMPRESSOR".to_string(),
            runner: vec!["java".into(), "-jar".into()],
            args: Vec::new(),
            timeout: 60,
        }
    }
}

impl MinifierConfig {
    pub const TIMEOUT: FieldPath = FieldPath::new("js.minifier.timeout");
    pub const RUNNER: FieldPath = FieldPath::new("js.minifier.runner");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.timeout == 0 {
            diag.error(Self::TIMEOUT, "timeout must be at least 1 second");
        }
        if self.runner.first().is_some_and(|r| r.trim().is_empty()) {
            diag.error(Self::RUNNER, "runner program must not be empty");
        }
    }

    /// Resolve a configured tool against `base`.
    ///
    /// A bare command name stays as-is when the tool runs without a runner,
    /// so it can be found on `PATH` later.
    pub fn tool_path(&self, tool: &Path, base: &Path) -> PathBuf {
        if self.runner.is_empty() && is_command_name(tool) {
            tool.to_path_buf()
        } else {
            expand_path(tool, base)
        }
    }

    /// Spec for a tool path resolved elsewhere.
    pub fn tool_spec(&self, tool: &Path) -> ToolSpec {
        ToolSpec {
            runner: self.runner.clone(),
            tool: tool.to_path_buf(),
            args: self.args.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}
