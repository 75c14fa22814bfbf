//! `[build]` section configuration.
//!
//! ```toml
//! [build]
//! output = "build"      # artifact directory
//! on_failure = "abort"  # abort | skip
//! jobs = 1              # >1 minifies files in parallel
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::pipeline::FailurePolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    pub output: PathBuf,
    pub on_failure: FailurePolicy,
    pub jobs: usize,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("build"),
            on_failure: FailurePolicy::Abort,
            jobs: 1,
        }
    }
}

impl BuildSectionConfig {
    pub const OUTPUT: FieldPath = FieldPath::new("build.output");
    pub const ON_FAILURE: FieldPath = FieldPath::new("build.on_failure");
    pub const JOBS: FieldPath = FieldPath::new("build.jobs");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.jobs == 0 {
            diag.error(Self::JOBS, "jobs must be at least 1");
        }
        if self.output.is_file() {
            diag.error(
                Self::OUTPUT,
                format!("`{}` is a file, not a directory", self.output.display()),
            );
        }
        if self.on_failure == FailurePolicy::Skip {
            diag.warn(
                Self::ON_FAILURE,
                "files that fail to minify are left out of the artifact",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_build_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.output, PathBuf::from("build"));
        assert_eq!(config.build.on_failure, FailurePolicy::Abort);
        assert_eq!(config.build.jobs, 1);
    }

    #[test]
    fn test_build_skip_policy() {
        let config = test_parse_config("[build]\non_failure = \"skip\"\njobs = 4");
        assert_eq!(config.build.on_failure, FailurePolicy::Skip);
        assert_eq!(config.build.jobs, 4);

        let mut diag = ConfigDiagnostics::new();
        config.build.validate(&mut diag);
        assert!(diag.is_empty());
        assert_eq!(diag.warnings().len(), 1);
    }

    #[test]
    fn test_zero_jobs_is_error() {
        let config = test_parse_config("[build]\njobs = 0");
        let mut diag = ConfigDiagnostics::new();
        config.build.validate(&mut diag);
        assert_eq!(diag.errors()[0].field, BuildSectionConfig::JOBS);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let result = crate::config::ProjectConfig::parse_with_ignored("[build]\non_failure = \"retry\"");
        assert!(result.is_err());
    }
}
