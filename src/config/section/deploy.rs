//! `[deploy]` section configuration.
//!
//! Artifacts are copied with `scp -P <port> <file> <user>@<host>:<path>`.
//!
//! ```toml
//! [deploy]
//! host = "example.com"
//! user = "deploy"      # default: $USER
//! port = 22
//! path = "~"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub host: Option<String>,
    pub user: Option<String>,
    pub port: u16,
    /// Remote destination directory.
    pub path: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            host: None,
            user: None,
            port: 22,
            path: "~".to_string(),
        }
    }
}

impl DeployConfig {
    pub const HOST: FieldPath = FieldPath::new("deploy.host");
    pub const USER: FieldPath = FieldPath::new("deploy.user");
    pub const PORT: FieldPath = FieldPath::new("deploy.port");

    /// Configured user, else the login name from the environment.
    pub fn user(&self) -> Option<String> {
        self.user
            .clone()
            .filter(|u| !u.is_empty())
            .or_else(|| std::env::var("USER").ok().filter(|u| !u.is_empty()))
            .or_else(|| std::env::var("USERNAME").ok().filter(|u| !u.is_empty()))
    }

    /// `user@host:path`, once validated.
    pub fn remote(&self) -> Option<String> {
        let host = self.host.as_deref().filter(|h| !h.is_empty())?;
        let user = self.user()?;
        Some(format!("{user}@{host}:{}", self.path))
    }

    /// Only checked when a command actually deploys.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.host.as_deref().is_none_or(str::is_empty) {
            diag.error_with_hint(
                Self::HOST,
                "no deploy host configured",
                "set [deploy] host or pass --host",
            );
        }
        if self.user().is_none() {
            diag.error_with_hint(
                Self::USER,
                "no deploy user configured and $USER is unset",
                "set [deploy] user or pass --user",
            );
        }
        if self.port == 0 {
            diag.error(Self::PORT, "port must be between 1 and 65535");
        }
    }
}
