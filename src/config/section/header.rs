//! `[header]` section configuration.
//!
//! ```toml
//! [header]
//! enable = true
//! license = [
//!     "Copyright (c) 2009 - 2015 Example Author",
//!     "Dual licensed under the MIT and GPL licenses.",
//! ]
//! template = "/* {name} {version} */\n"   # optional
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::pipeline::{DEFAULT_TEMPLATE, render_header};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub enable: bool,
    /// License lines, one ` * ` line each.
    pub license: Vec<String>,
    /// Custom template with `{name}`, `{version}` and `{license}` placeholders.
    pub template: Option<String>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            enable: true,
            license: Vec::new(),
            template: None,
        }
    }
}

impl HeaderConfig {
    pub const TEMPLATE: FieldPath = FieldPath::new("header.template");

    /// Rendered header, or `None` when disabled.
    pub fn render(&self, name: &str, version: &str) -> Option<String> {
        self.enable.then(|| {
            let template = self.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
            render_header(template, name, version, &self.license)
        })
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(template) = &self.template
            && !template.contains("{version}")
        {
            diag.warn(Self::TEMPLATE, "template has no {version} placeholder");
        }
    }
}
