//! Build target kinds.

use std::fmt;

/// Kind of build target, determines artifact naming and minification strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// JavaScript sources, minified by an external tool
    Js,
    /// Stylesheets, reduced by the built-in CSS reducer
    Css,
}

impl TargetKind {
    /// Display name, also used as log module and progress counter.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Js => "js",
            Self::Css => "css",
        }
    }

    /// Artifact file name for a product/version pair.
    ///
    /// - `Js`  -> `<product>_<version>.min.js`
    /// - `Css` -> `<product>_CSS_<version>.min.js`
    pub fn artifact_name(self, product: &str, version: &str) -> String {
        match self {
            Self::Js => format!("{product}_{version}.min.js"),
            Self::Css => format!("{product}_CSS_{version}.min.js"),
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
