//! Project configuration management for `litepack.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # One module per TOML section
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # Config file lookup
//! └── mod.rs         # ProjectConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section         | Purpose                                     |
//! |-----------------|---------------------------------------------|
//! | `[product]`     | Artifact name and version                   |
//! | `[header]`      | License header prepended to artifacts       |
//! | `[build]`       | Output directory, failure policy, jobs      |
//! | `[js]`          | JS sources, dependency order, minifier tool |
//! | `[css]`         | CSS sources                                 |
//! | `[deploy]`      | scp destination                             |
//! | `[package]`     | Source tarball                              |
//!
//! Paths in the file resolve against the file's directory; paths given on the
//! command line resolve against the working directory. CLI values win.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    BuildSectionConfig, CssConfig, DeployConfig, HeaderConfig, JsConfig, PackageConfig,
    ProductConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{BuildArgs, Cli, Commands, DeployArgs, PackageArgs},
    debug, log,
    pipeline::FailurePolicy,
    utils::path::{expand_path, normalize_path},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "litepack.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing litepack.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Absolute path to the config file, `None` when running on defaults
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory - parent of config file, or cwd
    #[serde(skip)]
    pub root: PathBuf,

    /// `--tool` from the command line, ahead of `[js.minifier] tool`
    #[serde(skip)]
    pub tool_override: Option<PathBuf>,

    #[serde(default)]
    pub product: ProductConfig,

    #[serde(default)]
    pub header: HeaderConfig,

    #[serde(default)]
    pub build: BuildSectionConfig,

    #[serde(default)]
    pub js: JsConfig,

    #[serde(default)]
    pub css: CssConfig,

    #[serde(default)]
    pub deploy: DeployConfig,

    #[serde(default)]
    pub package: PackageConfig,
}

impl ProjectConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file. Without one, defaults are
    /// used with cwd as root, unless `-C` named a file explicitly.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(normalize_path(&path));
                config
            }
            None if cli.config != Path::new(CONFIG_FILE) => {
                return Err(ConfigError::NotFound(cli.config.clone()).into());
            }
            None => {
                debug!("config"; "no {} found, using defaults", CONFIG_FILE);
                Self::default()
            }
        };

        let root = config
            .config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| cwd.clone(), Path::to_path_buf);

        config.finalize(&root, &cwd, &cli.command);
        config.validate(&cli.command)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    pub(crate) fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve paths and apply command-line overrides.
    fn finalize(&mut self, root: &Path, cwd: &Path, command: &Commands) {
        self.root = normalize_path(root);
        self.normalize_paths();

        match command {
            Commands::Build { build_args } => self.apply_build_args(build_args, cwd),
            Commands::Deploy { build_args, remote } => {
                self.apply_build_args(build_args, cwd);
                self.apply_deploy_args(remote);
            }
            Commands::Package { args } => self.apply_package_args(args, cwd),
        }
    }

    /// Get the root directory path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory artifacts and tarballs are written to.
    pub fn output_dir(&self) -> &Path {
        &self.build.output
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    fn apply_build_args(&mut self, args: &BuildArgs, cwd: &Path) {
        crate::logger::set_verbose(args.verbose);

        if let Some(version) = &args.release {
            self.product.version = Some(version.clone());
        }
        Self::update_path(&mut self.build.output, args.output.as_deref(), cwd);
        Self::update_path(&mut self.js.src, args.js_src.as_deref(), cwd);
        Self::update_path(&mut self.css.src, args.css_src.as_deref(), cwd);
        Self::update_option(&mut self.build.jobs, args.jobs.as_ref());

        self.tool_override = args
            .tool
            .as_deref()
            .map(|p| self.js.minifier.tool_path(p, cwd));

        if args.skip_failed {
            self.build.on_failure = FailurePolicy::Skip;
        }
        if args.no_js {
            self.js.enable = false;
        }
        if args.no_css {
            self.css.enable = false;
        }
    }

    fn apply_deploy_args(&mut self, args: &DeployArgs) {
        if let Some(host) = &args.host {
            self.deploy.host = Some(host.clone());
        }
        if let Some(user) = &args.user {
            self.deploy.user = Some(user.clone());
        }
        Self::update_option(&mut self.deploy.port, args.port.as_ref());
        Self::update_option(&mut self.deploy.path, args.dest.as_ref());
    }

    fn apply_package_args(&mut self, args: &PackageArgs, cwd: &Path) {
        crate::logger::set_verbose(args.verbose);

        if let Some(version) = &args.release {
            self.product.version = Some(version.clone());
        }
        Self::update_path(&mut self.build.output, args.output.as_deref(), cwd);
        Self::update_path(&mut self.package.src, args.src.as_deref(), cwd);
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Replace a path with a CLI value resolved against `cwd`.
    fn update_path(config_path: &mut PathBuf, cli_path: Option<&Path>, cwd: &Path) {
        if let Some(path) = cli_path {
            *config_path = expand_path(path, cwd);
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Normalize all file-provided paths relative to the root directory.
    fn normalize_paths(&mut self) {
        let root = self.root.clone();
        self.build.output = expand_path(&self.build.output, &root);
        self.js.src = expand_path(&self.js.src, &root);
        self.css.src = expand_path(&self.css.src, &root);
        self.package.src = expand_path(&self.package.src, &root);
        if let Some(tool) = self.js.minifier.tool.take() {
            self.js.minifier.tool = Some(self.js.minifier.tool_path(&tool, &root));
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration for a command.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self, command: &Commands) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.product.validate(&mut diag);

        match command {
            Commands::Build { .. } => self.validate_build(&mut diag),
            Commands::Deploy { .. } => {
                self.validate_build(&mut diag);
                self.deploy.validate(&mut diag);
            }
            Commands::Package { args } => {
                self.package.validate(&mut diag);
                if args.push {
                    self.deploy.validate(&mut diag);
                }
            }
        }

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    fn validate_build(&self, diag: &mut ConfigDiagnostics) {
        self.header.validate(diag);
        self.build.validate(diag);
        self.js.validate(diag);
        self.css.validate(diag);

        if !self.js.enable && !self.css.enable {
            diag.error_with_hint(
                FieldPath::new("js.enable"),
                "both the JS and the CSS target are disabled",
                "drop --no-js or --no-css",
            );
        }
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse a config snippet.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ProjectConfig {
    let (parsed, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
