//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Build, minify, deploy and package small JavaScript/CSS libraries
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: litepack.toml, searched upward from cwd)
    #[arg(short = 'C', long, global = true, default_value = "litepack.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Minify and assemble the JS and CSS artifacts
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Build, then copy the artifacts to the remote host with scp
    #[command(visible_alias = "d")]
    Deploy {
        #[command(flatten)]
        build_args: BuildArgs,

        #[command(flatten)]
        remote: DeployArgs,
    },

    /// Create a source tarball, leaving out ignored files
    #[command(visible_alias = "p")]
    Package {
        #[command(flatten)]
        args: PackageArgs,
    },
}

/// Shared build arguments for Build and Deploy commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Release version stamped into artifact names and the header
    #[arg(short, long, value_name = "VERSION")]
    pub release: Option<String>,

    /// Artifact directory (relative to the working directory)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// JavaScript source directory
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub js_src: Option<PathBuf>,

    /// CSS source directory
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub css_src: Option<PathBuf>,

    /// Path to the external JS minifier (e.g. yuicompressor.jar)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub tool: Option<PathBuf>,

    /// Number of files minified in parallel
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Leave out files that fail to minify instead of aborting (not recommended)
    #[arg(long)]
    pub skip_failed: bool,

    /// Skip the JavaScript artifact
    #[arg(long)]
    pub no_js: bool,

    /// Skip the CSS artifact
    #[arg(long)]
    pub no_css: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// Remote overrides for Deploy
#[derive(clap::Args, Debug, Clone, Default)]
pub struct DeployArgs {
    /// Remote host
    #[arg(long)]
    pub host: Option<String>,

    /// Remote user
    #[arg(short, long)]
    pub user: Option<String>,

    /// SSH port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Remote destination directory
    #[arg(long, value_name = "PATH")]
    pub dest: Option<String>,
}

/// Package command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PackageArgs {
    /// Release version stamped into the tarball name
    #[arg(short, long, value_name = "VERSION")]
    pub release: Option<String>,

    /// Directory the tarball is written to
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Source tree to package
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub src: Option<PathBuf>,

    /// Copy the tarball to the [deploy] destination afterwards
    #[arg(long)]
    pub push: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}
