//! litepack - dependency-ordered build, minify and deploy for small JS/CSS libraries.

mod cli;
mod config;
mod core;
mod logger;
mod minify;
mod pipeline;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, build::build_all};
use config::ProjectConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = ProjectConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { .. } => build_all(&config).map(|_| ()),
        Commands::Deploy { .. } => {
            let reports = build_all(&config)?;
            let files: Vec<_> = reports.iter().map(|r| r.artifact.path.as_path()).collect();
            cli::deploy::push_files(&config.deploy, &files)?;
            log!("done"; "deployed to {}", config.deploy.host.as_deref().unwrap_or_default());
            Ok(())
        }
        Commands::Package { args } => {
            let archive = cli::package::package(&config)?;
            if args.push {
                cli::deploy::push_files(&config.deploy, &[archive])?;
            }
            Ok(())
        }
    }
}
