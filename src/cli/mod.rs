//! Command-line interface module.

mod args;
pub mod build;
pub mod deploy;
pub mod package;

pub use args::{BuildArgs, Cli, Commands, DeployArgs, PackageArgs};
