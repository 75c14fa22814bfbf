//! Path utilities.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `expand_path`)
//! - [`pattern`]: File-name wildcard matching (`FilePattern`)

pub mod fs;
pub mod pattern;

pub use fs::{expand_path, normalize_path};
pub use pattern::FilePattern;
