//! File set resolution.
//!
//! ```text
//! dependencies = [b.js]          dir = { a.js, b.js, c.js, notes.txt }
//! pattern      = *.js
//!
//! resolved     = [b.js, a.js, c.js]
//!                 ^^^^  ^^^^^^^^^^
//!                 prefix  remainder (sorted, prefix names excluded)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use super::BuildError;
use crate::debug;
use crate::utils::path::FilePattern;

/// Ordered list of file names to minify, relative to one source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedFileSet {
    dir: PathBuf,
    names: Vec<String>,
    prefix_len: usize,
}

impl OrderedFileSet {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[cfg(test)]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Number of leading entries that came from the dependency list.
    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    /// `(name, full path)` pairs in order.
    pub fn entries(&self) -> Vec<(&str, PathBuf)> {
        self.names
            .iter()
            .map(|name| (name.as_str(), self.dir.join(name)))
            .collect()
    }
}

/// Resolve the ordered file set for one target.
///
/// Fails with [`BuildError::Configuration`] when the directory is missing, a
/// dependency is not a file in it, or the scan adds nothing beyond the
/// dependency list.
pub fn resolve_files(
    dir: &Path,
    pattern: &FilePattern,
    dependencies: &[String],
) -> Result<OrderedFileSet, BuildError> {
    if !dir.is_dir() {
        return Err(BuildError::config(format!(
            "source directory `{}` not found",
            dir.display()
        )));
    }

    // Prefix: caller order, first occurrence wins
    let mut seen = FxHashSet::default();
    let mut names = Vec::with_capacity(dependencies.len());
    for dep in dependencies {
        if !seen.insert(dep.as_str()) {
            continue;
        }
        if !dir.join(dep).is_file() {
            return Err(BuildError::config(format!(
                "dependency `{dep}` not found in `{}`",
                dir.display()
            )));
        }
        names.push(dep.clone());
    }
    let prefix_len = names.len();

    let mut remainder = scan_dir(dir, pattern)
        .map_err(|e| BuildError::config(format!("cannot read `{}`: {e}", dir.display())))?;
    remainder.retain(|name| !seen.contains(name.as_str()));
    remainder.sort();

    if remainder.is_empty() {
        return Err(BuildError::config(format!(
            "no files matching `{pattern}` found in `{}` (check the source path)",
            dir.display()
        )));
    }

    names.extend(remainder);
    Ok(OrderedFileSet {
        dir: dir.to_path_buf(),
        names,
        prefix_len,
    })
}

/// Names of regular files directly inside `dir` that match `pattern`.
fn scan_dir(dir: &Path, pattern: &FilePattern) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str().map(str::to_owned) else {
            debug!("resolve"; "skipping non-UTF-8 file name {}", file_name.to_string_lossy());
            continue;
        };
        if pattern.matches(&name) {
            names.push(name);
        }
    }
    Ok(names)
}
