//! Source tarball creation.
//!
//! ```text
//! <src>/                          <output>/.litepack-XXXX/          (staging)
//! ├── JSLITE.js        copy       ├── jslite/
//! ├── api.js      ──(ignore)──▶   │   ├── JSLITE.js
//! └── _scratch/                   │   └── ...
//!                                 └── JSLITE_1.2.0.tgz  ──rename──▶ <output>/JSLITE_1.2.0.tgz
//! ```
//!
//! Staging lives in the output directory so the final rename never crosses
//! filesystems. The staging directory is removed on every exit path.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::{
    config::ProjectConfig,
    core::is_shutdown,
    exec, log,
    pipeline::BuildError,
    utils::{path::FilePattern, plural_count},
};

/// Package the configured source tree; returns the tarball path.
pub fn package(config: &ProjectConfig) -> Result<PathBuf> {
    let name = &config.product.name;
    let version = config.product.version();
    let output = config.output_dir();

    fs::create_dir_all(output)
        .with_context(|| format!("failed to create {}", output.display()))?;

    let staging = tempfile::Builder::new()
        .prefix(".litepack-")
        .tempdir_in(output)
        .with_context(|| format!("failed to create staging directory in {}", output.display()))?;

    let dir_name = name.to_lowercase();
    let ignore = config.package.ignore_patterns();
    let copied = copy_tree(&config.package.src, &staging.path().join(&dir_name), &ignore)?;
    log!("package"; "staged {} from {}", plural_count(copied, "file"), config.package.src.display());

    let archive_name = format!("{name}_{version}.tgz");
    exec!(staging.path(); "tar"; "-czf", &archive_name, &dir_name)?;
    let staged_archive = staging.path().join(&archive_name);

    let archive = output.join(&archive_name);
    fs::rename(&staged_archive, &archive)
        .with_context(|| format!("failed to move tarball to {}", archive.display()))?;

    log!("package"; "{}", archive.display());
    Ok(archive)
}

/// Recursively copy `src` into `dest`, skipping entries whose file name
/// matches any ignore pattern. Returns the number of files copied.
fn copy_tree(src: &Path, dest: &Path, ignore: &[FilePattern]) -> Result<usize> {
    fs::create_dir_all(dest).with_context(|| format!("failed to create {}", dest.display()))?;

    let mut entries = fs::read_dir(src)
        .with_context(|| format!("failed to read {}", src.display()))?
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    let mut copied = 0;
    for entry in entries {
        if is_shutdown() {
            return Err(BuildError::Cancelled.into());
        }

        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();
        if ignore.iter().any(|p| p.matches(&name)) {
            continue;
        }

        let from = entry.path();
        let to = dest.join(&file_name);
        // Follow symlinks like a plain copy would
        let meta = fs::metadata(&from).with_context(|| format!("failed to stat {}", from.display()))?;
        if meta.is_dir() {
            copied += copy_tree(&from, &to, ignore)?;
        } else if meta.is_file() {
            fs::copy(&from, &to)
                .with_context(|| format!("failed to copy {}", from.display()))?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    fn source_tree(root: &Path) -> PathBuf {
        let src = root.join("src");
        fs::create_dir_all(src.join("lib")).unwrap();
        fs::create_dir_all(src.join("_scratch")).unwrap();
        fs::write(src.join("JSLITE.js"), "core").unwrap();
        fs::write(src.join("api.js"), "ignored").unwrap();
        fs::write(src.join("lib/JSLITE.dom.js"), "dom").unwrap();
        fs::write(src.join("lib/all.js"), "ignored").unwrap();
        fs::write(src.join("_scratch/notes.txt"), "ignored").unwrap();
        src
    }

    fn patterns(list: &[&str]) -> Vec<FilePattern> {
        list.iter().map(|p| FilePattern::new(p).unwrap()).collect()
    }

    #[test]
    fn test_copy_tree_skips_ignored_at_every_level() {
        let dir = tempfile::tempdir().unwrap();
        let src = source_tree(dir.path());
        let dest = dir.path().join("out/jslite");

        let copied = copy_tree(&src, &dest, &patterns(&["a*", "_*"])).unwrap();

        assert_eq!(copied, 2);
        assert!(dest.join("JSLITE.js").is_file());
        assert!(dest.join("lib/JSLITE.dom.js").is_file());
        assert!(!dest.join("api.js").exists());
        assert!(!dest.join("lib/all.js").exists());
        assert!(!dest.join("_scratch").exists());
    }

    #[test]
    fn test_copy_tree_no_patterns() {
        let dir = tempfile::tempdir().unwrap();
        let src = source_tree(dir.path());
        let copied = copy_tree(&src, &dir.path().join("all"), &[]).unwrap();
        assert_eq!(copied, 5);
    }

    #[test]
    fn test_copy_tree_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let result = copy_tree(&dir.path().join("missing"), &dir.path().join("out"), &[]);
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_package_creates_tarball() {
        let dir = tempfile::tempdir().unwrap();
        let src = source_tree(dir.path());

        let mut config = test_parse_config("[product]\nname = \"JSLITE\"\nversion = \"1.2.0\"");
        config.package.src = src;
        config.build.output = dir.path().join("dist");

        let archive = package(&config).unwrap();
        assert_eq!(archive, dir.path().join("dist/JSLITE_1.2.0.tgz"));
        assert!(archive.is_file());

        let listing = exec!("tar"; "-tzf", &archive).unwrap();
        let listing = String::from_utf8_lossy(&listing.stdout);
        assert!(listing.contains("jslite/JSLITE.js"));
        assert!(listing.contains("jslite/lib/JSLITE.dom.js"));
        assert!(!listing.contains("api.js"));
        assert!(!listing.contains("_scratch"));

        // Only the tarball is left in the output directory
        let left: Vec<_> = fs::read_dir(dir.path().join("dist"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(left, vec![std::ffi::OsString::from("JSLITE_1.2.0.tgz")]);
    }
}
