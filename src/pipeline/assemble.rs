//! Artifact assembly and atomic publication.
//!
//! Fragments are concatenated in memory behind an optional header and written
//! once: to a temp file in the destination directory, fsynced, then renamed
//! over the destination. A failed write removes the temp file and leaves any
//! previous artifact untouched.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tempfile::NamedTempFile;

use super::BuildError;
use crate::utils::hash::ContentHash;
use crate::utils::path::normalize_path;

/// Per-destination locks so two builds in one process never publish the
/// same artifact path concurrently.
static OUTPUT_LOCKS: LazyLock<Mutex<FxHashMap<PathBuf, Arc<Mutex<()>>>>> =
    LazyLock::new(|| Mutex::new(FxHashMap::default()));

fn output_lock(path: &Path) -> Arc<Mutex<()>> {
    let mut locks = OUTPUT_LOCKS.lock();
    Arc::clone(locks.entry(path.to_path_buf()).or_default())
}

/// A published artifact.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub bytes: usize,
    pub fragments: usize,
    pub digest: ContentHash,
}

/// In-memory artifact buffer.
#[derive(Debug, Default)]
pub struct Assembler {
    buffer: String,
    fragments: usize,
}

impl Assembler {
    /// Start a buffer, optionally beginning with `header`.
    pub fn new(header: Option<&str>) -> Self {
        Self {
            buffer: header.map(str::to_owned).unwrap_or_default(),
            fragments: 0,
        }
    }

    /// Append one fragment. No separator is inserted.
    pub fn push(&mut self, fragment: &str) {
        self.buffer.push_str(fragment);
        self.fragments += 1;
    }

    pub fn extend<I, S>(&mut self, fragments: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for fragment in fragments {
            self.push(fragment.as_ref());
        }
    }

    #[cfg(test)]
    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Publish the buffer at `dest`, creating parent directories.
    pub fn write(self, dest: &Path) -> Result<Artifact, BuildError> {
        self.write_with(dest, |file, bytes| file.write_all(bytes))
    }

    /// Publish through a custom sink; the sink writes `bytes` into the temp file.
    pub(crate) fn write_with<F>(self, dest: &Path, sink: F) -> Result<Artifact, BuildError>
    where
        F: FnOnce(&mut File, &[u8]) -> io::Result<()>,
    {
        let parent = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = dest
            .file_name()
            .ok_or_else(|| BuildError::config(format!("invalid output path `{}`", dest.display())))?;

        fs::create_dir_all(&parent).map_err(|e| BuildError::write(dest, e))?;
        let target = normalize_path(&parent).join(file_name);

        let lock = output_lock(&target);
        let _guard = lock.lock();

        let bytes = self.buffer.as_bytes();
        let mut tmp = NamedTempFile::new_in(&parent).map_err(|e| BuildError::write(dest, e))?;
        sink(tmp.as_file_mut(), bytes).map_err(|e| BuildError::write(dest, e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| BuildError::write(dest, e))?;
        tmp.persist(&target)
            .map_err(|e| BuildError::write(dest, e.error))?;

        Ok(Artifact {
            path: target,
            bytes: bytes.len(),
            fragments: self.fragments,
            digest: ContentHash::of(bytes),
        })
    }
}
