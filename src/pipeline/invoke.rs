//! Per-file minifier invocation.
//!
//! Every file in the [`OrderedFileSet`] is minified independently. Results are
//! always kept in file-set order, also when running on a rayon pool, so the
//! assembled artifact never depends on completion order.

use serde::{Deserialize, Serialize};

use super::{BuildError, OrderedFileSet};
use crate::core::{TargetKind, is_shutdown};
use crate::logger::ProgressLine;
use crate::minify::{MinifyError, Minifier};
use crate::{debug, log};

/// What to do when one file fails to minify.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the build; no artifact is written.
    #[default]
    Abort,
    /// Leave the file out and keep going. The artifact may be incomplete.
    Skip,
}

/// Minified text for one file, or the reason it failed.
#[derive(Debug)]
pub struct MinifiedFragment {
    pub name: String,
    pub outcome: Result<String, MinifyError>,
}

/// Fragments ready for assembly, in file-set order.
#[derive(Debug, Default)]
pub struct FragmentSet {
    pub fragments: Vec<String>,
    /// Files left out under [`FailurePolicy::Skip`].
    pub skipped: Vec<String>,
}

/// Runs a [`Minifier`] over a file set.
pub struct Invoker<'a> {
    minifier: &'a dyn Minifier,
    kind: TargetKind,
    policy: FailurePolicy,
    jobs: usize,
}

impl<'a> Invoker<'a> {
    pub fn new(minifier: &'a dyn Minifier, kind: TargetKind) -> Self {
        Self {
            minifier,
            kind,
            policy: FailurePolicy::Abort,
            jobs: 1,
        }
    }

    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Worker count; `1` runs sequentially on the calling thread.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Minify every file and apply the failure policy.
    pub fn run(
        &self,
        files: &OrderedFileSet,
        progress: Option<&ProgressLine>,
    ) -> Result<FragmentSet, BuildError> {
        if self.jobs == 1 {
            self.run_sequential(files, progress)
        } else {
            self.run_parallel(files, progress)
        }
    }

    /// One file at a time; under `Abort` nothing after the first failure runs.
    fn run_sequential(
        &self,
        files: &OrderedFileSet,
        progress: Option<&ProgressLine>,
    ) -> Result<FragmentSet, BuildError> {
        let mut set = FragmentSet::default();
        for (name, path) in files.entries() {
            if is_shutdown() {
                return Err(BuildError::Cancelled);
            }
            let fragment = MinifiedFragment {
                name: name.to_string(),
                outcome: self.minifier.minify(&path),
            };
            if let Some(p) = progress {
                p.inc(self.kind.name());
            }
            self.accept(&mut set, fragment)?;
        }
        Ok(set)
    }

    /// Minify on a dedicated pool, then apply the policy in file-set order.
    fn run_parallel(
        &self,
        files: &OrderedFileSet,
        progress: Option<&ProgressLine>,
    ) -> Result<FragmentSet, BuildError> {
        use rayon::prelude::*;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| {
                BuildError::config(format!("cannot start {} minifier threads: {e}", self.jobs))
            })?;

        let entries = files.entries();
        // Indexed collect keeps input order regardless of completion order
        let fragments: Vec<MinifiedFragment> = pool.install(|| {
            entries
                .par_iter()
                .map(|(name, path)| {
                    let outcome = if is_shutdown() {
                        Err(MinifyError::Cancelled)
                    } else {
                        self.minifier.minify(path)
                    };
                    if let Some(p) = progress {
                        p.inc(self.kind.name());
                    }
                    MinifiedFragment {
                        name: name.to_string(),
                        outcome,
                    }
                })
                .collect()
        });

        let mut set = FragmentSet::default();
        for fragment in fragments {
            self.accept(&mut set, fragment)?;
        }
        Ok(set)
    }

    /// Fold one result into the set according to the policy.
    fn accept(&self, set: &mut FragmentSet, fragment: MinifiedFragment) -> Result<(), BuildError> {
        let module = self.kind.name();
        match fragment.outcome {
            Ok(text) => {
                debug!(module; "{}: {} ({} bytes)", self.minifier.name(), fragment.name, text.len());
                set.fragments.push(text);
                Ok(())
            }
            Err(MinifyError::Cancelled) => Err(BuildError::Cancelled),
            Err(source) => match self.policy {
                FailurePolicy::Abort => Err(BuildError::Invocation {
                    file: fragment.name,
                    source,
                }),
                FailurePolicy::Skip => {
                    log!("warning"; "skipping {}: {}", fragment.name, source);
                    set.skipped.push(fragment.name);
                    Ok(())
                }
            },
        }
    }
}
