//! Build pipeline for one target.
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌────────────┐
//! │ Resolving│──▶│ Invoking │──▶│ Assembling │──▶ Done
//! └──────────┘   └──────────┘   └────────────┘
//!       │              │               │
//!       └──────────────┴───────────────┴──────▶ Aborted
//! ```
//!
//! - `resolve`: dependency prefix + sorted directory scan
//! - `invoke`: per-file minification, ordered, optional rayon pool
//! - `assemble`: header + fragments, single atomic write
//!
//! A failure in any phase aborts the target. Nothing is written unless every
//! fragment is ready (or skipped under [`FailurePolicy::Skip`]).

mod assemble;
mod error;
mod header;
mod invoke;
mod resolve;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

pub use assemble::{Artifact, Assembler};
pub use error::BuildError;
pub use header::{DEFAULT_TEMPLATE, render_header};
pub use invoke::{FailurePolicy, Invoker};
pub use resolve::{OrderedFileSet, resolve_files};

use crate::core::{Phase, PhaseTracker, TargetKind, is_shutdown};
use crate::logger::ProgressLine;
use crate::minify::Minifier;
use crate::utils::path::FilePattern;
use crate::utils::plural_count;
use crate::{debug, log};

// =============================================================================
// Types
// =============================================================================

/// Everything the pipeline needs to know about one artifact.
#[derive(Debug, Clone)]
pub struct BuildTarget {
    pub kind: TargetKind,
    pub source_dir: PathBuf,
    pub pattern: FilePattern,
    /// File names that must come first, in this order.
    pub dependencies: Vec<String>,
    /// Full artifact path.
    pub output: PathBuf,
    /// Rendered header, if any.
    pub header: Option<String>,
}

/// Run-time knobs shared by all targets.
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    pub policy: FailurePolicy,
    pub jobs: usize,
    /// Draw a progress line while minifying.
    pub progress: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            policy: FailurePolicy::Abort,
            jobs: 1,
            progress: false,
        }
    }
}

/// Summary of a finished target.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub kind: TargetKind,
    pub artifact: Artifact,
    pub skipped: Vec<String>,
    pub trace: Vec<Phase>,
}

// =============================================================================
// Pipeline
// =============================================================================

/// Drives one target through resolve, invoke and assemble.
pub struct Pipeline<'a> {
    target: &'a BuildTarget,
    minifier: &'a dyn Minifier,
    options: BuildOptions,
    phases: PhaseTracker,
}

impl<'a> Pipeline<'a> {
    pub fn new(target: &'a BuildTarget, minifier: &'a dyn Minifier, options: BuildOptions) -> Self {
        Self {
            target,
            minifier,
            options,
            phases: PhaseTracker::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phases.current()
    }

    #[cfg(test)]
    pub fn trace(&self) -> &[Phase] {
        self.phases.trace()
    }

    /// Run to `Done` or `Aborted`.
    ///
    /// A pipeline runs once; later calls fail with [`BuildError::Transition`]
    /// and leave the recorded trace as it was.
    pub fn run(&mut self) -> Result<BuildReport, BuildError> {
        match self.drive() {
            Ok(report) => Ok(report),
            Err(e) => {
                let phase = self.phase();
                self.phases.abort();
                log!("abort"; "{} while {}: {}", self.target.kind, phase, e);
                Err(e)
            }
        }
    }

    fn drive(&mut self) -> Result<BuildReport, BuildError> {
        let kind = self.target.kind;
        let module = kind.name();

        // Resolving
        self.phases.enter(Phase::Resolving)?;
        let files = resolve_files(
            &self.target.source_dir,
            &self.target.pattern,
            &self.target.dependencies,
        )?;
        debug!(
            module;
            "resolved {} in {} ({} from dependencies)",
            plural_count(files.len(), "file"),
            files.dir().display(),
            files.prefix_len()
        );

        // Invoking
        self.phases.enter(Phase::Invoking)?;
        let invoker = Invoker::new(self.minifier, kind)
            .policy(self.options.policy)
            .jobs(self.options.jobs);
        let fragments = if self.options.progress {
            let progress = ProgressLine::new(&[(module, files.len())]);
            let result = invoker.run(&files, Some(&progress));
            if result.is_ok() {
                progress.finish();
            }
            result?
        } else {
            invoker.run(&files, None)?
        };
        if is_shutdown() {
            return Err(BuildError::Cancelled);
        }

        // Assembling
        self.phases.enter(Phase::Assembling)?;
        let mut assembler = Assembler::new(self.target.header.as_deref());
        assembler.extend(&fragments.fragments);
        let artifact = assembler.write(&self.target.output)?;

        self.phases.enter(Phase::Done)?;
        log!(
            module;
            "{} ({} bytes, {}, blake3 {})",
            artifact.path.display(),
            artifact.bytes,
            plural_count(artifact.fragments, "fragment"),
            artifact.digest
        );
        if !fragments.skipped.is_empty() {
            log!("warning"; "{} incomplete, {} skipped", artifact.path.display(), plural_count(fragments.skipped.len(), "file"));
        }

        Ok(BuildReport {
            kind,
            artifact,
            skipped: fragments.skipped,
            trace: self.phases.trace().to_vec(),
        })
    }
}
