//! End-to-end pipeline runs against fake minifiers.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::core::IllegalTransition;
use crate::minify::{CssReducer, MinifyError};

/// Uppercases each file; counts calls.
#[derive(Default)]
struct Upper {
    calls: AtomicUsize,
}

impl Minifier for Upper {
    fn name(&self) -> &str {
        "upper"
    }

    fn minify(&self, path: &Path) -> Result<String, MinifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        fs::read_to_string(path)
            .map(|s| s.to_uppercase())
            .map_err(MinifyError::Read)
    }
}

/// Fails on every file.
struct Broken;

impl Minifier for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn minify(&self, _path: &Path) -> Result<String, MinifyError> {
        Err(MinifyError::Failed("exit status: 2".into()))
    }
}

/// Reports an interrupt on every file.
struct Interrupted;

impl Minifier for Interrupted {
    fn name(&self) -> &str {
        "interrupted"
    }

    fn minify(&self, _path: &Path) -> Result<String, MinifyError> {
        Err(MinifyError::Cancelled)
    }
}

fn write_sources(dir: &Path, files: &[(&str, &str)]) {
    fs::create_dir_all(dir).unwrap();
    for (name, body) in files {
        fs::write(dir.join(name), body).unwrap();
    }
}

fn js_target(root: &Path, dependencies: &[&str], header: Option<&str>) -> BuildTarget {
    BuildTarget {
        kind: TargetKind::Js,
        source_dir: root.join("src"),
        pattern: FilePattern::new("*.js").unwrap(),
        dependencies: dependencies.iter().map(|s| s.to_string()).collect(),
        output: root.join("build").join(TargetKind::Js.artifact_name("LIB", "1.0")),
        header: header.map(str::to_owned),
    }
}

#[test]
fn test_prefix_then_sorted_remainder() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(
        &dir.path().join("src"),
        &[("a.js", "a();"), ("b.js", "b();"), ("c.js", "c();")],
    );
    let target = js_target(dir.path(), &["b.js"], Some("/* LIB 1.0 */\n"));
    let upper = Upper::default();

    let mut pipeline = Pipeline::new(&target, &upper, BuildOptions::default());
    let report = pipeline.run().unwrap();

    assert_eq!(
        fs::read_to_string(&target.output).unwrap(),
        "/* LIB 1.0 */\nB();A();C();"
    );
    assert_eq!(report.kind, TargetKind::Js);
    assert_eq!(report.artifact.fragments, 3);
    assert!(report.skipped.is_empty());
    assert_eq!(
        report.trace,
        vec![
            Phase::Idle,
            Phase::Resolving,
            Phase::Invoking,
            Phase::Assembling,
            Phase::Done
        ]
    );
    assert_eq!(pipeline.phase(), Phase::Done);
}

#[test]
fn test_parallel_matches_sequential() {
    let dir = tempfile::tempdir().unwrap();
    let files: Vec<(String, String)> = (0..20)
        .map(|i| (format!("m{i:02}.js"), format!("m{i};")))
        .collect();
    let refs: Vec<(&str, &str)> = files.iter().map(|(n, b)| (n.as_str(), b.as_str())).collect();
    write_sources(&dir.path().join("src"), &refs);
    let target = js_target(dir.path(), &["m10.js"], None);
    let upper = Upper::default();

    let options = BuildOptions {
        jobs: 4,
        ..BuildOptions::default()
    };
    Pipeline::new(&target, &upper, options).run().unwrap();
    let parallel = fs::read_to_string(&target.output).unwrap();

    Pipeline::new(&target, &upper, BuildOptions::default())
        .run()
        .unwrap();
    let sequential = fs::read_to_string(&target.output).unwrap();

    assert_eq!(parallel, sequential);
    assert!(parallel.starts_with("M10;M0;M1;"));
}

#[test]
fn test_only_prefix_files_aborts() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(&dir.path().join("src"), &[("b.js", "b();")]);
    let target = js_target(dir.path(), &["b.js"], None);
    let upper = Upper::default();

    let mut pipeline = Pipeline::new(&target, &upper, BuildOptions::default());
    let err = pipeline.run().unwrap_err();

    assert!(matches!(err, BuildError::Configuration(_)));
    assert_eq!(pipeline.phase(), Phase::Aborted);
    assert_eq!(pipeline.trace(), &[Phase::Idle, Phase::Resolving, Phase::Aborted]);
    assert_eq!(upper.calls.load(Ordering::SeqCst), 0);
    assert!(!target.output.exists());
}

#[test]
fn test_invocation_failure_keeps_prior_artifact() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(&dir.path().join("src"), &[("a.js", "a();")]);
    let target = js_target(dir.path(), &[], None);
    fs::create_dir_all(target.output.parent().unwrap()).unwrap();
    fs::write(&target.output, "previous release").unwrap();

    let mut pipeline = Pipeline::new(&target, &Broken, BuildOptions::default());
    let err = pipeline.run().unwrap_err();

    assert!(matches!(err, BuildError::Invocation { ref file, .. } if file == "a.js"));
    assert_eq!(pipeline.trace().last(), Some(&Phase::Aborted));
    assert!(!pipeline.trace().contains(&Phase::Assembling));
    assert_eq!(fs::read_to_string(&target.output).unwrap(), "previous release");
}

#[test]
fn test_skip_policy_writes_partial_artifact() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(&dir.path().join("src"), &[("a.js", "a();"), ("b.js", "b();")]);
    let target = js_target(dir.path(), &[], Some("// h\n"));

    let options = BuildOptions {
        policy: FailurePolicy::Skip,
        ..BuildOptions::default()
    };
    let report = Pipeline::new(&target, &Broken, options).run().unwrap();

    assert_eq!(report.skipped, vec!["a.js", "b.js"]);
    assert_eq!(report.artifact.fragments, 0);
    assert_eq!(fs::read_to_string(&target.output).unwrap(), "// h\n");
}

#[test]
fn test_missing_source_dir_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let target = js_target(dir.path(), &[], None);

    let upper = Upper::default();
    let mut pipeline = Pipeline::new(&target, &upper, BuildOptions::default());
    let err = pipeline.run().unwrap_err();
    assert!(err.to_string().contains("not found"));
    assert_eq!(pipeline.phase(), Phase::Aborted);
}

#[test]
fn test_unwritable_output_aborts() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(&dir.path().join("src"), &[("a.js", "a();")]);
    // A regular file where the output directory should be
    fs::write(dir.path().join("build"), "").unwrap();
    let target = js_target(dir.path(), &[], None);

    let upper = Upper::default();
    let mut pipeline = Pipeline::new(&target, &upper, BuildOptions::default());
    let err = pipeline.run().unwrap_err();
    assert!(matches!(err, BuildError::Write { .. }));
    assert_eq!(
        pipeline.trace(),
        &[
            Phase::Idle,
            Phase::Resolving,
            Phase::Invoking,
            Phase::Assembling,
            Phase::Aborted
        ]
    );
}

#[test]
fn test_css_target_with_reducer() {
    let dir = tempfile::tempdir().unwrap();
    let css_dir = dir.path().join("css");
    write_sources(
        &css_dir,
        &[
            ("base.css", "/* reset */\na {  color : red ;  }\n"),
            ("theme.css", "b { color: blue; }"),
            ("notes.txt", "ignored"),
        ],
    );
    let header = render_header(DEFAULT_TEMPLATE, "LIB", "1.0", &[]);
    let target = BuildTarget {
        kind: TargetKind::Css,
        source_dir: css_dir,
        pattern: FilePattern::new("*.css").unwrap(),
        dependencies: Vec::new(),
        output: dir.path().join("build/LIB_CSS_1.0.min.js"),
        header: Some(header.clone()),
    };

    let report = Pipeline::new(&target, &CssReducer, BuildOptions::default())
        .run()
        .unwrap();

    let written = fs::read_to_string(&target.output).unwrap();
    assert_eq!(written, format!("{header}a{{color:red;}}b{{color:blue;}}"));
    assert_eq!(report.artifact.bytes, written.len());
}

#[test]
fn test_interrupt_aborts_even_when_skipping() {
    for jobs in [1, 3] {
        let dir = tempfile::tempdir().unwrap();
        write_sources(
            &dir.path().join("src"),
            &[("a.js", "a();"), ("b.js", "b();"), ("c.js", "c();")],
        );
        let target = js_target(dir.path(), &[], Some("// h\n"));

        let options = BuildOptions {
            policy: FailurePolicy::Skip,
            jobs,
            ..BuildOptions::default()
        };
        let mut pipeline = Pipeline::new(&target, &Interrupted, options);
        let err = pipeline.run().unwrap_err();

        assert!(matches!(err, BuildError::Cancelled), "jobs = {jobs}");
        assert_eq!(pipeline.phase(), Phase::Aborted);
        assert!(!pipeline.trace().contains(&Phase::Assembling));
        assert!(!target.output.exists());
        assert!(!dir.path().join("build").exists());
    }
}

#[test]
fn test_second_run_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(&dir.path().join("src"), &[("a.js", "a();")]);
    let target = js_target(dir.path(), &[], None);
    let upper = Upper::default();

    let mut pipeline = Pipeline::new(&target, &upper, BuildOptions::default());
    pipeline.run().unwrap();
    let trace = pipeline.trace().to_vec();

    let err = pipeline.run().unwrap_err();
    assert!(matches!(
        err,
        BuildError::Transition(IllegalTransition {
            from: Phase::Done,
            to: Phase::Resolving
        })
    ));
    assert_eq!(pipeline.trace(), trace.as_slice());
    assert_eq!(upper.calls.load(Ordering::SeqCst), 1);
    assert_eq!(fs::read_to_string(&target.output).unwrap(), "A();");
}
