//! Artifact building.
//!
//! Build phases:
//! - **Locate** - resolve the JS minifier tool (fails before anything runs)
//! - **JS** - external minifier over the dependency-ordered JS sources
//! - **CSS** - built-in reducer over the CSS sources
//!
//! Each target runs its own [`Pipeline`]; the first failing target stops the
//! build.

use std::io::IsTerminal;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use crate::{
    config::ProjectConfig,
    core::TargetKind,
    debug, log,
    minify::{CssReducer, ExternalMinifier, Minifier, ToolError, resolve_tool},
    pipeline::{BuildError, BuildOptions, BuildReport, BuildTarget, Pipeline},
    utils::{path::FilePattern, plural_count},
};

/// Build every enabled target, JS first.
pub fn build_all(config: &ProjectConfig) -> Result<Vec<BuildReport>> {
    let start = Instant::now();
    let name = &config.product.name;
    let version = config.product.version();

    // Resolve the tool before any target runs
    let js_minifier = if config.js.enable {
        Some(locate_js_minifier(config)?)
    } else {
        None
    };

    log!("build"; "{} {} -> {}", name, version, config.output_dir().display());

    let options = build_options(config);
    let mut reports = Vec::with_capacity(2);

    if let Some(minifier) = &js_minifier {
        let target = js_target(config)?;
        reports.push(run_target(&target, minifier, options)?);
    }

    if config.css.enable {
        let target = css_target(config)?;
        reports.push(run_target(&target, &CssReducer, options)?);
    }

    let skipped: usize = reports.iter().map(|r| r.skipped.len()).sum();
    if skipped > 0 {
        log!(
            "done";
            "{} in {:.2}s, {} skipped",
            plural_count(reports.len(), "artifact"),
            start.elapsed().as_secs_f64(),
            plural_count(skipped, "file")
        );
    } else {
        log!(
            "done";
            "{} in {:.2}s",
            plural_count(reports.len(), "artifact"),
            start.elapsed().as_secs_f64()
        );
    }
    Ok(reports)
}

fn run_target(
    target: &BuildTarget,
    minifier: &dyn Minifier,
    options: BuildOptions,
) -> Result<BuildReport> {
    let report = Pipeline::new(target, minifier, options).run()?;
    let trace: Vec<String> = report.trace.iter().map(ToString::to_string).collect();
    debug!(report.kind.name(); "phases: {}", trace.join(" -> "));
    Ok(report)
}

fn build_options(config: &ProjectConfig) -> BuildOptions {
    BuildOptions {
        policy: config.build.on_failure,
        jobs: config.build.jobs,
        progress: std::io::stdout().is_terminal(),
    }
}

/// Resolve `--tool`, `[js.minifier] tool`, then `$<env>`, and check it exists.
fn locate_js_minifier(config: &ProjectConfig) -> Result<ExternalMinifier, BuildError> {
    let settings = &config.js.minifier;
    let tool = resolve_tool(
        config.tool_override.as_deref(),
        settings.tool.as_deref(),
        &settings.env,
    )
    .ok_or_else(|| ToolError::Unresolved {
        env: settings.env.clone(),
    })?;

    let tool = settings.tool_path(&tool, config.root());
    let minifier = ExternalMinifier::locate(settings.tool_spec(&tool))?;
    debug!("js"; "minifier: {}", tool.display());
    Ok(minifier)
}

fn js_target(config: &ProjectConfig) -> Result<BuildTarget, BuildError> {
    let js = &config.js;
    target(
        config,
        TargetKind::Js,
        &js.src,
        &js.pattern,
        js.dependencies.clone(),
        js.header,
    )
}

fn css_target(config: &ProjectConfig) -> Result<BuildTarget, BuildError> {
    let css = &config.css;
    target(config, TargetKind::Css, &css.src, &css.pattern, Vec::new(), css.header)
}

fn target(
    config: &ProjectConfig,
    kind: TargetKind,
    source_dir: &Path,
    pattern: &str,
    dependencies: Vec<String>,
    with_header: bool,
) -> Result<BuildTarget, BuildError> {
    let name = &config.product.name;
    let version = config.product.version();

    let pattern = FilePattern::new(pattern)
        .map_err(|e| BuildError::config(format!("invalid pattern `{pattern}`: {e}")))?;
    let header = if with_header {
        config.header.render(name, version)
    } else {
        None
    };

    Ok(BuildTarget {
        kind,
        source_dir: source_dir.to_path_buf(),
        pattern,
        dependencies,
        output: config.output_dir().join(kind.artifact_name(name, version)),
        header,
    })
}
