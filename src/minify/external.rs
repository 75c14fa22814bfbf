//! External minifier tool (e.g. YUI Compressor).
//!
//! Invoked once per file as `<runner...> <tool> <args...> <file>`, capturing
//! stdout as the fragment. The default runner is `java -jar`; an empty runner
//! executes the tool directly.
//!
//! # Tool resolution
//!
//! First hit wins:
//!
//! | Order | Source                         |
//! |-------|--------------------------------|
//! | 1     | `--tool` on the command line   |
//! | 2     | `[js.minifier] tool`           |
//! | 3     | `$<[js.minifier] env>`         |
//!
//! Nothing resolved is a [`ToolError::Unresolved`]; there is no prompt.
//!
//! With an empty runner a bare command name (`uglifyjs`) is looked up on
//! `PATH`; anything else is a file path that must exist.

use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use super::{MinifyError, Minifier};
use crate::utils::exec::{Cmd, ExecError, SILENT_FILTER};

/// Why the external tool cannot be used.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("no minifier tool configured (pass --tool, set [js.minifier] tool, or export ${env})")]
    Unresolved { env: String },

    #[error("minifier tool not found at `{}`", .0.display())]
    Missing(PathBuf),

    #[error("minifier command `{}` not found on PATH", .tool.display())]
    NotOnPath {
        tool: PathBuf,
        #[source]
        source: which::Error,
    },

    #[error("runner `{runner}` not found on PATH")]
    RunnerNotFound {
        runner: String,
        #[source]
        source: which::Error,
    },
}

/// Resolve the tool path through the override chain, reading the environment.
pub fn resolve_tool(
    explicit: Option<&Path>,
    configured: Option<&Path>,
    env_var: &str,
) -> Option<PathBuf> {
    let env_value = if env_var.is_empty() {
        None
    } else {
        std::env::var_os(env_var)
    };
    resolve_tool_from(explicit, configured, env_value)
}

/// Resolve the tool path with an already-read environment value.
fn resolve_tool_from(
    explicit: Option<&Path>,
    configured: Option<&Path>,
    env_value: Option<OsString>,
) -> Option<PathBuf> {
    explicit
        .or(configured)
        .map(Path::to_path_buf)
        .or_else(|| env_value.filter(|v| !v.is_empty()).map(PathBuf::from))
}

/// Whether `tool` is a bare command name rather than a path.
pub fn is_command_name(tool: &Path) -> bool {
    let mut components = tool.components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !tool.as_os_str().to_string_lossy().starts_with('~')
}

/// Everything needed to run the external tool.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Program prefix placed before the tool path (e.g. `["java", "-jar"]`).
    pub runner: Vec<String>,
    /// Resolved tool path.
    pub tool: PathBuf,
    /// Extra arguments placed between the tool and the file.
    pub args: Vec<String>,
    /// Per-file timeout.
    pub timeout: Duration,
}

/// [`Minifier`] that shells out to an external tool.
#[derive(Debug, Clone)]
pub struct ExternalMinifier {
    command: Vec<OsString>,
    timeout: Duration,
    name: String,
}

impl ExternalMinifier {
    /// Check the tool and runner exist and build the minifier.
    pub fn locate(mut spec: ToolSpec) -> Result<Self, ToolError> {
        if spec.runner.is_empty() && is_command_name(&spec.tool) {
            spec.tool = which::which(&spec.tool).map_err(|source| ToolError::NotOnPath {
                tool: spec.tool.clone(),
                source,
            })?;
        } else if !spec.tool.exists() {
            return Err(ToolError::Missing(spec.tool));
        }

        if let Some(runner) = spec.runner.first() {
            which::which(runner).map_err(|source| ToolError::RunnerNotFound {
                runner: runner.clone(),
                source,
            })?;
        }

        Ok(Self::new(spec))
    }

    /// Build without checking the filesystem.
    pub fn new(spec: ToolSpec) -> Self {
        let name = spec
            .tool
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "minifier".to_string());

        let mut command: Vec<OsString> = spec.runner.iter().map(OsString::from).collect();
        command.push(spec.tool.into_os_string());
        command.extend(spec.args.iter().map(OsString::from));

        Self {
            command,
            timeout: spec.timeout,
            name,
        }
    }

    /// Full command line used for one file.
    #[cfg(test)]
    pub fn command_for(&self, path: &Path) -> Vec<OsString> {
        let mut cmd = self.command.clone();
        cmd.push(path.as_os_str().to_owned());
        cmd
    }
}

impl Minifier for ExternalMinifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn minify(&self, path: &Path) -> Result<String, MinifyError> {
        let args: Vec<&OsStr> = self.command.iter().map(OsString::as_os_str).collect();
        let output = Cmd::from_slice(&args)
            .arg(path)
            .timeout(self.timeout)
            .filter(&SILENT_FILTER)
            .run()
            .map_err(classify)?;

        let text = String::from_utf8(output.stdout).map_err(|e| {
            MinifyError::Failed(format!("output is not valid UTF-8: {}", e.utf8_error()))
        })?;
        if text.trim().is_empty() {
            return Err(MinifyError::EmptyOutput);
        }
        Ok(text)
    }
}

/// Map an execution failure onto the per-file error kinds.
fn classify(err: anyhow::Error) -> MinifyError {
    match err.downcast_ref::<ExecError>() {
        Some(ExecError::TimedOut { timeout, .. }) => MinifyError::TimedOut(*timeout),
        Some(ExecError::Cancelled { .. }) => MinifyError::Cancelled,
        _ => MinifyError::Failed(format!("{err:#}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(runner: &[&str], tool: &str) -> ToolSpec {
        ToolSpec {
            runner: runner.iter().map(|s| s.to_string()).collect(),
            tool: PathBuf::from(tool),
            args: Vec::new(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_resolve_explicit_wins() {
        let resolved = resolve_tool_from(
            Some(Path::new("/cli.jar")),
            Some(Path::new("/config.jar")),
            Some("/env.jar".into()),
        );
        assert_eq!(resolved, Some(PathBuf::from("/cli.jar")));
    }

    #[test]
    fn test_resolve_configured_before_env() {
        let resolved =
            resolve_tool_from(None, Some(Path::new("/config.jar")), Some("/env.jar".into()));
        assert_eq!(resolved, Some(PathBuf::from("/config.jar")));
    }

    #[test]
    fn test_resolve_env_fallback() {
        let resolved = resolve_tool_from(None, None, Some("/env.jar".into()));
        assert_eq!(resolved, Some(PathBuf::from("/env.jar")));
    }

    #[test]
    fn test_resolve_nothing() {
        assert_eq!(resolve_tool_from(None, None, None), None);
        assert_eq!(resolve_tool_from(None, None, Some(OsString::new())), None);
    }

    #[test]
    fn test_locate_missing_tool() {
        let err = ExternalMinifier::locate(spec(&[], "/nonexistent/yui.jar")).unwrap_err();
        assert!(matches!(err, ToolError::Missing(_)));
    }

    #[test]
    fn test_locate_missing_runner() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("yui.jar");
        std::fs::write(&tool, "").unwrap();
        let err = ExternalMinifier::locate(spec(
            &["litepack-no-such-runner"],
            tool.to_str().unwrap(),
        ))
        .unwrap_err();
        assert!(matches!(err, ToolError::RunnerNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_locate_command_on_path() {
        let minifier = ExternalMinifier::locate(spec(&[], "cat")).unwrap();
        let program = PathBuf::from(&minifier.command_for(Path::new("a.js"))[0]);
        assert!(program.is_absolute());
        assert!(program.ends_with("cat"));
    }

    #[test]
    fn test_locate_command_not_on_path() {
        let err = ExternalMinifier::locate(spec(&[], "litepack-no-such-minifier")).unwrap_err();
        assert!(matches!(err, ToolError::NotOnPath { .. }));
    }

    #[test]
    fn test_command_name_detection() {
        assert!(is_command_name(Path::new("uglifyjs")));
        assert!(is_command_name(Path::new("yuicompressor.jar")));
        assert!(!is_command_name(Path::new("bin/uglifyjs")));
        assert!(!is_command_name(Path::new("./uglifyjs")));
        assert!(!is_command_name(Path::new("/usr/bin/uglifyjs")));
        assert!(!is_command_name(Path::new("~")));
    }

    #[test]
    fn test_command_layout() {
        let mut s = spec(&["java", "-jar"], "/opt/yui.jar");
        s.args = vec!["--charset".into(), "utf-8".into()];
        let minifier = ExternalMinifier::new(s);
        assert_eq!(minifier.name(), "yui.jar");
        assert_eq!(
            minifier.command_for(Path::new("/src/a.js")),
            vec![
                OsString::from("java"),
                "-jar".into(),
                "/opt/yui.jar".into(),
                "--charset".into(),
                "utf-8".into(),
                "/src/a.js".into(),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_minify_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.js");
        std::fs::write(&file, "var a = 1;").unwrap();

        // `cat <file>` stands in for a minifier that echoes its input
        let minifier = ExternalMinifier::new(spec(&[], "cat"));
        assert_eq!(minifier.minify(&file).unwrap(), "var a = 1;");
    }

    #[cfg(unix)]
    #[test]
    fn test_minify_empty_output_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.js");
        std::fs::write(&file, "").unwrap();

        let minifier = ExternalMinifier::new(spec(&[], "cat"));
        assert!(matches!(
            minifier.minify(&file),
            Err(MinifyError::EmptyOutput)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_minify_invalid_utf8_is_failure() {
        let minifier = ExternalMinifier::new(ToolSpec {
            runner: vec![],
            tool: PathBuf::from("sh"),
            args: vec!["-c".into(), "printf '\\377\\376'".into()],
            timeout: Duration::from_secs(5),
        });
        match minifier.minify(Path::new("a.js")) {
            Err(MinifyError::Failed(message)) => assert!(message.contains("UTF-8")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_minify_nonzero_exit_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let minifier = ExternalMinifier::new(spec(&[], "cat"));
        let err = minifier.minify(&dir.path().join("missing.js")).unwrap_err();
        assert!(matches!(err, MinifyError::Failed(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_minify_timeout() {
        let minifier = ExternalMinifier::new(ToolSpec {
            runner: vec![],
            tool: PathBuf::from("sleep"),
            args: vec!["5".into()],
            timeout: Duration::from_millis(100),
        });
        // `sleep 5 <file>` never finishes in time
        let err = minifier.minify(Path::new("1")).unwrap_err();
        assert!(matches!(err, MinifyError::TimedOut(_)));
    }
}
