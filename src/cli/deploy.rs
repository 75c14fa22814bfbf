//! Copy built files to the remote host.
//!
//! Runs `scp -P <port> <file> <user>@<host>:<path>` once per file. stdin is
//! closed, so key-based authentication is required.

use std::path::Path;

use anyhow::{Context, Result};

use crate::{config::DeployConfig, config::FieldPath, log, utils::exec::Cmd};

/// Copy each file in order; stops at the first failure.
pub fn push_files<P: AsRef<Path>>(deploy: &DeployConfig, files: &[P]) -> Result<()> {
    let remote = remote(deploy)?;
    for file in files {
        let file = file.as_ref();
        scp_command(deploy.port, file, &remote)
            .run()
            .with_context(|| format!("failed to copy {} to {}", file.display(), remote))?;
        log!("deploy"; "{} -> {}", file.display(), remote);
    }
    Ok(())
}

fn remote(deploy: &DeployConfig) -> Result<String> {
    deploy.remote().with_context(|| {
        format!(
            "{} and {} must be set to deploy",
            FieldPath::new("deploy.host"),
            FieldPath::new("deploy.user")
        )
    })
}

fn scp_command(port: u16, file: &Path, remote: &str) -> Cmd {
    let port = port.to_string();
    Cmd::new("scp")
        .args(["-P", port.as_str()])
        .arg(file)
        .arg(remote)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_requires_host() {
        let deploy = DeployConfig {
            user: Some("me".into()),
            ..DeployConfig::default()
        };
        let err = push_files(&deploy, &["a.min.js"]).unwrap_err();
        assert!(err.to_string().contains("deploy.host"));
    }

    #[test]
    fn test_no_files_is_noop() {
        let deploy = DeployConfig {
            host: Some("example.com".into()),
            user: Some("me".into()),
            ..DeployConfig::default()
        };
        let files: [&Path; 0] = [];
        assert!(push_files(&deploy, &files).is_ok());
    }

    #[test]
    fn test_scp_arguments() {
        let cmd = scp_command(2222, Path::new("/build/LIB_1.0.min.js"), "me@example.com:~");
        assert_eq!(
            cmd.argv(),
            ["scp", "-P", "2222", "/build/LIB_1.0.min.js", "me@example.com:~"]
                .map(std::ffi::OsStr::new)
        );
    }
}
