//! Scanner invocation

use std::path::Path;

use log::{debug, info};

use super::captured_output;
use crate::error::ActionError;

/// Run `scanner -i <workspace> [-o <host>]`.
///
/// The binary comes out of a zip archive, so the executable bit is set
/// before spawning on unix.
pub async fn run_scanner(
    scanner: &Path,
    workspace: &Path,
    host: Option<&str>,
) -> Result<(), ActionError> {
    if !tokio::fs::try_exists(scanner).await.unwrap_or(false) {
        return Err(ActionError::Scan {
            status: "not started".to_string(),
            output: format!("scanner binary not found at {}", scanner.display()),
        });
    }

    #[cfg(unix)]
    make_executable(scanner).await?;

    let mut command = tokio::process::Command::new(scanner);
    command.arg("-i").arg(workspace);
    if let Some(host) = host {
        command.arg("-o").arg(host);
    }
    debug!("Running {command:?}");

    let output = command.output().await.map_err(|e| ActionError::Scan {
        status: "not started".to_string(),
        output: format!("failed to run {}: {e}", scanner.display()),
    })?;

    if !output.status.success() {
        return Err(ActionError::Scan {
            status: output.status.to_string(),
            output: captured_output(&output),
        });
    }

    for line in String::from_utf8_lossy(&output.stdout).lines() {
        info!("{line}");
    }
    Ok(())
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> Result<(), ActionError> {
    use std::os::unix::fs::PermissionsExt;

    let failed = |e: std::io::Error| ActionError::Scan {
        status: "not started".to_string(),
        output: format!("failed to mark {} executable: {e}", path.display()),
    };

    let mut perms = tokio::fs::metadata(path).await.map_err(failed)?.permissions();
    perms.set_mode(0o755);
    tokio::fs::set_permissions(path, perms).await.map_err(failed)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("micromap");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        path
    }

    #[tokio::test]
    async fn passes_workspace_and_host() {
        let dir = tempfile::tempdir().unwrap();
        let args_file = dir.path().join("args.txt");
        let scanner = script(
            dir.path(),
            &format!("echo \"$@\" > '{}'", args_file.display()),
        );

        run_scanner(&scanner, Path::new("/work/repo"), Some("scan.example.com"))
            .await
            .unwrap();

        let args = std::fs::read_to_string(&args_file).unwrap();
        assert_eq!(args.trim(), "-i /work/repo -o scan.example.com");
    }

    #[tokio::test]
    async fn omits_host_flag_without_host() {
        let dir = tempfile::tempdir().unwrap();
        let args_file = dir.path().join("args.txt");
        let scanner = script(
            dir.path(),
            &format!("echo \"$@\" > '{}'", args_file.display()),
        );

        run_scanner(&scanner, Path::new("/work/repo"), None)
            .await
            .unwrap();

        let args = std::fs::read_to_string(&args_file).unwrap();
        assert_eq!(args.trim(), "-i /work/repo");
    }

    #[tokio::test]
    async fn non_zero_exit_carries_output() {
        let dir = tempfile::tempdir().unwrap();
        let scanner = script(dir.path(), "echo 'upload rejected' >&2\nexit 3");

        let err = run_scanner(&scanner, dir.path(), None).await.unwrap_err();
        match err {
            ActionError::Scan { status, output } => {
                assert!(status.contains('3'), "{status}");
                assert_eq!(output, "upload rejected");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_binary_is_scan_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_scanner(&dir.path().join("micromap"), dir.path(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Scan { .. }));
    }
}
