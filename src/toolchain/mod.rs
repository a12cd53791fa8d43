//! External tools the action hands off to after the download
//!
//! Unpacking and scanning are plain process invocations. They sit behind
//! [`ScanToolchain`] so the orchestration can be exercised without a real
//! `unzip` or scanner binary.

mod extract;
mod scanner;

use std::future::Future;
use std::path::Path;
use std::process::Output;

pub use extract::unzip_archive;
pub use scanner::run_scanner;

use crate::error::ActionError;

/// Unpack and scan collaborators
pub trait ScanToolchain {
    /// Extract `archive` into `destination`
    fn unpack(
        &self,
        archive: &Path,
        destination: &Path,
    ) -> impl Future<Output = Result<(), ActionError>>;

    /// Run the scanner binary over `workspace`, reporting to `host`
    fn scan(
        &self,
        scanner: &Path,
        workspace: &Path,
        host: Option<&str>,
    ) -> impl Future<Output = Result<(), ActionError>>;
}

/// Spawns the system `unzip` and the downloaded scanner
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessToolchain;

impl ScanToolchain for ProcessToolchain {
    async fn unpack(&self, archive: &Path, destination: &Path) -> Result<(), ActionError> {
        unzip_archive(archive, destination).await
    }

    async fn scan(
        &self,
        scanner: &Path,
        workspace: &Path,
        host: Option<&str>,
    ) -> Result<(), ActionError> {
        run_scanner(scanner, workspace, host).await
    }
}

/// stdout and stderr of a finished process, joined for error messages
pub(crate) fn captured_output(output: &Output) -> String {
    let streams: Vec<String> = [&output.stdout, &output.stderr]
        .into_iter()
        .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    if streams.is_empty() {
        format!("no output ({})", output.status)
    } else {
        streams.join(",")
    }
}
