//! Archive extraction through the system `unzip`

use std::path::Path;

use log::debug;

use super::captured_output;
use crate::error::ActionError;

/// Extract `archive` into `destination` with `unzip -o -q`
pub async fn unzip_archive(archive: &Path, destination: &Path) -> Result<(), ActionError> {
    let failed = |output: String| ActionError::Unpack {
        archive: archive.to_path_buf(),
        output,
    };

    let unzip = which::which("unzip").map_err(|e| failed(format!("unzip not found: {e}")))?;
    debug!(
        "Running {} {} -d {}",
        unzip.display(),
        archive.display(),
        destination.display()
    );

    let output = tokio::process::Command::new(&unzip)
        .arg("-o")
        .arg("-q")
        .arg(archive)
        .arg("-d")
        .arg(destination)
        .output()
        .await
        .map_err(|e| failed(format!("failed to run {}: {e}", unzip.display())))?;

    if !output.status.success() {
        return Err(failed(captured_output(&output)));
    }

    Ok(())
}
