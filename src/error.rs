//! Error types surfaced by a single action run
//!
//! Every failure is terminal at the orchestration level. Only transfer
//! attempts are retried, and only inside the download module.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::download::FetchError;
use crate::release::ResolveError;

/// Terminal failure of an action run
#[derive(Debug, Error)]
pub enum ActionError {
    /// Required input or environment missing or malformed
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Version specifier could not be mapped to a release
    #[error("failed to resolve release")]
    Resolution(#[from] ResolveError),

    /// Resolved release has no asset with the required file name
    #[error("could not find release artifact `{asset}` in release {tag}")]
    NotFound { asset: String, tag: String },

    /// Asset download failed after the retry budget was spent
    #[error("failed to download asset {asset_id} after {attempts} attempt(s)")]
    Transfer {
        asset_id: u64,
        attempts: u32,
        #[source]
        source: FetchError,
    },

    /// Unpack utility failed; carries its captured output
    #[error("failed to unpack {}: {output}", .archive.display())]
    Unpack { archive: PathBuf, output: String },

    /// Scanner exited abnormally; carries its captured output
    #[error("scanner failed ({status}): {output}")]
    Scan { status: String, output: String },

    /// Whole invocation exceeded the configured time limit
    #[error("action timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),
}

impl ActionError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        ActionError::Configuration(message.into())
    }
}
