//! Release asset download with retry and atomic persistence

use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use thiserror::Error;

use super::retry::{RetryPolicy, retry_async};
use crate::error::ActionError;
use crate::release::ReleaseClient;

const OCTET_STREAM: &str = "application/octet-stream";

/// Failure of a single download attempt
#[derive(Debug, Error)]
pub enum FetchError {
    /// Body was logged as a warning when the attempt failed
    #[error("asset endpoint returned HTTP {0}")]
    Status(StatusCode),

    #[error("asset request failed")]
    Request(#[from] reqwest::Error),

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Downloads release assets through a [`ReleaseClient`]
pub struct AssetFetcher<'a> {
    client: &'a ReleaseClient,
    policy: &'a RetryPolicy,
}

impl<'a> AssetFetcher<'a> {
    pub fn new(client: &'a ReleaseClient, policy: &'a RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Download asset `asset_id` to `destination`, retrying per policy.
    ///
    /// On success the destination holds the complete body. A failed run
    /// never leaves partial content there: bytes are staged in a temporary
    /// file next to it and renamed into place.
    pub async fn fetch(&self, asset_id: u64, destination: &Path) -> Result<PathBuf, ActionError> {
        let what = format!("download of asset {asset_id}");

        retry_async(self.policy, &what, move |_| self.fetch_once(asset_id, destination))
            .await
            .map_err(|source| ActionError::Transfer {
                asset_id,
                attempts: self.policy.max_attempts.max(1),
                source,
            })
    }

    async fn fetch_once(&self, asset_id: u64, destination: &Path) -> Result<PathBuf, FetchError> {
        let url = self
            .client
            .releases_endpoint(&["assets", asset_id.to_string().as_str()]);
        debug!("GET {url}");

        let response = self.client.get(url).header(ACCEPT, OCTET_STREAM).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{body}");
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        write_atomically(destination, body).await?;

        info!("Downloaded asset {asset_id} to {}", destination.display());
        Ok(destination.to_path_buf())
    }
}

/// Write `contents` to `destination` via a sibling temp file and rename.
///
/// Creates the parent directory when missing and replaces any existing
/// file at `destination`.
pub async fn write_atomically<B>(destination: &Path, contents: B) -> Result<(), FetchError>
where
    B: AsRef<[u8]> + Send + 'static,
{
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    tokio::fs::create_dir_all(&parent)
        .await
        .map_err(|source| FetchError::Write {
            path: parent.clone(),
            source,
        })?;

    let target = destination.to_path_buf();

    // tempfile is synchronous; keep it off the async workers
    let result = tokio::task::spawn_blocking(move || -> std::io::Result<()> {
        let mut staged = tempfile::Builder::new()
            .prefix(".devpal-")
            .suffix(".part")
            .tempfile_in(&parent)?;
        staged.write_all(contents.as_ref())?;
        staged.as_file().sync_all()?;
        staged.persist(&target).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .unwrap_or_else(|join_err| Err(std::io::Error::other(join_err)));

    result.map_err(|source| FetchError::Write {
        path: destination.to_path_buf(),
        source,
    })
}
