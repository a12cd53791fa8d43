//! End-to-end run: resolve, locate, download, unpack, scan
//!
//! One pass, no retries at this level. The first failing step aborts the
//! rest and its error is the run's outcome.

use std::path::PathBuf;
use std::time::Duration;

use log::{info, warn};

use crate::config::ActionConfig;
use crate::download::AssetFetcher;
use crate::error::ActionError;
use crate::release::{Release, ReleaseClient, locate_assets};
use crate::toolchain::{ProcessToolchain, ScanToolchain};

/// What a successful run resolved and downloaded
#[derive(Debug, Clone)]
pub struct RunReport {
    pub release: Release,
    pub archive: PathBuf,
}

/// Drives a single action run against one configuration
pub struct Orchestrator<T = ProcessToolchain> {
    config: ActionConfig,
    client: ReleaseClient,
    toolchain: T,
}

impl Orchestrator<ProcessToolchain> {
    /// Orchestrator that shells out to `unzip` and the scanner
    pub fn new(config: ActionConfig) -> Result<Self, ActionError> {
        Self::with_toolchain(config, ProcessToolchain)
    }
}

impl<T: ScanToolchain> Orchestrator<T> {
    pub fn with_toolchain(config: ActionConfig, toolchain: T) -> Result<Self, ActionError> {
        let client = ReleaseClient::new(
            config.api_url.clone(),
            &config.settings.source,
            &config.settings.http,
            config.token.clone(),
        )
        .map_err(|e| ActionError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            client,
            toolchain,
        })
    }

    /// Run every step, bounded by `timeout_secs` when configured
    pub async fn run(&self) -> Result<RunReport, ActionError> {
        match self.config.settings.timeout_secs {
            Some(secs) => {
                let limit = Duration::from_secs(secs);
                tokio::time::timeout(limit, self.run_steps())
                    .await
                    .map_err(|_| ActionError::Timeout(limit))?
            }
            None => self.run_steps().await,
        }
    }

    async fn run_steps(&self) -> Result<RunReport, ActionError> {
        let source = &self.config.settings.source;

        let release = self.client.resolve(&self.config.version).await?;
        info!("Found release: {}", release.tag_name);

        let assets = locate_assets(&release, &source.asset);
        if assets.is_empty() {
            return Err(ActionError::NotFound {
                asset: source.asset.clone(),
                tag: release.tag_name.clone(),
            });
        }
        if assets.len() > 1 {
            warn!(
                "Release {} has {} assets named {}; each download replaces {}",
                release.tag_name,
                assets.len(),
                source.asset,
                source.archive_path.display()
            );
        }

        info!("Fetching API scanner...");
        let fetcher = AssetFetcher::new(&self.client, &self.config.settings.retry);
        let archive = source.archive_path.clone();
        for asset in &assets {
            fetcher.fetch(asset.id, &archive).await?;
        }

        // Removed again when the run ends, whatever the outcome
        let unpack_dir = tempfile::Builder::new()
            .prefix(source.scanner.as_str())
            .tempdir()
            .map_err(|e| ActionError::Unpack {
                archive: archive.clone(),
                output: format!("failed to create unpack directory: {e}"),
            })?;

        info!("Unpacking scanner...");
        self.toolchain.unpack(&archive, unpack_dir.path()).await?;

        info!("Scanning repository...");
        let scanner = unpack_dir
            .path()
            .join(format!("{}{}", source.scanner, std::env::consts::EXE_SUFFIX));
        self.toolchain
            .scan(&scanner, &self.config.workspace, self.config.host.as_deref())
            .await?;

        Ok(RunReport { release, archive })
    }
}
