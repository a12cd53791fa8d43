#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use devpal_action::config::{HttpSettings, SourceSettings, Token};
use devpal_action::download::RetryPolicy;
use devpal_action::release::ReleaseClient;
use devpal_action::toolchain::ScanToolchain;
use devpal_action::{ActionConfig, ActionError, Inputs, Settings};
use serde_json::{Value, json};
use url::Url;
use wiremock::MockServer;

pub const TOKEN: &str = "secret-token";
pub const RELEASES: &str = "/repos/topsify-io/devpal/releases";

/// Millisecond backoff so retry tests stay fast
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 5,
        min_delay_ms: 1,
        max_delay_ms: 5,
        factor: 2.0,
        randomize: false,
    }
}

pub fn client_for(server: &MockServer) -> ReleaseClient {
    ReleaseClient::new(
        Url::parse(&server.uri()).unwrap(),
        &SourceSettings::default(),
        &HttpSettings::default(),
        Token::new(TOKEN),
    )
    .unwrap()
}

pub fn inputs_for(server: &MockServer, version: &str, workspace: &Path) -> Inputs {
    Inputs {
        token: Some(TOKEN.to_string()),
        version: Some(version.to_string()),
        host: Some("scan.example.com".to_string()),
        workspace: Some(workspace.to_path_buf()),
        api_url: Some(server.uri()),
        output_file: None,
    }
}

pub fn config_for(server: &MockServer, version: &str, scratch: &Path) -> ActionConfig {
    let mut settings = Settings::default();
    settings.source.archive_path = scratch.join("download/micromap.zip");
    settings.retry = fast_retry();

    ActionConfig::from_inputs(
        inputs_for(server, version, &scratch.join("workspace")),
        settings,
    )
    .unwrap()
}

/// Release payload shaped like the GitHub API's
pub fn release_json(tag: &str, assets: &[(u64, &str)]) -> Value {
    json!({
        "id": 1001,
        "tag_name": tag,
        "name": format!("Release {tag}"),
        "body": "Scanner improvements\n\n- faster",
        "draft": false,
        "prerelease": false,
        "assets": assets
            .iter()
            .map(|(id, name)| json!({
                "id": id,
                "name": name,
                "size": 16,
                "content_type": "application/zip",
                "state": "uploaded"
            }))
            .collect::<Vec<_>>()
    })
}

/// Records collaborator calls instead of spawning processes
#[derive(Clone, Default)]
pub struct RecordingToolchain {
    pub calls: Arc<Mutex<Vec<String>>>,
    /// Archive bytes as seen at unpack time
    pub unpacked: Arc<Mutex<Option<Vec<u8>>>>,
    pub fail_scan: bool,
}

impl RecordingToolchain {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ScanToolchain for RecordingToolchain {
    async fn unpack(&self, archive: &Path, destination: &Path) -> Result<(), ActionError> {
        assert!(destination.is_dir(), "unpack target should exist");
        *self.unpacked.lock().unwrap() = std::fs::read(archive).ok();
        self.calls
            .lock()
            .unwrap()
            .push(format!("unpack {}", file_name(archive)));
        Ok(())
    }

    async fn scan(
        &self,
        scanner: &Path,
        workspace: &Path,
        host: Option<&str>,
    ) -> Result<(), ActionError> {
        self.calls.lock().unwrap().push(format!(
            "scan {} -i {} -o {}",
            file_name(scanner),
            file_name(workspace),
            host.unwrap_or("-")
        ));
        if self.fail_scan {
            return Err(ActionError::Scan {
                status: "exit status: 2".to_string(),
                output: "upload rejected".to_string(),
            });
        }
        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn asset_path(id: u64) -> String {
    format!("{RELEASES}/assets/{id}")
}
