//! Run configuration
//!
//! Inputs arrive from the CLI layer (flags or `INPUT_*` variables); the
//! release source, retry policy and timeouts come from an optional TOML
//! settings file. Both are folded into one [`ActionConfig`] that the
//! orchestrator receives at construction, so nothing below this point reads
//! the process environment.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::download::RetryPolicy;
use crate::error::ActionError;
use crate::release::VersionSpecifier;

/// Public GitHub API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// API credential; never printed
#[derive(Clone)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Where the scanner is published and how it is laid out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub owner: String,
    pub repo: String,
    /// Release asset file name
    pub asset: String,
    /// Executable name inside the unpacked asset
    pub scanner: String,
    /// Local path the asset is downloaded to
    pub archive_path: PathBuf,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            owner: "topsify-io".to_string(),
            repo: "devpal".to_string(),
            asset: "micromap.zip".to_string(),
            scanner: "micromap".to_string(),
            archive_path: PathBuf::from("micromap.zip"),
        }
    }
}

/// HTTP client timeouts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub connect_timeout_secs: u64,
    /// Per request, covers the whole body download
    pub request_timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            request_timeout_secs: 300,
        }
    }
}

/// Contents of the optional settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub source: SourceSettings,
    pub retry: RetryPolicy,
    pub http: HttpSettings,
    /// Overall limit for one run; unlimited when absent
    pub timeout_secs: Option<u64>,
}

impl Settings {
    pub fn from_toml_str(raw: &str) -> Result<Self, ActionError> {
        toml::from_str(raw).map_err(|e| ActionError::config(format!("invalid settings: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self, ActionError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ActionError::config(format!("failed to read settings {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }
}

/// Raw inputs as handed over by the CLI layer
///
/// Empty strings count as "not supplied", matching how the Actions runner
/// passes unset `with:` inputs.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub token: Option<String>,
    pub version: Option<String>,
    pub host: Option<String>,
    pub workspace: Option<PathBuf>,
    pub api_url: Option<String>,
    pub output_file: Option<PathBuf>,
}

/// Validated configuration for one run
#[derive(Debug, Clone)]
pub struct ActionConfig {
    pub token: Token,
    pub version: VersionSpecifier,
    /// Destination identifier handed to the scanner
    pub host: Option<String>,
    pub workspace: PathBuf,
    pub api_url: Url,
    /// `GITHUB_OUTPUT` file; outputs are only logged when absent
    pub output_file: Option<PathBuf>,
    pub settings: Settings,
}

impl ActionConfig {
    /// Validate inputs against settings.
    ///
    /// Fails before anything touches the network: missing token or
    /// workspace, malformed API URL, unusable retry policy, or a version
    /// specifier that is not one of the three accepted shapes.
    pub fn from_inputs(inputs: Inputs, settings: Settings) -> Result<Self, ActionError> {
        let token = non_empty(inputs.token)
            .map(Token::new)
            .ok_or_else(|| ActionError::config("input required and not supplied: token"))?;

        let workspace = inputs
            .workspace
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| ActionError::config("unable to obtain $GITHUB_WORKSPACE"))?;

        let version = match non_empty(inputs.version) {
            Some(raw) => VersionSpecifier::parse(&raw)?,
            None => VersionSpecifier::Latest,
        };

        let raw_url = non_empty(inputs.api_url).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&raw_url)
            .map_err(|e| ActionError::config(format!("invalid API URL `{raw_url}`: {e}")))?;
        if api_url.cannot_be_a_base() {
            return Err(ActionError::config(format!(
                "API URL `{raw_url}` cannot be used as a base"
            )));
        }

        if settings.retry.max_attempts == 0 {
            return Err(ActionError::config("retry.max_attempts must be at least 1"));
        }
        if settings.source.asset.is_empty() || settings.source.scanner.is_empty() {
            return Err(ActionError::config(
                "source.asset and source.scanner must not be empty",
            ));
        }

        Ok(Self {
            token,
            version,
            host: non_empty(inputs.host),
            workspace,
            api_url,
            output_file: inputs.output_file.filter(|p| !p.as_os_str().is_empty()),
            settings,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
