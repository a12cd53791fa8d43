//! GitHub release discovery
//!
//! Resolves a version specifier to a concrete release and picks the assets
//! a run needs out of it.
//!
//! ## Module Organization
//!
//! - `specifier` - Version specifier classification (`latest`, `tags/<tag>`, id)
//! - `github` - Release API client
//! - `locate` - Asset filtering by file name

mod github;
mod locate;
mod specifier;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

pub use github::ReleaseClient;
pub use locate::locate_assets;
pub use specifier::VersionSpecifier;

/// Release metadata from the API
#[derive(Deserialize, Debug, Clone)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    /// Display name; the API sends `null` for untitled releases
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Release {
    /// Display name, falling back to the tag like the GitHub UI does
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.tag_name,
        }
    }
}

/// Release asset metadata
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Why a version specifier could not be turned into a release
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(
        "invalid version specifier `{0}`: expected `latest`, `tags/<tag>` or a numeric release id"
    )]
    InvalidSpecifier(String),

    #[error("no release found for `{0}`")]
    NotFound(VersionSpecifier),

    #[error("release API returned HTTP {status} for `{specifier}`: {body}")]
    Api {
        specifier: VersionSpecifier,
        status: StatusCode,
        body: String,
    },

    #[error("release request for `{specifier}` failed")]
    Request {
        specifier: VersionSpecifier,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed release payload for `{specifier}`")]
    Decode {
        specifier: VersionSpecifier,
        #[source]
        source: serde_json::Error,
    },
}
