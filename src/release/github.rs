//! GitHub release API interaction

use std::time::Duration;

use log::debug;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, StatusCode};
use url::Url;

use super::{Release, ResolveError, VersionSpecifier};
use crate::config::{HttpSettings, SourceSettings, Token};

const GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

/// Client bound to one owner/repo pair and one credential
///
/// The resolver and the asset fetcher share it so both go through the same
/// connection pool, user agent and authorization header.
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    http: reqwest::Client,
    api_url: Url,
    owner: String,
    repo: String,
    token: Token,
}

impl ReleaseClient {
    /// Build the underlying HTTP client from settings
    pub fn new(
        api_url: Url,
        source: &SourceSettings,
        http: &HttpSettings,
        token: Token,
    ) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("devpal-action/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
            .timeout(Duration::from_secs(http.request_timeout_secs))
            .build()?;

        Ok(Self {
            http: client,
            api_url,
            owner: source.owner.clone(),
            repo: source.repo.clone(),
            token,
        })
    }

    /// `{api}/repos/{owner}/{repo}/releases/{segments...}`
    ///
    /// Each segment is percent-encoded on its own, so a tag containing `/`
    /// stays a single path segment.
    pub(crate) fn releases_endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        // api_url is checked to be a base URL when the config is built
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(["repos", self.owner.as_str(), self.repo.as_str(), "releases"])
                .extend(segments);
        }
        url
    }

    /// GET with the run's credential attached
    pub(crate) fn get(&self, url: Url) -> RequestBuilder {
        self.http
            .get(url)
            .header(AUTHORIZATION, format!("token {}", self.token.expose()))
            .header(API_VERSION_HEADER, API_VERSION)
    }

    /// Look up the release a specifier points at
    pub async fn resolve(&self, specifier: &VersionSpecifier) -> Result<Release, ResolveError> {
        let url = match specifier {
            VersionSpecifier::Latest => self.releases_endpoint(&["latest"]),
            VersionSpecifier::Tag(tag) => self.releases_endpoint(&["tags", tag.as_str()]),
            VersionSpecifier::Id(id) => self.releases_endpoint(&[id.to_string().as_str()]),
        };
        debug!("Resolving release `{specifier}` via {url}");

        let response = self
            .get(url)
            .header(ACCEPT, GITHUB_JSON)
            .send()
            .await
            .map_err(|source| ResolveError::Request {
                specifier: specifier.clone(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ResolveError::NotFound(specifier.clone()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResolveError::Api {
                specifier: specifier.clone(),
                status,
                body,
            });
        }

        let payload = response
            .bytes()
            .await
            .map_err(|source| ResolveError::Request {
                specifier: specifier.clone(),
                source,
            })?;

        serde_json::from_slice(&payload).map_err(|source| ResolveError::Decode {
            specifier: specifier.clone(),
            source,
        })
    }
}
