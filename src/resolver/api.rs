//! GitHub releases API lookup strategy.
//!
//! Issues a single GET against the releases/latest endpoint and decodes the
//! JSON body: the `tag_name` carries the version as `r<major>[.<minor>]`,
//! and the first asset named `*.zip` is the installable archive.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::debug;

use crate::constants;
use crate::core::error::UpdaterError;
use crate::resolver::{ReleaseInfo, ReleaseResolver};

static TAG_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^r(\d+(?:\.\d+)?)$").unwrap());

#[derive(Debug, Deserialize)]
struct ReleaseResponse {
    tag_name: String,
    assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Deserialize)]
struct ReleaseAsset {
    name: String,
    browser_download_url: String,
}

/// Resolves the latest release via the GitHub REST API.
pub struct ApiResolver {
    client: reqwest::Client,
    url: String,
}

impl ApiResolver {
    /// Creates a resolver against the given releases/latest endpoint.
    #[must_use]
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

impl Default for ApiResolver {
    fn default() -> Self {
        Self::new(reqwest::Client::new(), constants::SKU_RELEASES_URL)
    }
}

impl ReleaseResolver for ApiResolver {
    async fn resolve(&self) -> Result<ReleaseInfo, UpdaterError> {
        debug!("Fetching latest release from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .header(USER_AGENT, constants::USER_AGENT)
            .send()
            .await
            .map_err(|e| UpdaterError::Fetch { reason: e.to_string() })?;

        let status = response.status();
        debug!("Release endpoint answered {status}");
        if !status.is_success() {
            return Err(UpdaterError::Fetch { reason: format!("HTTP {status}") });
        }

        let release: ReleaseResponse = response
            .json()
            .await
            .map_err(|e| UpdaterError::Fetch { reason: format!("malformed body: {e}") })?;
        release_from_response(release)
    }
}

fn release_from_response(release: ReleaseResponse) -> Result<ReleaseInfo, UpdaterError> {
    let captures = TAG_VERSION.captures(&release.tag_name).ok_or_else(|| {
        UpdaterError::Fetch {
            reason: format!("unexpected tag format '{}'", release.tag_name),
        }
    })?;
    let version = captures[1].parse()?;

    let asset = release
        .assets
        .iter()
        .find(|asset| asset.name.ends_with(constants::ARCHIVE_EXTENSION))
        .ok_or(UpdaterError::NoAsset)?;

    Ok(ReleaseInfo {
        version,
        download_url: asset.browser_download_url.clone(),
    })
}
