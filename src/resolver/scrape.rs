//! HTML index scrape lookup strategy.
//!
//! Fetches a releases index page and walks its anchor elements, looking for
//! the first `href` shaped like a versioned Sku archive,
//! `.../r<ver>/Sku-r<ver>-....zip`. The version is taken from the release
//! segment of the same link, so no second request is needed.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::USER_AGENT;
use scraper::{Html, Selector};
use tracing::debug;

use crate::constants;
use crate::core::error::UpdaterError;
use crate::resolver::{ReleaseInfo, ReleaseResolver};

static VERSIONED_ARCHIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/r(\d+(?:\.\d+)?)/Sku-r\d+(?:\.\d+)?[^/]*\.zip$").unwrap());

/// Resolves the latest release by scraping an HTML releases index.
pub struct ScrapeResolver {
    client: reqwest::Client,
    url: String,
}

impl ScrapeResolver {
    /// Creates a resolver against the given index page.
    #[must_use]
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

impl Default for ScrapeResolver {
    fn default() -> Self {
        Self::new(reqwest::Client::new(), constants::SKU_INDEX_URL)
    }
}

impl ReleaseResolver for ScrapeResolver {
    async fn resolve(&self) -> Result<ReleaseInfo, UpdaterError> {
        debug!("Scraping release index at {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .header(USER_AGENT, constants::USER_AGENT)
            .send()
            .await
            .map_err(|e| UpdaterError::Fetch { reason: e.to_string() })?;

        let status = response.status();
        debug!("Release index answered {status}");
        if !status.is_success() {
            return Err(UpdaterError::Fetch { reason: format!("HTTP {status}") });
        }

        let body = response
            .text()
            .await
            .map_err(|e| UpdaterError::Fetch { reason: e.to_string() })?;
        release_from_index(&body)
    }
}

/// Picks the first versioned-archive anchor out of an index page.
fn release_from_index(html: &str) -> Result<ReleaseInfo, UpdaterError> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]").expect("static selector");

    for element in document.select(&anchors) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if let Some(captures) = VERSIONED_ARCHIVE.captures(href) {
            let version = captures[1].parse()?;
            debug!("Matched release link {href}");
            return Ok(ReleaseInfo {
                version,
                download_url: href.to_string(),
            });
        }
    }

    Err(UpdaterError::NoAsset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::Version;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_release_from_index() {
        let html = r#"
            <html><body>
            <a href="/Duugu/Sku/blob/main/README.md">docs</a>
            <a href="https://github.com/Duugu/Sku/releases/download/r34.26/Sku-r34.26-classic.zip">latest</a>
            <a href="https://github.com/Duugu/Sku/releases/download/r34.25/Sku-r34.25-classic.zip">older</a>
            </body></html>
        "#;
        let info = release_from_index(html).unwrap();
        assert_eq!(info.version, Version::new(34, 26));
        assert!(info.download_url.ends_with("Sku-r34.26-classic.zip"));
    }

    #[test]
    fn test_first_anchor_wins_regardless_of_version() {
        // Document order decides, not the version number. Known limitation.
        let html = r#"
            <a href="/dl/r2.0/Sku-r2.0-x.zip">a</a>
            <a href="/dl/r3.0/Sku-r3.0-x.zip">b</a>
        "#;
        let info = release_from_index(html).unwrap();
        assert_eq!(info.version, Version::new(2, 0));
    }

    #[test]
    fn test_no_matching_anchor() {
        let html = r#"<a href="/about">about</a><a href="/dl/Sku.tar.gz">tar</a>"#;
        assert!(matches!(
            release_from_index(html),
            Err(UpdaterError::NoAsset)
        ));
    }

    #[test]
    fn test_version_without_minor() {
        let html = r#"<a href="/dl/r7/Sku-r7-classic.zip">r7</a>"#;
        assert_eq!(release_from_index(html).unwrap().version, Version::new(7, 0));
    }

    #[tokio::test]
    async fn test_resolve_against_mock_index() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"<html><a href="/dl/r12.3/Sku-r12.3-classic.zip">dl</a></html>"#,
                "text/html",
            ))
            .mount(&server)
            .await;

        let resolver = ScrapeResolver::new(reqwest::Client::new(), server.uri());
        let info = resolver.resolve().await.unwrap();
        assert_eq!(info.version, Version::new(12, 3));
    }
}
