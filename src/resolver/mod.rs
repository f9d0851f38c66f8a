//! Remote release resolution.
//!
//! Two interchangeable strategies discover the latest Sku release:
//!
//! - [`api::ApiResolver`]: the GitHub releases REST endpoint (default).
//! - [`scrape::ScrapeResolver`]: an HTML releases index, for setups where
//!   the API is unreachable.
//!
//! Which strategy runs is a configuration choice; there is no fallback chain.
//! Both return the **first** matching asset only. Multiple candidates are
//! never ranked, which the tests pin down as a known limitation.

pub mod api;
pub mod scrape;

use crate::core::error::UpdaterError;
use crate::version::Version;

pub use api::ApiResolver;
pub use scrape::ScrapeResolver;

/// One discovered remote release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    /// Version advertised by the release.
    pub version: Version,
    /// Direct download URL of the zip asset.
    pub download_url: String,
}

/// Capability to resolve the latest remote release.
///
/// Implemented by both lookup strategies and by deterministic fakes in
/// tests; the controller is generic over it.
pub trait ReleaseResolver {
    /// Fetches and decodes the latest release.
    ///
    /// # Errors
    ///
    /// [`UpdaterError::Fetch`] on transport or decoding failures,
    /// [`UpdaterError::NoAsset`] when no zip asset matches.
    fn resolve(&self) -> impl Future<Output = Result<ReleaseInfo, UpdaterError>>;
}
