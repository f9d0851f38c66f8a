//! Installed-version detection from the Sku changelog.
//!
//! Sku records its version in the first heading of `CHANGELOG.md`, e.g.
//! `# Sku (34.26)`. Detection scans for the first line matching that heading
//! anchored at the start of a line and parses the captured number. A missing
//! heading is terminal; there is no fallback source for the local version.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::core::error::UpdaterError;
use crate::locator::LocalInstallation;
use crate::version::Version;

static VERSION_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# Sku \((\d+(?:\.\d+)?)\)").unwrap());

/// Extracts the installed version from changelog text.
///
/// Returns the version from the first matching heading line.
///
/// # Errors
///
/// [`UpdaterError::VersionNotFound`] if no line matches the heading pattern,
/// or [`UpdaterError::InvalidVersion`] if the captured text does not parse.
pub fn detect_version(changelog: &str) -> Result<Version, UpdaterError> {
    let captures = VERSION_HEADING
        .captures(changelog)
        .ok_or(UpdaterError::VersionNotFound)?;
    captures[1].parse()
}

/// Reads the installation's changelog and detects the installed version.
///
/// # Errors
///
/// [`UpdaterError::VersionNotFound`] when the changelog is unreadable, plus
/// the failures of [`detect_version`].
pub async fn installed_version(installation: &LocalInstallation) -> Result<Version, UpdaterError> {
    debug!("Reading changelog at {}", installation.changelog_path.display());
    let text = tokio::fs::read_to_string(&installation.changelog_path)
        .await
        .map_err(|_| UpdaterError::VersionNotFound)?;
    detect_version(&text)
}
