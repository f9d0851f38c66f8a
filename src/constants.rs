//! Global constants used throughout the updater.
//!
//! Endpoint defaults, file names, and timing parameters live here so the
//! magic values stay discoverable and consistent across modules.

use std::time::Duration;

/// GitHub REST endpoint describing the latest Sku release.
pub const SKU_RELEASES_URL: &str = "https://api.github.com/repos/Duugu/Sku/releases/latest";

/// HTML releases index used by the scrape strategy.
pub const SKU_INDEX_URL: &str = "https://github.com/Duugu/Sku/releases";

/// File inside the Sku directory that records the installed version.
pub const CHANGELOG_FILE: &str = "CHANGELOG.md";

/// Extension a release asset must carry to be installable.
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// Minimum interval between two progress callbacks during a download.
pub const PROGRESS_REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// The only prompt answer that counts as consent.
pub const AFFIRMATIVE_ANSWER: &str = "y";

/// Default log file, created in the working directory.
pub const DEFAULT_LOG_FILE: &str = "sku-updater.log";

/// User-Agent sent with every remote request. GitHub rejects anonymous ones.
pub const USER_AGENT: &str = concat!("sku-updater/", env!("CARGO_PKG_VERSION"));
