//! Error handling for the Sku updater.
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors**: every failure mode in the update workflow
//!    is a distinct [`UpdaterError`] variant, so callers can match on it.
//! 2. **User-friendly reporting**: [`ErrorContext`] wraps an error with an
//!    actionable suggestion for CLI display.
//!
//! Every error is terminal for the session: nothing is retried, no partial
//! cleanup happens. Components return errors upward; only `main` turns them
//! into process exit codes.
//!
//! # Examples
//!
//! ```rust
//! use sku_updater::core::{UpdaterError, user_friendly_error};
//!
//! let err = UpdaterError::NoAsset;
//! let ctx = user_friendly_error(anyhow::Error::from(err));
//! let rendered = format!("{ctx}");
//! assert!(rendered.contains("No installable"));
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for update sessions.
///
/// Mirrors the failure points of the workflow: locating the installation,
/// reading the local version, resolving the remote release, downloading,
/// installing, and verifying.
#[derive(Error, Debug)]
pub enum UpdaterError {
    /// The Sku installation directory could not be located.
    ///
    /// Raised when the registry lookup fails or the expected add-on
    /// directory does not exist on disk.
    #[error("Sku installation not found: {path}")]
    InstallationNotFound {
        /// Path (or lookup description) that failed.
        path: String,
    },

    /// A version string did not match the `<major>[.<minor>]` shape.
    #[error("Invalid version string '{input}'")]
    InvalidVersion {
        /// The offending input text.
        input: String,
    },

    /// The local changelog was unreadable or carried no version heading.
    #[error("Unable to determine the installed Sku version")]
    VersionNotFound,

    /// The remote release source was unreachable or returned a malformed body.
    #[error("Failed to fetch the latest release: {reason}")]
    Fetch {
        /// What went wrong with the request or its body.
        reason: String,
    },

    /// The latest release exists but has no installable zip asset.
    #[error("No installable zip asset found in the latest release")]
    NoAsset,

    /// The transfer failed or the response had no usable length.
    #[error("Download failed: {reason}")]
    Download {
        /// What interrupted the transfer.
        reason: String,
    },

    /// The downloaded archive could not be opened or extracted.
    #[error("Failed to install archive '{archive}': {reason}")]
    Install {
        /// Path of the archive being extracted.
        archive: String,
        /// The underlying extraction failure.
        reason: String,
    },

    /// The post-install version check came back unchanged.
    ///
    /// A weak signal by design: it only proves the changelog heading did not
    /// move, not that the new tree is intact.
    #[error("Verification failed: Sku still reports version {version}")]
    VerificationFailed {
        /// The version detected both before and after the install.
        version: String,
    },

    /// Any other I/O failure outside the typed paths above.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A typed error paired with a user-facing suggestion.
///
/// Produced by [`user_friendly_error`] and rendered once, at the top level.
pub struct ErrorContext {
    /// The underlying error chain.
    pub error: anyhow::Error,
    /// Optional one-line hint on how to resolve the failure.
    pub suggestion: Option<String>,
}

impl ErrorContext {
    /// Wraps an error with no suggestion attached.
    #[must_use]
    pub fn new(error: anyhow::Error) -> Self {
        Self { error, suggestion: None }
    }

    /// Attaches a resolution hint shown below the error message.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Prints the error (and suggestion, if any) to stderr with colors.
    pub fn display(&self) {
        eprintln!("{} {}", "Error:".red().bold(), self.error);
        for cause in self.error.chain().skip(1) {
            eprintln!("  {} {}", "Caused by:".dimmed(), cause);
        }
        if let Some(suggestion) = &self.suggestion {
            eprintln!("{} {}", "Hint:".yellow().bold(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.error)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nHint: {suggestion}")?;
        }
        Ok(())
    }
}

/// Converts any error into an [`ErrorContext`] with a matching suggestion.
///
/// Suggestions are keyed off the [`UpdaterError`] variant when the chain
/// contains one; unknown errors pass through without a hint.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let suggestion = match error.downcast_ref::<UpdaterError>() {
        Some(UpdaterError::InstallationNotFound { .. }) => Some(
            "Pass --path <DIR> pointing at your Interface/AddOns/Sku directory".to_string(),
        ),
        Some(UpdaterError::VersionNotFound) => Some(
            "Check that CHANGELOG.md exists in the Sku directory and starts with '# Sku (<version>)'"
                .to_string(),
        ),
        Some(UpdaterError::Fetch { .. } | UpdaterError::Download { .. }) => {
            Some("Check your network connection and try again".to_string())
        }
        Some(UpdaterError::VerificationFailed { .. }) => Some(
            "The extracted files may not have replaced the old ones; re-run with --force".to_string(),
        ),
        _ => None,
    };

    let ctx = ErrorContext::new(error);
    match suggestion {
        Some(s) => ctx.with_suggestion(s),
        None => ctx,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = UpdaterError::Fetch { reason: "HTTP 502".to_string() };
        assert_eq!(err.to_string(), "Failed to fetch the latest release: HTTP 502");

        let err = UpdaterError::VerificationFailed { version: "2.1".to_string() };
        assert!(err.to_string().contains("2.1"));
    }

    #[test]
    fn test_user_friendly_error_attaches_suggestions() {
        let err = UpdaterError::InstallationNotFound { path: "C:\\nowhere".to_string() };
        let ctx = user_friendly_error(anyhow::Error::from(err));
        assert!(ctx.suggestion.as_deref().unwrap().contains("--path"));
    }

    #[test]
    fn test_unknown_errors_pass_through_without_hint() {
        let ctx = user_friendly_error(anyhow::anyhow!("something else"));
        assert!(ctx.suggestion.is_none());
    }
}
