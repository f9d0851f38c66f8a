//! The update session state machine.
//!
//! [`UpdateController`] drives one end-to-end session: detect the installed
//! version, resolve the latest release, and, when warranted and consented,
//! download, install, and verify. The session walks a fixed set of states:
//!
//! ```text
//! Idle → Checking → {UpToDate | UpdateAvailable}
//!                      UpdateAvailable → Declined
//!                      UpdateAvailable → Downloading → Installing → Verifying
//!                                          Verifying → {Completed | VerificationFailed}
//! ```
//!
//! Component errors are fatal: the session ends at the point of first
//! failure with the error propagated, not modeled as a state transition.
//! There are no retries and no cleanup of partial artifacts.

use tracing::{debug, info, warn};

use crate::changelog;
use crate::core::error::UpdaterError;
use crate::download::Downloader;
use crate::install;
use crate::locator::LocalInstallation;
use crate::resolver::{ReleaseInfo, ReleaseResolver};
use crate::version::Version;

/// Position of a session in the update workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Initial state, before anything ran.
    Idle,
    /// Detecting the local version and resolving the remote release.
    Checking,
    /// Remote is not newer and force mode is off. Terminal.
    UpToDate,
    /// A newer release exists (or force mode is on); awaiting consent.
    UpdateAvailable,
    /// The user declined the prompt. Terminal.
    Declined,
    /// Streaming the release archive.
    Downloading,
    /// Extracting the archive over the installation.
    Installing,
    /// Re-detecting the installed version.
    Verifying,
    /// Verification observed a changed version. Terminal.
    Completed,
    /// Verification observed an unchanged version. Terminal.
    VerificationFailed,
}

impl SessionState {
    /// Whether the workflow stops in this state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::UpToDate | Self::Declined | Self::Completed | Self::VerificationFailed
        )
    }
}

/// Transient per-run state. Created at session start, discarded at exit.
#[derive(Debug)]
pub struct UpdateSession {
    /// Version detected from the local changelog before any install.
    pub local_version: Option<Version>,
    /// Release resolved from the remote source.
    pub release: Option<ReleaseInfo>,
    /// Version re-detected after a completed install.
    pub verified_version: Option<Version>,
    /// Current position in the workflow.
    pub state: SessionState,
}

/// Orchestrates one update session over a chosen release resolver.
///
/// Construction is builder-style; `force(true)` bypasses the up-to-date
/// skip (but never the consent prompt).
pub struct UpdateController<R> {
    resolver: R,
    downloader: Downloader,
    installation: LocalInstallation,
    force: bool,
    session: UpdateSession,
}

impl<R: ReleaseResolver> UpdateController<R> {
    /// Creates a controller for the given installation.
    #[must_use]
    pub fn new(installation: LocalInstallation, resolver: R, downloader: Downloader) -> Self {
        Self {
            resolver,
            downloader,
            installation,
            force: false,
            session: UpdateSession {
                local_version: None,
                release: None,
                verified_version: None,
                state: SessionState::Idle,
            },
        }
    }

    /// Requests an update attempt even when the local version is current.
    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// The session's current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session.state
    }

    /// Version detected before the update, once `run` has checked.
    #[must_use]
    pub fn local_version(&self) -> Option<Version> {
        self.session.local_version
    }

    /// Version re-detected after a completed install.
    #[must_use]
    pub fn verified_version(&self) -> Option<Version> {
        self.session.verified_version
    }

    /// Release resolved from the remote source, once `run` has checked.
    #[must_use]
    pub fn release(&self) -> Option<&ReleaseInfo> {
        self.session.release.as_ref()
    }

    /// Runs the session to a terminal state.
    ///
    /// `confirm` is invoked once when an update is available; returning
    /// `false` declines it. `on_progress` receives throttled
    /// `(bytes_so_far, total_bytes)` download callbacks.
    ///
    /// # Errors
    ///
    /// Any component error ends the session immediately. A failed
    /// post-install check surfaces as [`UpdaterError::VerificationFailed`]
    /// with the session left in [`SessionState::VerificationFailed`].
    pub async fn run<C, F>(&mut self, mut confirm: C, on_progress: F) -> Result<SessionState, UpdaterError>
    where
        C: FnMut(Version, &ReleaseInfo) -> bool,
        F: FnMut(u64, u64),
    {
        self.session.state = SessionState::Checking;

        let local = changelog::installed_version(&self.installation).await?;
        info!("Current Sku version is {local}");
        self.session.local_version = Some(local);

        let release = self.resolver.resolve().await?;
        info!("Latest available Sku version is {}", release.version);
        self.session.release = Some(release.clone());

        if release.version <= local && !self.force {
            info!("Local version is equal or newer than latest; nothing to do");
            self.session.state = SessionState::UpToDate;
            return Ok(self.session.state);
        }

        self.session.state = SessionState::UpdateAvailable;
        if !confirm(local, &release) {
            warn!("User declined the update");
            self.session.state = SessionState::Declined;
            return Ok(self.session.state);
        }

        self.session.state = SessionState::Downloading;
        let archive_name = release
            .download_url
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("Sku.zip");
        let archive_path = self.installation.parent_dir().join(archive_name);
        self.downloader
            .fetch(&release.download_url, &archive_path, on_progress)
            .await?;

        self.session.state = SessionState::Installing;
        install::extract_archive(&archive_path, self.installation.parent_dir())?;
        debug!("Removing downloaded archive {}", archive_path.display());
        if let Err(e) = std::fs::remove_file(&archive_path) {
            // The install itself succeeded; a leftover archive is not fatal.
            warn!("Failed to remove archive {}: {e}", archive_path.display());
        }

        self.session.state = SessionState::Verifying;
        let detected = changelog::installed_version(&self.installation).await?;
        if detected == local {
            warn!("Verification failed: version is still {detected}");
            self.session.state = SessionState::VerificationFailed;
            return Err(UpdaterError::VerificationFailed {
                version: detected.to_string(),
            });
        }

        info!("Sku updated from {local} to {detected}");
        self.session.verified_version = Some(detected);
        self.session.state = SessionState::Completed;
        Ok(self.session.state)
    }
}
