//! Command-line interface for the Sku updater.
//!
//! The updater is a single command with flags, no subcommands. A normal run
//! checks the installed version against the latest release and, on consent,
//! downloads and installs it:
//!
//! ```bash
//! sku-updater                 # interactive check-and-update
//! sku-updater --force         # update even when already current
//! sku-updater --yes           # skip the consent prompt
//! sku-updater --diagnostic    # log environment info and exit
//! sku-updater --path D:\WoW\_classic_\Interface\AddOns\Sku
//! sku-updater --source scrape --url https://mirror.example/releases
//! ```
//!
//! Exit code 0 covers success, up-to-date skips, and declined prompts;
//! any fatal error exits 1 after the top-level handler reports it.

use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use crate::constants;
use crate::download::Downloader;
use crate::locator;
use crate::logging;
use crate::resolver::{ApiResolver, ReleaseInfo, ReleaseResolver, ScrapeResolver};
use crate::session::{SessionState, UpdateController};
use crate::utils::progress::DownloadProgress;
use crate::version::Version;

/// How the latest release is discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// GitHub releases REST endpoint.
    Api,
    /// HTML releases index page.
    Scrape,
}

/// Main CLI structure for the Sku updater.
#[derive(Parser)]
#[command(
    name = "sku-updater",
    about = "Keeps the Sku add-on up to date",
    version,
    long_about = "Detects the installed Sku version, checks the latest release, and \
                  downloads and installs it after confirmation."
)]
pub struct Cli {
    /// Force update even if the local version is equal or newer than the
    /// latest available. Mainly used for testing purposes.
    #[arg(short, long)]
    force: bool,

    /// Save diagnostic information to the log file and exit without updating.
    #[arg(long)]
    diagnostic: bool,

    /// Path to the Sku add-on directory (skips the registry lookup).
    #[arg(long, value_name = "DIR")]
    path: Option<PathBuf>,

    /// Release lookup strategy.
    #[arg(long, value_enum, default_value_t = SourceKind::Api)]
    source: SourceKind,

    /// Override the releases endpoint (api) or index page (scrape) URL.
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Assume "yes" at the update prompt (non-interactive runs).
    #[arg(short = 'y', long)]
    yes: bool,

    /// Disable the download progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Suppress console output except errors and the prompt.
    #[arg(short, long)]
    quiet: bool,

    /// Log file location.
    #[arg(long, value_name = "FILE", default_value = constants::DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

impl Cli {
    /// Executes one update session end to end.
    pub async fn execute(self) -> Result<()> {
        logging::init(&self.log_file)?;
        self.log_environment();

        if self.diagnostic {
            println!(
                "Diagnostic info saved to {}. If necessary, send it to the developer.",
                self.log_file.display()
            );
            return Ok(());
        }

        self.echo("Searching Sku installation...");
        let installation = locator::locate(self.path.as_deref())?;
        self.echo(&format!("Found Sku at {}", installation.root_path.display()));
        info!("Found Sku at {}", installation.root_path.display());

        let client = reqwest::Client::new();
        let downloader = Downloader::new(client.clone());

        self.echo("Checking for updates...");
        let state = match self.source {
            SourceKind::Api => {
                let url = self.url.clone().unwrap_or_else(|| constants::SKU_RELEASES_URL.to_string());
                let resolver = ApiResolver::new(client, url);
                self.run_session(installation, resolver, downloader).await?
            }
            SourceKind::Scrape => {
                let url = self.url.clone().unwrap_or_else(|| constants::SKU_INDEX_URL.to_string());
                let resolver = ScrapeResolver::new(client, url);
                self.run_session(installation, resolver, downloader).await?
            }
        };

        match state {
            SessionState::UpToDate => {
                self.echo("Your version of Sku is equal or newer than the latest available.");
            }
            SessionState::Declined => self.echo("Ok, not updating."),
            SessionState::Completed => {}
            // run_session already turned other terminals into errors.
            other => warn!("Session ended in unexpected state {other:?}"),
        }
        Ok(())
    }

    async fn run_session<R: ReleaseResolver>(
        &self,
        installation: locator::LocalInstallation,
        resolver: R,
        downloader: Downloader,
    ) -> Result<SessionState> {
        let mut controller =
            UpdateController::new(installation, resolver, downloader).force(self.force);

        let progress = DownloadProgress::new(!self.no_progress && !self.quiet);
        let bar = progress.clone();

        let state = controller
            .run(
                |local, release| self.confirm_update(local, release),
                move |done, total| bar.update(done, total),
            )
            .await
            .context("Update session failed")?;
        progress.finish();

        if state == SessionState::Completed {
            let render = |v: Option<Version>| v.map_or_else(|| "?".to_string(), |v| v.to_string());
            self.echo("Update complete!");
            self.echo(&format!(
                "Sku updated from {} to {}",
                render(controller.local_version()),
                render(controller.verified_version())
            ));
        }
        Ok(state)
    }

    /// Asks for consent; `--yes` answers affirmatively without prompting.
    fn confirm_update(&self, local: Version, release: &ReleaseInfo) -> bool {
        println!("Current Sku version is {local}");
        println!("Latest available Sku version is {}", release.version);
        if self.yes {
            info!("Consent prompt skipped via --yes");
            return true;
        }

        print!("Do you want to update to the latest version? y - yes, n or other letter - no: ");
        let _ = std::io::stdout().flush();

        let mut answer = String::new();
        if std::io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        let answer = answer.trim();
        if answer == constants::AFFIRMATIVE_ANSWER {
            true
        } else {
            warn!("User declined update with answer \"{answer}\"");
            false
        }
    }

    fn echo(&self, message: &str) {
        if !self.quiet {
            println!("{message}");
        }
    }

    fn log_environment(&self) {
        info!("Sku Updater {} started", env!("CARGO_PKG_VERSION"));
        info!(
            "Running on {} ({})",
            std::env::consts::OS,
            std::env::consts::ARCH
        );
        info!(
            "Command line parameters: {:?}",
            std::env::args().collect::<Vec<_>>()
        );
    }
}

/// Blocks for an acknowledgment keypress, but only on interactive stdin.
///
/// The updater is typically launched by double-click on Windows; without
/// this the console window closes before the user can read the outcome.
pub fn wait_for_acknowledgment() {
    if std::io::stdin().is_terminal() {
        println!("Press enter to exit program");
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
    }
}
