//! Sku updater CLI entry point.
//!
//! Parses arguments, runs one update session, and owns the user-facing
//! error reporting and exit-code selection. Internal components never
//! terminate the process themselves.

use anyhow::Result;
use clap::Parser;
use sku_updater::cli;
use sku_updater::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => {
            cli::wait_for_acknowledgment();
            Ok(())
        }
        Err(e) => {
            tracing::error!("Session failed: {e:#}");
            user_friendly_error(e).display();
            cli::wait_for_acknowledgment();
            std::process::exit(1);
        }
    }
}
