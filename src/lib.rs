//! sku-updater - keeps the Sku add-on up to date.
//!
//! The updater runs one session per invocation: it detects the installed
//! version from the add-on's changelog, resolves the latest release from a
//! remote source, and (on consent or in forced mode) downloads the release
//! archive, extracts it over the installation, and verifies the version
//! changed.
//!
//! # Core Modules
//!
//! - [`version`] - two-component release versions with a total ordering
//! - [`changelog`] - installed-version detection from `CHANGELOG.md`
//! - [`resolver`] - release lookup strategies (GitHub API, HTML scrape)
//! - [`download`] - streamed archive download with throttled progress
//! - [`install`] - zip extraction over the existing tree
//! - [`session`] - the update state machine and controller
//!
//! # Supporting Modules
//!
//! - [`locator`] - finding the Sku directory (registry or `--path`)
//! - [`cli`] - command-line surface and session wiring
//! - [`core`] - error taxonomy and user-facing error rendering
//! - [`logging`] - append-only file log
//! - [`constants`] - endpoints, file names, timing parameters
//! - [`utils`] - progress display
//!
//! The workflow is single-threaded and synchronous in structure: each step
//! blocks until it completes, and exactly one operation is in flight at any
//! time. Every component error is terminal for the session; there are no
//! retries, no rollback, and no cleanup of partial artifacts.

pub mod changelog;
pub mod cli;
pub mod constants;
pub mod core;
pub mod download;
pub mod install;
pub mod locator;
pub mod logging;
pub mod resolver;
pub mod session;
pub mod utils;
pub mod version;
