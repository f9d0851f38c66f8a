//! Core types shared across the updater.
//!
//! Currently this is the error taxonomy in [`error`]. Every component
//! surfaces failures as a typed [`error::UpdaterError`]; the top-level
//! handler in `main` owns user-facing reporting and exit-code selection.

pub mod error;

pub use error::{ErrorContext, UpdaterError, user_friendly_error};
