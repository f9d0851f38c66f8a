//! Supporting utilities for the CLI layer.

pub mod progress;
