//! Utility functions module
//!
//! This module contains formatting helpers and signal handling.

pub mod format;
pub mod signals;

// Re-export main functions
pub use format::{format_grouped, format_hms, render_line};
pub use signals::{shutdown_signal, shutdown_signals};
