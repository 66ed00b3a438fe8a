//! External collaborators module
//!
//! This module contains the side effects the timer triggers but does not own,
//! like the audible completion alert.

pub mod alert;

// Re-export main types
pub use alert::{select_alert, Alert, CommandAlert, SilentAlert, TerminalBell};
