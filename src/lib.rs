//! Countdown Timer - a cancellable countdown with an audible alert
//!
//! This library provides the countdown timer state machine, its background
//! tick task, the completion alert, and a small off-thread Fibonacci demo.

pub mod config;
pub mod state;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{CountdownTimer, TimerState, Transition};
pub use services::Alert;
pub use utils::format::format_hms;
