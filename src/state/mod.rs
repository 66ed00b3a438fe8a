//! State management module
//!
//! This module contains the countdown timer state and its owner.

pub mod countdown_timer;
pub mod timer_state;

// Re-export main types
pub use countdown_timer::{CountdownTimer, TICK_INTERVAL};
pub use timer_state::{TickOutcome, TimerState, Transition};
