//! Background tasks module
//!
//! This module contains the work that runs off the caller: the countdown
//! tick loop and the blocking Fibonacci demo.

pub mod countdown;
pub mod fibonacci;

// Re-export main functions
pub(crate) use countdown::countdown_task;
pub use fibonacci::{fibonacci, fibonacci_off_thread, parse_input};
