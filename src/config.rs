//! Configuration and CLI argument handling

use clap::{Args, Parser, Subcommand};

use crate::tasks::fibonacci::DEFAULT_FIBONACCI_INPUT;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "countdown-timer")]
#[command(about = "A countdown timer with an audible alert, plus a Fibonacci demo")]
#[command(version = "1.0.0")]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Count down the selected time and alert when it runs out
    Timer(TimerArgs),
    /// Compute a Fibonacci number the slow way, off the async workers
    Fib {
        /// Which Fibonacci number to compute; non-numbers count as 0
        #[arg(default_value = DEFAULT_FIBONACCI_INPUT)]
        input: String,
    },
}

/// Options for the countdown
#[derive(Debug, Args)]
pub struct TimerArgs {
    /// Hours (clamped to 0-99)
    #[arg(short = 'H', long, default_value_t = 0, allow_negative_numbers = true)]
    pub hours: i64,

    /// Minutes (clamped to 0-59)
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub minutes: i64,

    /// Seconds (clamped to 0-59)
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub seconds: i64,

    /// Print every state change as a JSON line
    #[arg(long)]
    pub json: bool,

    /// Do not play the completion alert
    #[arg(long)]
    pub silent: bool,

    /// Program and arguments to play as the completion alert
    #[arg(long, conflicts_with = "silent")]
    pub alert_command: Option<String>,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
