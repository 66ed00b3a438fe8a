//! Countdown Timer - a cancellable countdown with an audible alert
//!
//! This is the main entry point for the countdown-timer application.

use std::time::Instant;
use anyhow::Context;
use tracing::{debug, info, warn};

use countdown_timer::{
    config::{Command, Config, TimerArgs},
    services::select_alert,
    state::{CountdownTimer, TimerState},
    tasks::{fibonacci_off_thread, parse_input},
    utils::{format_grouped, render_line, shutdown_signal, shutdown_signals},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so stdout only carries timer output
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_timer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting countdown-timer v1.0.0");

    match &config.command {
        Command::Timer(args) => run_timer(args).await,
        Command::Fib { input } => run_fibonacci(input).await,
    }
}

async fn run_timer(args: &TimerArgs) -> anyhow::Result<()> {
    let shutdown = shutdown_signal(shutdown_signals().context("Failed to register signal handlers")?);
    tokio::pin!(shutdown);

    let timer = CountdownTimer::new(select_alert(args.silent, args.alert_command.as_deref()));
    let mut updates = timer.subscribe();

    timer.select_time(args.hours, args.minutes, args.seconds);
    let started = timer.start_timer();
    if !started.is_running {
        warn!("Nothing to count down, selected time is 00:00:00");
        return Ok(());
    }
    updates.mark_unchanged();
    render(&started, args.json)?;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                render(&state, args.json)?;
                if !state.is_running {
                    info!("Time's up");
                    break;
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received, cancelling timer");
                let state = timer.cancel_timer();
                render(&state, args.json)?;
                break;
            }
        }
    }

    // Let a completion alert finish before the runtime shuts down
    timer.join_task().await;
    Ok(())
}

fn render(state: &TimerState, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(state).context("Failed to serialize timer state")?);
    } else {
        println!("{}", render_line(state));
    }
    Ok(())
}

async fn run_fibonacci(input: &str) -> anyhow::Result<()> {
    let n = parse_input(input);
    info!("Calculating fibonacci({})", n);

    let started = Instant::now();
    let value = fibonacci_off_thread(n).await?;
    debug!("fibonacci({}) took {:?}", n, started.elapsed());

    println!("Result: {}", format_grouped(value));
    Ok(())
}
