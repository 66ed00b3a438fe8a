//! Signal handling for cancelling a run and shutting down

use signal_hook_tokio::Signals;
use futures::stream::StreamExt;
use tracing::info;

/// Register for shutdown signals (SIGTERM, SIGINT)
pub fn shutdown_signals() -> std::io::Result<Signals> {
    Signals::new([
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ])
}

/// Wait for the first registered shutdown signal
pub async fn shutdown_signal(mut signals: Signals) {
    if let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
    }
}
