//! Completion alerts

use std::{
    fmt,
    io::{self, Write},
    process::Stdio,
    sync::Arc,
};
use tokio::{
    process::{Child, Command},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

/// Something to fire when a countdown completes.
///
/// `alert` is called from the countdown task and must return promptly;
/// anything slow goes on a separate task whose handle is returned so the
/// caller can wait for it before shutting down.
pub trait Alert: Send + Sync {
    fn alert(&self) -> Option<JoinHandle<()>>;
}

/// Rings the terminal bell on stderr, leaving stdout to timer output
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl TerminalBell {
    fn ring<W: Write>(out: &mut W) -> io::Result<()> {
        out.write_all(b"\x07")?;
        out.flush()
    }
}

impl Alert for TerminalBell {
    fn alert(&self) -> Option<JoinHandle<()>> {
        if let Err(e) = Self::ring(&mut io::stderr()) {
            warn!("Failed to ring terminal bell: {}", e);
        }
        None
    }
}

/// Does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAlert;

impl Alert for SilentAlert {
    fn alert(&self) -> Option<JoinHandle<()>> {
        debug!("Alert suppressed");
        None
    }
}

/// Plays the alert through an external program, e.g. `paplay alarm.oga`.
/// Falls back to another alert, the terminal bell by default, when the
/// program cannot run or exits with an error.
#[derive(Clone)]
pub struct CommandAlert {
    pub program: String,
    pub args: Vec<String>,
    fallback: Arc<dyn Alert>,
}

impl CommandAlert {
    /// Split a whitespace-separated command line. `None` when it is blank.
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            fallback: Arc::new(TerminalBell),
        })
    }

    /// Replace the alert used when the program fails
    pub fn with_fallback(mut self, fallback: Arc<dyn Alert>) -> Self {
        self.fallback = fallback;
        self
    }

    fn spawn(&self) -> Result<Child, String> {
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("Failed to execute {}: {}", self.program, e))
    }

    /// Run the alert program to completion
    pub async fn play(&self) -> Result<(), String> {
        let child = self.spawn()?;
        wait_for_exit(&self.program, child).await
    }
}

impl fmt::Debug for CommandAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandAlert")
            .field("program", &self.program)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl Alert for CommandAlert {
    fn alert(&self) -> Option<JoinHandle<()>> {
        let child = match self.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!("{}, using fallback alert", e);
                return self.fallback.alert();
            }
        };

        let program = self.program.clone();
        let fallback = Arc::clone(&self.fallback);
        Some(tokio::spawn(async move {
            if let Err(e) = wait_for_exit(&program, child).await {
                warn!("{}, using fallback alert", e);
                if let Some(pending) = fallback.alert() {
                    let _ = pending.await;
                }
            }
        }))
    }
}

async fn wait_for_exit(program: &str, child: Child) -> Result<(), String> {
    let output = child
        .wait_with_output()
        .await
        .map_err(|e| format!("Failed to wait for {}: {}", program, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{} failed: {}", program, stderr.trim()));
    }

    debug!("{} finished playing", program);
    Ok(())
}

/// Pick the alert for the given options
pub fn select_alert(silent: bool, command_line: Option<&str>) -> Arc<dyn Alert> {
    if silent {
        info!("Completion alert disabled");
        return Arc::new(SilentAlert);
    }

    match command_line.and_then(CommandAlert::parse) {
        Some(command) => {
            info!("Completion alert: {} {}", command.program, command.args.join(" "));
            Arc::new(command)
        }
        None => Arc::new(TerminalBell),
    }
}
