use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::tick_loop::HostCommand;

/// Spawn a SIGUSR2 handler that asks the tick loop to reload its scripts.
///
/// The task ends once the tick loop has dropped its receiver. Must be called
/// from within a tokio runtime.
#[cfg(unix)]
pub fn setup_reload_signal(commands: mpsc::UnboundedSender<HostCommand>) -> JoinHandle<()> {
    tokio::spawn(async move {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigusr2 = match signal(SignalKind::user_defined2()) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(target: "scripting", "Failed to register SIGUSR2 handler: {}", e);
                return;
            }
        };

        loop {
            tokio::select! {
                _ = commands.closed() => {
                    info!(target: "scripting", "Tick loop stopped, shutting down SIGUSR2 handler");
                    break;
                }
                received = sigusr2.recv() => {
                    if received.is_none() {
                        break;
                    }
                    info!(target: "scripting", "Received SIGUSR2 - triggering script reload");

                    if commands.send(HostCommand::Reload).is_err() {
                        tracing::error!(target: "scripting", "Failed to send reload command - tick loop is gone");
                        break;
                    }
                }
            }
        }
    })
}

/// Non-Unix platforms have no SIGUSR2; reloads must be sent as commands.
#[cfg(not(unix))]
pub fn setup_reload_signal(_commands: mpsc::UnboundedSender<HostCommand>) -> JoinHandle<()> {
    tracing::warn!(target: "scripting", "SIGUSR2 reload not supported on this platform");
    tokio::spawn(async {})
}
