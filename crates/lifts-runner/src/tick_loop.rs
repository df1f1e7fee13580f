use std::ops::ControlFlow;

use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use lifts_events::{HostEvent, SystemEvent};
use lifts_scripting_host::{ScriptRegistry, ScriptRunner, ScriptingConfig, World};

/// Something for the tick loop to do between ticks
#[derive(Debug, Clone)]
pub enum HostCommand {
    /// Deliver a host event to subscribed scripts
    Event(HostEvent),
    /// Rebuild all scripts, as on a world reload
    Reload,
    /// Deliver `Shutdown` to scripts and stop the loop
    Shutdown,
}

impl From<HostEvent> for HostCommand {
    fn from(event: HostEvent) -> Self {
        HostCommand::Event(event)
    }
}

/// Most commands handled before a single tick; the rest wait for the next one
pub const MAX_COMMANDS_PER_TICK: usize = 64;

/// Drive `runner` at the configured tick rate until shut down.
///
/// Queued commands are handled in arrival order just before each tick, at
/// most [`MAX_COMMANDS_PER_TICK`] at a time, so a flood of host events delays
/// later events instead of ticks. The loop also stops when every command
/// sender is dropped. The runner is handed back so callers can inspect or
/// reuse the world.
pub async fn run_tick_loop<W: World>(
    mut runner: ScriptRunner<W>,
    registry: &ScriptRegistry,
    config: &ScriptingConfig,
    mut commands: mpsc::UnboundedReceiver<HostCommand>,
) -> ScriptRunner<W> {
    let mut ticker = interval(config.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(target: "scripting", "Tick loop started at {:?} per tick", config.tick_interval());

    loop {
        ticker.tick().await;

        if drain_commands(&mut runner, registry, config, &mut commands).is_break() {
            break;
        }

        runner.tick();
    }

    runner
}

fn drain_commands<W: World>(
    runner: &mut ScriptRunner<W>,
    registry: &ScriptRegistry,
    config: &ScriptingConfig,
    commands: &mut mpsc::UnboundedReceiver<HostCommand>,
) -> ControlFlow<()> {
    for _ in 0..MAX_COMMANDS_PER_TICK {
        match commands.try_recv() {
            Ok(HostCommand::Event(event)) => runner.handle_event(&event),
            Ok(HostCommand::Reload) => runner.reload_scripts(registry, config),
            Ok(HostCommand::Shutdown) => {
                runner.handle_event(&HostEvent::System(SystemEvent::Shutdown));
                info!(target: "scripting", "Tick loop shutting down at tick {}", runner.current_tick());
                return ControlFlow::Break(());
            }
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                debug!(target: "scripting", "All command senders dropped, stopping tick loop");
                return ControlFlow::Break(());
            }
        }
    }

    ControlFlow::Continue(())
}
