use std::future::Future;

use tokio::sync::mpsc;
use tracing::{info, warn};

use lifts_scripting_host::{LiftsConfig, ScriptRunner, World, create_runner_from_config};

use crate::default_registry;
use crate::reload::setup_reload_signal;
use crate::tick_loop::{HostCommand, run_tick_loop};

/// Host the shipped scripts on `world` until `shutdown` resolves.
///
/// SIGUSR2 rebuilds the scripts while the host is up. Returns the runner
/// after scripts have seen `Shutdown`.
pub async fn run_host<W: World>(
    world: W,
    config: &LiftsConfig,
    shutdown: impl Future<Output = ()>,
) -> ScriptRunner<W> {
    let registry = default_registry();
    let runner = create_runner_from_config(world, &registry, &config.scripting);
    info!(target: "scripting", "Hosting {} script(s)", runner.script_count());

    let (commands, receiver) = mpsc::unbounded_channel();
    let reload = setup_reload_signal(commands.clone());

    let stop = async move {
        shutdown.await;
        if commands.send(HostCommand::Shutdown).is_err() {
            warn!(target: "scripting", "Tick loop already stopped");
        }
    };

    let (runner, ()) = tokio::join!(
        run_tick_loop(runner, &registry, &config.scripting, receiver),
        stop
    );

    // Exits on its own once the loop's receiver is gone
    if let Err(e) = reload.await {
        warn!(target: "scripting", "Reload signal task failed: {}", e);
    }

    runner
}
