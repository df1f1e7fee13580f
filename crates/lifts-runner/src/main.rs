use tracing::{info, warn};

use lifts_runner::{init_logging, run_host};
use lifts_scripting_host::{LiftsConfig, MemoryWorld};

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, stopping"),
        Err(e) => {
            warn!("Ctrl-C handler unavailable ({}), running until killed", e);
            std::future::pending::<()>().await
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = LiftsConfig::load_or_default()?;
    let _log_guard = init_logging("lifts", &config.logging)?;

    info!("Starting lifts host on an offline world...");
    let runner = run_host(MemoryWorld::new(), &config, ctrl_c()).await;
    info!("Stopped after {} ticks", runner.current_tick());

    Ok(())
}
