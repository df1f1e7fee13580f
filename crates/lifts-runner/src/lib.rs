/// Runs lifts scripts against a world at a fixed tick rate
pub mod host;
pub mod logging;
pub mod reload;
pub mod tick_loop;

pub use host::run_host;
pub use logging::init_logging;
pub use reload::setup_reload_signal;
pub use tick_loop::{HostCommand, MAX_COMMANDS_PER_TICK, run_tick_loop};

use lifts_scripting_host::ScriptRegistry;

/// Registry holding every script this distribution ships
pub fn default_registry() -> ScriptRegistry {
    let mut registry = ScriptRegistry::new();
    lifts_elevator::register(&mut registry);
    registry
}
