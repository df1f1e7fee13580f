/// Colored elevator blocks for the lifts scripting host
///
/// Standing on an elevator starts a ride session; jumping or crouching
/// teleports the player to the next elevator of the same color directly
/// above or below. Dropping the seed item onto wool turns it into an elevator.
use lifts_scripting_host::{Script, ScriptRegistry};

pub mod blocks;
pub mod config;
pub mod controller;
pub mod scan;
pub mod script;
pub mod seed;
pub mod session;

pub use blocks::{Color, TransitBlock};
pub use config::ElevatorConfig;
pub use controller::{EndReason, PollOutcome, SESSION_HANDLE_PROPERTY, TransitController};
pub use scan::{ScanOutcome, StopReason, TransitDirection, scan_column};
pub use script::ElevatorScript;
pub use seed::{Conversion, SeedWatcher};
pub use session::{RideSession, SessionRegistry};

/// Script id used in `disabled_scripts` and the `[scripting.config]` table
pub const SCRIPT_ID: &str = "elevator";

/// Build the elevator script from its `[scripting.config.elevator]` table
pub fn create_script(config: Option<&toml::Value>) -> anyhow::Result<Box<dyn Script>> {
    let config = ElevatorConfig::from_toml(config)?;
    Ok(Box::new(ElevatorScript::new(config)))
}

/// Add the elevator script to a registry
pub fn register(registry: &mut ScriptRegistry) {
    registry.register(SCRIPT_ID, create_script);
}
