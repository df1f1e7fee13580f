/// Host runtime for running lifts scripts
///
/// This crate provides the runtime that dispatches world events to scripts,
/// drives their tick handlers, and gives them a scheduler and a world to act on.
use lifts_events::{HostEvent, SystemEvent, WorldEvent};
use std::any::Any;

pub mod config;
pub mod context;
pub mod error;
pub mod registry;
pub mod scheduler;
pub mod script_runner;
pub mod world;

pub use config::{ConfigLoadError, LiftsConfig, LoggingConfig, ScriptingConfig};
pub use context::ScriptContext;
pub use error::{WorldError, WorldResult};
pub use registry::{ScriptFactory, ScriptRegistry, create_runner_from_config};
pub use scheduler::{RunId, Scheduler};
pub use script_runner::ScriptRunner;
pub use world::{
    DynamicValue, Effect, EntityKind, MemoryWorld, MolangValue, MolangVariables, PlayerInput,
    World,
};

/// Trait that scripts must implement
pub trait Script: Send + 'static {
    /// Unique identifier for this script (e.g., "elevator")
    fn id(&self) -> &'static str;

    /// Human-readable name for this script
    fn name(&self) -> &'static str;

    /// Description of what this script does
    fn description(&self) -> &'static str;

    /// Called when the script is first loaded
    fn on_load(&mut self, ctx: &mut ScriptContext<'_>);

    /// Called when the script is being unloaded
    fn on_unload(&mut self, ctx: &mut ScriptContext<'_>);

    /// Return the list of events this script wants to receive
    fn subscribed_events(&self) -> &[EventFilter];

    /// Handle an event that matches one of the subscribed filters
    fn on_event(&mut self, event: &HostEvent, ctx: &mut ScriptContext<'_>);

    /// Called once per host tick, after the scheduler advanced. Runs that
    /// fired this tick can be checked with [`ScriptContext::check_run`].
    fn on_tick(&mut self, ctx: &mut ScriptContext<'_>);

    /// Allow downcasting to concrete script type for state access
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Filter for subscribing to specific events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFilter {
    /// Subscribe to all events
    All,

    // World events
    EntitySpawned,
    StepOn,
    StepOff,
    BlockDestroyed,
    BlockTick,
    PlayerSpawned,
    PlayerLeaving,
    EntityDied,

    // System events
    WorldInitialize,
    Shutdown,
}

impl EventFilter {
    /// Check if this filter matches the given event
    pub fn matches(&self, event: &HostEvent) -> bool {
        match self {
            EventFilter::All => true,

            EventFilter::EntitySpawned => {
                matches!(event, HostEvent::World(WorldEvent::EntitySpawned { .. }))
            }
            EventFilter::StepOn => matches!(event, HostEvent::World(WorldEvent::StepOn { .. })),
            EventFilter::StepOff => matches!(event, HostEvent::World(WorldEvent::StepOff { .. })),
            EventFilter::BlockDestroyed => {
                matches!(event, HostEvent::World(WorldEvent::BlockDestroyed { .. }))
            }
            EventFilter::BlockTick => {
                matches!(event, HostEvent::World(WorldEvent::BlockTick { .. }))
            }
            EventFilter::PlayerSpawned => {
                matches!(event, HostEvent::World(WorldEvent::PlayerSpawned { .. }))
            }
            EventFilter::PlayerLeaving => {
                matches!(event, HostEvent::World(WorldEvent::PlayerLeaving { .. }))
            }
            EventFilter::EntityDied => {
                matches!(event, HostEvent::World(WorldEvent::EntityDied { .. }))
            }

            EventFilter::WorldInitialize => {
                matches!(event, HostEvent::System(SystemEvent::WorldInitialize))
            }
            EventFilter::Shutdown => matches!(event, HostEvent::System(SystemEvent::Shutdown)),
        }
    }
}
