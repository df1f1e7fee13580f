/// Core event types for lifts
///
/// This crate provides the event vocabulary shared by the scripting host and
/// the scripts it runs, so neither depends on the other for it.
use serde::{Deserialize, Serialize};

pub mod geometry;
pub mod ids;
pub mod system_events;
pub mod world_events;

pub use geometry::{AIR, Block, BlockPos, HeightRange, Vec3};
pub use ids::{DimensionId, EntityId};
pub use system_events::SystemEvent;
pub use world_events::{SpawnCause, WorldEvent};

// ============================================================================
// Event Types
// ============================================================================

/// Unified event type delivered to scripts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HostEvent {
    World(WorldEvent),
    System(SystemEvent),
}

impl From<WorldEvent> for HostEvent {
    fn from(event: WorldEvent) -> Self {
        HostEvent::World(event)
    }
}

impl From<SystemEvent> for HostEvent {
    fn from(event: SystemEvent) -> Self {
        HostEvent::System(event)
    }
}
