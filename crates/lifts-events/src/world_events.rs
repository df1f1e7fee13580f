use serde::{Deserialize, Serialize};

use crate::geometry::Block;
use crate::ids::{DimensionId, EntityId};

/// Why an entity entered the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnCause {
    /// Newly created (dropped items, summoned mobs)
    Spawned,
    /// Bred from two parents
    Born,
    /// Restored from a saved chunk
    Loaded,
    /// Created by an in-game event
    Event,
    /// Converted from another entity
    Transformed,
}

/// Events the host dispatches from the game world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WorldEvent {
    /// An entity entered the world
    EntitySpawned { entity: EntityId, cause: SpawnCause },
    /// An entity stepped onto a block that reports step events
    StepOn {
        entity: EntityId,
        dimension: DimensionId,
        block: Block,
    },
    /// An entity stepped off a block that reports step events
    StepOff {
        entity: EntityId,
        dimension: DimensionId,
        block: Block,
    },
    /// A block that reports destruction was broken, by a player if known
    BlockDestroyed {
        player: Option<EntityId>,
        dimension: DimensionId,
        block: Block,
    },
    /// Periodic tick for a block that requested ticking
    BlockTick { dimension: DimensionId, block: Block },
    /// A player spawned; `initial_spawn` is true only for the join spawn
    PlayerSpawned {
        player: EntityId,
        initial_spawn: bool,
    },
    /// A player is about to disconnect
    PlayerLeaving { player: EntityId },
    /// An entity died
    EntityDied { entity: EntityId },
}
