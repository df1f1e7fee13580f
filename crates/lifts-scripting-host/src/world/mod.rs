use serde::{Deserialize, Serialize};

use crate::error::WorldResult;
use lifts_events::{Block, BlockPos, DimensionId, EntityId, HeightRange, Vec3};

pub mod memory;

pub use memory::{Effect, MemoryWorld};

/// What kind of entity an id refers to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    /// Dropped item entity holding a stack
    Item { type_id: String, amount: u32 },
    /// Any other entity, by type id
    Other(String),
}

impl EntityKind {
    pub fn is_player(&self) -> bool {
        matches!(self, EntityKind::Player)
    }
}

/// Movement input held by a player this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerInput {
    pub jumping: bool,
    pub sneaking: bool,
}

/// Value stored in an entity's dynamic properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DynamicValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

/// Molang variable value passed to particle effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MolangValue {
    Float(f32),
    Vector3(Vec3),
}

/// Named variables handed to a particle emitter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MolangVariables {
    values: Vec<(String, MolangValue)>,
}

impl MolangVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_float(mut self, name: impl Into<String>, value: f32) -> Self {
        self.set(name.into(), MolangValue::Float(value));
        self
    }

    pub fn with_vector3(mut self, name: impl Into<String>, value: Vec3) -> Self {
        self.set(name.into(), MolangValue::Vector3(value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&MolangValue> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    fn set(&mut self, name: String, value: MolangValue) {
        match self.values.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
    }
}

/// The query/mutate surface of the game world that scripts run against.
///
/// Block queries return `Ok(None)` when the position is outside the loaded
/// area or the dimension's height range, matching how the host reports
/// "no block" rather than throwing. Mutations may fail with
/// [`WorldError::UnloadedChunk`](crate::WorldError::UnloadedChunk).
pub trait World {
    // ===== Blocks =====

    fn block(&self, dimension: &DimensionId, pos: BlockPos) -> WorldResult<Option<Block>>;

    fn set_block_type(
        &mut self,
        dimension: &DimensionId,
        pos: BlockPos,
        type_id: &str,
    ) -> WorldResult<()>;

    fn height_range(&self, dimension: &DimensionId) -> HeightRange;

    // ===== Effects =====

    fn spawn_particle(
        &mut self,
        dimension: &DimensionId,
        effect: &str,
        location: Vec3,
        variables: &MolangVariables,
    ) -> WorldResult<()>;

    fn play_sound(
        &mut self,
        dimension: &DimensionId,
        sound: &str,
        location: Vec3,
        volume: f32,
    ) -> WorldResult<()>;

    // ===== Entities =====

    /// False once the entity was removed or its player disconnected
    fn is_valid(&self, entity: EntityId) -> bool;

    fn entity_kind(&self, entity: EntityId) -> Option<EntityKind>;

    fn entity_location(&self, entity: EntityId) -> WorldResult<Vec3>;

    fn entity_dimension(&self, entity: EntityId) -> WorldResult<DimensionId>;

    fn entity_velocity(&self, entity: EntityId) -> WorldResult<Vec3>;

    fn player_input(&self, player: EntityId) -> WorldResult<PlayerInput>;

    fn teleport(&mut self, entity: EntityId, location: Vec3) -> WorldResult<()>;

    fn remove_entity(&mut self, entity: EntityId) -> WorldResult<()>;

    /// Every connected player
    fn players(&self) -> Vec<EntityId>;

    fn players_near(
        &self,
        dimension: &DimensionId,
        location: Vec3,
        max_distance: f64,
    ) -> Vec<EntityId>;

    // ===== Dynamic properties =====

    fn dynamic_property(&self, entity: EntityId, key: &str) -> WorldResult<Option<DynamicValue>>;

    /// `None` clears the property
    fn set_dynamic_property(
        &mut self,
        entity: EntityId,
        key: &str,
        value: Option<DynamicValue>,
    ) -> WorldResult<()>;

    // ===== Provided =====

    /// The block an entity is standing on, derived from its floored location
    fn block_under(&self, entity: EntityId) -> WorldResult<Option<Block>> {
        let dimension = self.entity_dimension(entity)?;
        let location = self.entity_location(entity)?;
        self.block(&dimension, location.standing_on())
    }

    fn is_player(&self, entity: EntityId) -> bool {
        self.entity_kind(entity).is_some_and(|kind| kind.is_player())
    }
}
