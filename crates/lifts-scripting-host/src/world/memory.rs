use std::collections::{BTreeMap, HashMap, HashSet};

use super::{DynamicValue, EntityKind, MolangVariables, PlayerInput, World};
use crate::error::{WorldError, WorldResult};
use lifts_events::{AIR, Block, BlockPos, DimensionId, EntityId, HeightRange, Vec3};

/// Something a script did to the world that a player would see or hear
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Sound {
        dimension: DimensionId,
        sound: String,
        location: Vec3,
        volume: f32,
    },
    Particle {
        dimension: DimensionId,
        effect: String,
        location: Vec3,
        variables: MolangVariables,
    },
    Teleport {
        entity: EntityId,
        from: Vec3,
        to: Vec3,
    },
    BlockChanged {
        dimension: DimensionId,
        pos: BlockPos,
        from: String,
        to: String,
    },
    EntityRemoved {
        entity: EntityId,
    },
}

#[derive(Debug, Default)]
struct DimensionState {
    height: HeightRange,
    blocks: HashMap<BlockPos, String>,
    unloaded_chunks: HashSet<(i32, i32)>,
    unloaded_blocks: HashSet<BlockPos>,
    failing_blocks: HashMap<BlockPos, String>,
    failing_effects: HashMap<BlockPos, String>,
}

impl DimensionState {
    fn is_loaded(&self, pos: BlockPos) -> bool {
        !self.unloaded_chunks.contains(&pos.chunk()) && !self.unloaded_blocks.contains(&pos)
    }
}

#[derive(Debug)]
struct EntityState {
    kind: EntityKind,
    dimension: DimensionId,
    location: Vec3,
    velocity: Vec3,
    input: PlayerInput,
    properties: HashMap<String, DynamicValue>,
}

/// In-memory world for tests and offline runs.
///
/// Unset positions inside a loaded area read as air. Positions can be
/// unloaded one at a time or by chunk column, and block queries can be
/// made to fail outright to mimic unexpected host exceptions, as can
/// sounds and particles at a position.
#[derive(Debug)]
pub struct MemoryWorld {
    dimensions: HashMap<DimensionId, DimensionState>,
    entities: BTreeMap<EntityId, EntityState>,
    next_entity: u64,
    effects: Vec<Effect>,
}

impl MemoryWorld {
    /// Create a world containing only the overworld
    pub fn new() -> Self {
        let mut world = Self {
            dimensions: HashMap::new(),
            entities: BTreeMap::new(),
            next_entity: 1,
            effects: Vec::new(),
        };
        world.add_dimension(DimensionId::overworld(), HeightRange::OVERWORLD);
        world
    }

    pub fn add_dimension(&mut self, dimension: DimensionId, height: HeightRange) {
        self.dimensions.insert(
            dimension,
            DimensionState {
                height,
                ..Default::default()
            },
        );
    }

    // ===== Setup =====

    /// Place a block without recording an effect
    pub fn set_block(&mut self, dimension: &DimensionId, pos: BlockPos, type_id: &str) {
        if let Some(state) = self.dimensions.get_mut(dimension) {
            state.blocks.insert(pos, type_id.to_string());
        }
    }

    pub fn unload_chunk(&mut self, dimension: &DimensionId, chunk: (i32, i32)) {
        if let Some(state) = self.dimensions.get_mut(dimension) {
            state.unloaded_chunks.insert(chunk);
        }
    }

    pub fn load_chunk(&mut self, dimension: &DimensionId, chunk: (i32, i32)) {
        if let Some(state) = self.dimensions.get_mut(dimension) {
            state.unloaded_chunks.remove(&chunk);
        }
    }

    pub fn unload_block(&mut self, dimension: &DimensionId, pos: BlockPos) {
        if let Some(state) = self.dimensions.get_mut(dimension) {
            state.unloaded_blocks.insert(pos);
        }
    }

    /// Make every query of `pos` fail with a host error
    pub fn fail_block_query(&mut self, dimension: &DimensionId, pos: BlockPos, message: &str) {
        if let Some(state) = self.dimensions.get_mut(dimension) {
            state.failing_blocks.insert(pos, message.to_string());
        }
    }

    /// Make sounds and particles at `pos` fail with a host error
    pub fn fail_effects(&mut self, dimension: &DimensionId, pos: BlockPos, message: &str) {
        if let Some(state) = self.dimensions.get_mut(dimension) {
            state.failing_effects.insert(pos, message.to_string());
        }
    }

    pub fn spawn_player(&mut self, dimension: &DimensionId, location: Vec3) -> EntityId {
        self.spawn_entity(EntityKind::Player, dimension, location)
    }

    pub fn spawn_item(
        &mut self,
        dimension: &DimensionId,
        location: Vec3,
        type_id: &str,
        amount: u32,
    ) -> EntityId {
        let kind = EntityKind::Item {
            type_id: type_id.to_string(),
            amount,
        };
        self.spawn_entity(kind, dimension, location)
    }

    pub fn spawn_entity(
        &mut self,
        kind: EntityKind,
        dimension: &DimensionId,
        location: Vec3,
    ) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        self.entities.insert(
            id,
            EntityState {
                kind,
                dimension: dimension.clone(),
                location,
                velocity: Vec3::ZERO,
                input: PlayerInput::default(),
                properties: HashMap::new(),
            },
        );
        id
    }

    pub fn set_input(&mut self, player: EntityId, input: PlayerInput) {
        if let Some(state) = self.entities.get_mut(&player) {
            state.input = input;
        }
    }

    pub fn set_velocity(&mut self, entity: EntityId, velocity: Vec3) {
        if let Some(state) = self.entities.get_mut(&entity) {
            state.velocity = velocity;
        }
    }

    /// Move an entity the way normal movement would, without a teleport effect
    pub fn move_entity(&mut self, entity: EntityId, location: Vec3) {
        if let Some(state) = self.entities.get_mut(&entity) {
            state.location = location;
        }
    }

    /// Drop a player (or any entity) from the world without an effect
    pub fn disconnect(&mut self, entity: EntityId) {
        self.entities.remove(&entity);
    }

    // ===== Inspection =====

    pub fn block_type(&self, dimension: &DimensionId, pos: BlockPos) -> Option<&str> {
        let state = self.dimensions.get(dimension)?;
        Some(state.blocks.get(&pos).map(String::as_str).unwrap_or(AIR))
    }

    pub fn location_of(&self, entity: EntityId) -> Option<Vec3> {
        self.entities.get(&entity).map(|state| state.location)
    }

    pub fn property(&self, entity: EntityId, key: &str) -> Option<&DynamicValue> {
        self.entities.get(&entity)?.properties.get(key)
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn sounds(&self) -> Vec<&Effect> {
        self.effects
            .iter()
            .filter(|effect| matches!(effect, Effect::Sound { .. }))
            .collect()
    }

    pub fn particles(&self) -> Vec<&Effect> {
        self.effects
            .iter()
            .filter(|effect| matches!(effect, Effect::Particle { .. }))
            .collect()
    }

    pub fn teleports(&self) -> Vec<&Effect> {
        self.effects
            .iter()
            .filter(|effect| matches!(effect, Effect::Teleport { .. }))
            .collect()
    }

    // ===== Helpers =====

    fn dimension(&self, dimension: &DimensionId) -> WorldResult<&DimensionState> {
        self.dimensions
            .get(dimension)
            .ok_or_else(|| WorldError::Host(format!("Unknown dimension {}", dimension)))
    }

    fn entity(&self, entity: EntityId) -> WorldResult<&EntityState> {
        self.entities
            .get(&entity)
            .ok_or(WorldError::InvalidEntity(entity))
    }

    fn entity_mut(&mut self, entity: EntityId) -> WorldResult<&mut EntityState> {
        self.entities
            .get_mut(&entity)
            .ok_or(WorldError::InvalidEntity(entity))
    }

    fn ensure_loaded(&self, dimension: &DimensionId, location: Vec3) -> WorldResult<()> {
        let pos = location.floor();
        let state = self.dimension(dimension)?;
        if let Some(message) = state.failing_effects.get(&pos) {
            return Err(WorldError::Host(message.clone()));
        }
        if state.is_loaded(pos) {
            Ok(())
        } else {
            Err(WorldError::UnloadedChunk {
                dimension: dimension.clone(),
                pos,
            })
        }
    }
}

impl Default for MemoryWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl World for MemoryWorld {
    fn block(&self, dimension: &DimensionId, pos: BlockPos) -> WorldResult<Option<Block>> {
        let state = self.dimension(dimension)?;

        if let Some(message) = state.failing_blocks.get(&pos) {
            return Err(WorldError::Host(message.clone()));
        }

        if !state.height.contains(pos.y) || !state.is_loaded(pos) {
            return Ok(None);
        }

        let type_id = state.blocks.get(&pos).map(String::as_str).unwrap_or(AIR);
        Ok(Some(Block::new(pos, type_id)))
    }

    fn set_block_type(
        &mut self,
        dimension: &DimensionId,
        pos: BlockPos,
        type_id: &str,
    ) -> WorldResult<()> {
        let state = self
            .dimensions
            .get_mut(dimension)
            .ok_or_else(|| WorldError::Host(format!("Unknown dimension {}", dimension)))?;

        if !state.is_loaded(pos) {
            return Err(WorldError::UnloadedChunk {
                dimension: dimension.clone(),
                pos,
            });
        }
        if !state.height.contains(pos.y) {
            return Err(WorldError::Host(format!("{} is outside the build height", pos)));
        }

        let from = state
            .blocks
            .insert(pos, type_id.to_string())
            .unwrap_or_else(|| AIR.to_string());

        self.effects.push(Effect::BlockChanged {
            dimension: dimension.clone(),
            pos,
            from,
            to: type_id.to_string(),
        });
        Ok(())
    }

    fn height_range(&self, dimension: &DimensionId) -> HeightRange {
        self.dimensions
            .get(dimension)
            .map(|state| state.height)
            .unwrap_or_default()
    }

    fn spawn_particle(
        &mut self,
        dimension: &DimensionId,
        effect: &str,
        location: Vec3,
        variables: &MolangVariables,
    ) -> WorldResult<()> {
        self.ensure_loaded(dimension, location)?;
        self.effects.push(Effect::Particle {
            dimension: dimension.clone(),
            effect: effect.to_string(),
            location,
            variables: variables.clone(),
        });
        Ok(())
    }

    fn play_sound(
        &mut self,
        dimension: &DimensionId,
        sound: &str,
        location: Vec3,
        volume: f32,
    ) -> WorldResult<()> {
        self.ensure_loaded(dimension, location)?;
        self.effects.push(Effect::Sound {
            dimension: dimension.clone(),
            sound: sound.to_string(),
            location,
            volume,
        });
        Ok(())
    }

    fn is_valid(&self, entity: EntityId) -> bool {
        self.entities.contains_key(&entity)
    }

    fn entity_kind(&self, entity: EntityId) -> Option<EntityKind> {
        self.entities.get(&entity).map(|state| state.kind.clone())
    }

    fn entity_location(&self, entity: EntityId) -> WorldResult<Vec3> {
        Ok(self.entity(entity)?.location)
    }

    fn entity_dimension(&self, entity: EntityId) -> WorldResult<DimensionId> {
        Ok(self.entity(entity)?.dimension.clone())
    }

    fn entity_velocity(&self, entity: EntityId) -> WorldResult<Vec3> {
        Ok(self.entity(entity)?.velocity)
    }

    fn player_input(&self, player: EntityId) -> WorldResult<PlayerInput> {
        let state = self.entity(player)?;
        if !state.kind.is_player() {
            return Err(WorldError::Host(format!("{} is not a player", player)));
        }
        Ok(state.input)
    }

    fn teleport(&mut self, entity: EntityId, location: Vec3) -> WorldResult<()> {
        let state = self.entity_mut(entity)?;
        let from = std::mem::replace(&mut state.location, location);
        self.effects.push(Effect::Teleport {
            entity,
            from,
            to: location,
        });
        Ok(())
    }

    fn remove_entity(&mut self, entity: EntityId) -> WorldResult<()> {
        self.entities
            .remove(&entity)
            .ok_or(WorldError::InvalidEntity(entity))?;
        self.effects.push(Effect::EntityRemoved { entity });
        Ok(())
    }

    fn players(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, state)| state.kind.is_player())
            .map(|(id, _)| *id)
            .collect()
    }

    fn players_near(
        &self,
        dimension: &DimensionId,
        location: Vec3,
        max_distance: f64,
    ) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, state)| {
                state.kind.is_player()
                    && state.dimension == *dimension
                    && state.location.distance(location) <= max_distance
            })
            .map(|(id, _)| *id)
            .collect()
    }

    fn dynamic_property(&self, entity: EntityId, key: &str) -> WorldResult<Option<DynamicValue>> {
        Ok(self.entity(entity)?.properties.get(key).cloned())
    }

    fn set_dynamic_property(
        &mut self,
        entity: EntityId,
        key: &str,
        value: Option<DynamicValue>,
    ) -> WorldResult<()> {
        let state = self.entity_mut(entity)?;
        match value {
            Some(value) => {
                state.properties.insert(key.to_string(), value);
            }
            None => {
                state.properties.remove(key);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overworld() -> DimensionId {
        DimensionId::overworld()
    }

    #[test]
    fn test_unset_block_reads_as_air() {
        let world = MemoryWorld::new();
        let block = world
            .block(&overworld(), BlockPos::new(0, 64, 0))
            .unwrap()
            .unwrap();
        assert!(block.is_air());
    }

    #[test]
    fn test_unloaded_block_reads_as_missing() {
        let mut world = MemoryWorld::new();
        let pos = BlockPos::new(10, 67, 10);
        world.set_block(&overworld(), pos, "minecraft:stone");
        world.unload_block(&overworld(), pos);

        assert_eq!(world.block(&overworld(), pos).unwrap(), None);
        // Neighbours in the same chunk are still loaded
        assert!(world.block(&overworld(), pos.below()).unwrap().is_some());
    }

    #[test]
    fn test_unloaded_chunk_rejects_effects() {
        let mut world = MemoryWorld::new();
        world.unload_chunk(&overworld(), (0, 0));

        let err = world
            .spawn_particle(
                &overworld(),
                "test:particle",
                Vec3::new(1.0, 65.0, 1.0),
                &MolangVariables::new(),
            )
            .unwrap_err();
        assert!(err.is_transient());
        assert!(world.effects().is_empty());

        world.load_chunk(&overworld(), (0, 0));
        world
            .play_sound(&overworld(), "test:sound", Vec3::new(1.0, 65.0, 1.0), 1.0)
            .unwrap();
        assert_eq!(world.sounds().len(), 1);
    }

    #[test]
    fn test_failing_effects_are_not_transient() {
        let mut world = MemoryWorld::new();
        world.fail_effects(&overworld(), BlockPos::new(0, 65, 0), "boom");

        let err = world
            .play_sound(&overworld(), "test:sound", Vec3::new(0.5, 65.0, 0.5), 1.0)
            .unwrap_err();
        assert!(!err.is_transient());
        world
            .play_sound(&overworld(), "test:sound", Vec3::new(1.5, 65.0, 0.5), 1.0)
            .unwrap();
        assert_eq!(world.sounds().len(), 1);
    }

    #[test]
    fn test_height_range_limits_queries() {
        let world = MemoryWorld::new();
        assert_eq!(world.block(&overworld(), BlockPos::new(0, 320, 0)).unwrap(), None);
        assert!(world.block(&overworld(), BlockPos::new(0, -64, 0)).unwrap().is_some());
    }

    #[test]
    fn test_failing_query_is_not_transient() {
        let mut world = MemoryWorld::new();
        let pos = BlockPos::new(0, 70, 0);
        world.fail_block_query(&overworld(), pos, "boom");

        let err = world.block(&overworld(), pos).unwrap_err();
        assert!(!err.is_transient());
    }

    #[test]
    fn test_teleport_records_effect() {
        let mut world = MemoryWorld::new();
        let player = world.spawn_player(&overworld(), Vec3::new(0.5, 65.0, 0.5));

        world.teleport(player, Vec3::new(0.5, 80.5, 0.5)).unwrap();

        assert_eq!(world.location_of(player), Some(Vec3::new(0.5, 80.5, 0.5)));
        assert_eq!(world.teleports().len(), 1);
    }

    #[test]
    fn test_disconnected_player_is_invalid() {
        let mut world = MemoryWorld::new();
        let player = world.spawn_player(&overworld(), Vec3::new(0.5, 65.0, 0.5));
        world.disconnect(player);

        assert!(!world.is_valid(player));
        assert_eq!(
            world.entity_location(player),
            Err(WorldError::InvalidEntity(player))
        );
        assert!(world.players().is_empty());
    }

    #[test]
    fn test_dynamic_property_set_and_clear() {
        let mut world = MemoryWorld::new();
        let player = world.spawn_player(&overworld(), Vec3::ZERO);

        world
            .set_dynamic_property(player, "key", Some(DynamicValue::Number(3.0)))
            .unwrap();
        assert_eq!(world.property(player, "key"), Some(&DynamicValue::Number(3.0)));

        world.set_dynamic_property(player, "key", None).unwrap();
        assert_eq!(world.property(player, "key"), None);
    }

    #[test]
    fn test_players_near_filters_by_distance_and_dimension() {
        let mut world = MemoryWorld::new();
        world.add_dimension(DimensionId::new(DimensionId::NETHER), HeightRange::NETHER);
        let near = world.spawn_player(&overworld(), Vec3::new(1.0, 65.0, 1.0));
        let _far = world.spawn_player(&overworld(), Vec3::new(30.0, 65.0, 1.0));
        let _other = world.spawn_player(
            &DimensionId::new(DimensionId::NETHER),
            Vec3::new(1.0, 65.0, 1.0),
        );

        let found = world.players_near(&overworld(), Vec3::new(1.0, 64.0, 1.0), 2.0);
        assert_eq!(found, vec![near]);
    }
}
