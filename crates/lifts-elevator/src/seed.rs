use tracing::{debug, warn};

use crate::blocks::{self, CAULDRON, TransitBlock};
use crate::config::ElevatorConfig;
use crate::controller::log_world_error;
use lifts_events::{Block, EntityId, SpawnCause, Vec3};
use lifts_scripting_host::{EntityKind, MolangVariables, RunId, ScriptContext, World};

const BURST_PARTICLES: [&str; 2] = ["minecraft:portal_north_south", "minecraft:portal_east_west"];
const BURST_PARTICLE_COUNT: f32 = 200.0;
/// Players this close to a fresh elevator are checked for standing on it
const MOUNT_SEARCH_RADIUS: f64 = 2.0;

/// A dropped seed item being watched until it comes to rest
#[derive(Debug)]
struct SeedWatch {
    item: EntityId,
    run: RunId,
    cauldron_ticks: u32,
}

/// A wool block that just became an elevator, and who is standing on it
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub block: TransitBlock,
    pub players: Vec<EntityId>,
}

impl Conversion {
    pub fn as_block(&self) -> Block {
        Block::new(self.block.pos, self.block.type_id())
    }
}

enum Rest {
    /// Still falling, or resting on air or a cauldron within its grace
    Waiting,
    /// Stop watching without converting
    Abandon,
    /// Came to rest on this block
    On(Block),
}

/// Watches dropped seed items and converts the wool they land on
#[derive(Debug, Default)]
pub struct SeedWatcher {
    watches: Vec<SeedWatch>,
}

impl SeedWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watching(&self) -> usize {
        self.watches.len()
    }

    /// Start watching a newly spawned entity if it is a dropped seed item
    pub fn on_spawn(
        &mut self,
        ctx: &mut ScriptContext<'_>,
        config: &ElevatorConfig,
        entity: EntityId,
        cause: SpawnCause,
    ) {
        if cause != SpawnCause::Spawned {
            return;
        }

        match ctx.world().entity_kind(entity) {
            Some(EntityKind::Item { type_id, .. }) if type_id == config.seed_item => {}
            _ => return,
        }

        let run = ctx.run_interval(1, "elevator:seed");
        self.watches.push(SeedWatch {
            item: entity,
            run,
            cauldron_ticks: 0,
        });
        debug!(target: "elevator", "Watching seed {}", entity);
    }

    /// Check every seed whose run fired. Returns the conversions made.
    pub fn tick(&mut self, ctx: &mut ScriptContext<'_>, config: &ElevatorConfig) -> Vec<Conversion> {
        let mut conversions = Vec::new();

        self.watches.retain_mut(|watch| {
            if !ctx.check_run(watch.run) {
                return true;
            }

            match resting_on(ctx.world(), watch, config) {
                Rest::Waiting => true,
                Rest::Abandon => {
                    ctx.clear_run(watch.run);
                    false
                }
                Rest::On(block) => {
                    ctx.clear_run(watch.run);
                    if let Some(conversion) = convert(ctx, watch.item, &block) {
                        conversions.push(conversion);
                    }
                    false
                }
            }
        });

        conversions
    }

    pub fn release(&mut self, ctx: &mut ScriptContext<'_>) {
        for watch in self.watches.drain(..) {
            ctx.clear_run(watch.run);
        }
    }
}

/// The item has come to rest once its vertical velocity is exactly zero and
/// the block beneath it is loaded, solid, and not a cauldron.
fn resting_on(world: &dyn World, watch: &mut SeedWatch, config: &ElevatorConfig) -> Rest {
    if !world.is_valid(watch.item) {
        return Rest::Abandon;
    }

    let (velocity, dimension, location) = match (
        world.entity_velocity(watch.item),
        world.entity_dimension(watch.item),
        world.entity_location(watch.item),
    ) {
        (Ok(velocity), Ok(dimension), Ok(location)) => (velocity, dimension, location),
        _ => return Rest::Abandon,
    };

    if velocity.y != 0.0 {
        return Rest::Waiting;
    }

    let block = match world.block(&dimension, location.floor().below()) {
        Ok(Some(block)) => block,
        Ok(None) => return Rest::Abandon,
        Err(e) => {
            log_world_error("checking under a seed", &e);
            return Rest::Abandon;
        }
    };

    if block.is_air() {
        return Rest::Waiting;
    }

    if block.type_id == CAULDRON {
        if watch.cauldron_ticks > config.cauldron_grace_ticks {
            return Rest::Abandon;
        }
        watch.cauldron_ticks += 1;
        return Rest::Waiting;
    }

    Rest::On(block)
}

fn convert(ctx: &mut ScriptContext<'_>, item: EntityId, block: &Block) -> Option<Conversion> {
    let color = blocks::convertible_color(&block.type_id)?;
    let dimension = ctx.world().entity_dimension(item).ok()?;

    if let Err(e) = ctx.world_mut().remove_entity(item) {
        warn!(target: "elevator", "Could not consume seed {}: {}", item, e);
        return None;
    }

    let transit = TransitBlock {
        dimension: dimension.clone(),
        pos: block.pos,
        color,
    };

    if let Err(e) = ctx
        .world_mut()
        .set_block_type(&dimension, block.pos, &transit.type_id())
    {
        log_world_error("placing an elevator", &e);
        return None;
    }

    let burst = MolangVariables::new().with_float("variable.num_particles", BURST_PARTICLE_COUNT);
    let center = block.pos.center();
    for effect in BURST_PARTICLES {
        if let Err(e) = ctx
            .world_mut()
            .spawn_particle(&dimension, effect, center, &burst)
        {
            log_world_error("spawning elevator particles", &e);
        }
    }

    let players = players_on(ctx.world(), &transit);
    debug!(target: "elevator", "Converted {} into {} at {}", block.type_id, transit.type_id(), block.pos);

    Some(Conversion { block: transit, players })
}

fn players_on(world: &dyn World, transit: &TransitBlock) -> Vec<EntityId> {
    world
        .players_near(&transit.dimension, transit.pos.corner(), MOUNT_SEARCH_RADIUS)
        .into_iter()
        .filter(|player| {
            world
                .entity_location(*player)
                .is_ok_and(|location: Vec3| location.standing_on() == transit.pos)
        })
        .collect()
}
