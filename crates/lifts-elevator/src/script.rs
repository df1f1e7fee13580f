use std::any::Any;

use tracing::{debug, info};

use crate::blocks;
use crate::config::ElevatorConfig;
use crate::controller::{TransitController, elevator_under, log_world_error};
use crate::seed::SeedWatcher;
use lifts_events::{Block, DimensionId, HostEvent, SystemEvent, Vec3, WorldEvent};
use lifts_scripting_host::{EventFilter, MolangVariables, Script, ScriptContext};

/// Ambient particle drawn above every elevator on each block tick
const AMBIENT_PARTICLE: &str = "bt:e.portal_reverse";

/// Elevator script: wires host events to the transit controller and the
/// seed watcher.
pub struct ElevatorScript {
    config: ElevatorConfig,
    controller: TransitController,
    seeds: SeedWatcher,
    ambient: MolangVariables,
}

impl ElevatorScript {
    pub fn new(config: ElevatorConfig) -> Self {
        Self {
            controller: TransitController::new(config.clone()),
            seeds: SeedWatcher::new(),
            ambient: MolangVariables::new()
                .with_vector3("variable.direction", Vec3::new(0.25, 1.0, 0.25))
                .with_float("variable.speed", 0.2),
            config,
        }
    }

    pub fn controller(&self) -> &TransitController {
        &self.controller
    }

    pub fn seeds(&self) -> &SeedWatcher {
        &self.seeds
    }

    fn draw_ambient(&self, ctx: &mut ScriptContext<'_>, dimension: &DimensionId, block: &Block) {
        if !blocks::is_transit(&block.type_id) {
            return;
        }
        let at = block.pos.above().corner();
        if let Err(e) = ctx
            .world_mut()
            .spawn_particle(dimension, AMBIENT_PARTICLE, at, &self.ambient)
        {
            log_world_error("drawing elevator particles", &e);
        }
    }

    fn handle_world_event(&mut self, event: &WorldEvent, ctx: &mut ScriptContext<'_>) {
        match event {
            WorldEvent::EntitySpawned { entity, cause } => {
                self.seeds.on_spawn(ctx, &self.config, *entity, *cause);
            }
            WorldEvent::StepOn {
                entity,
                dimension,
                block,
            } => {
                if ctx.world().is_player(*entity) {
                    self.controller.mount(ctx, *entity, dimension, block);
                }
            }
            // Step events arrive for every block; only leaving an elevator ends a ride.
            WorldEvent::StepOff { entity, block, .. } => {
                if ctx.world().is_player(*entity) && blocks::is_transit(&block.type_id) {
                    self.controller.dismount(ctx, *entity);
                }
            }
            // Only the breaker's own ride is ended here. Anyone else standing
            // on the block notices on their next staleness check.
            WorldEvent::BlockDestroyed {
                player: Some(player),
                block,
                ..
            } => {
                if blocks::is_transit(&block.type_id) {
                    self.controller.dismount(ctx, *player);
                }
            }
            WorldEvent::BlockDestroyed { player: None, .. } => {}
            WorldEvent::BlockTick { dimension, block } => {
                self.draw_ambient(ctx, dimension, block);
            }
            WorldEvent::PlayerSpawned {
                player,
                initial_spawn,
            } => {
                if !initial_spawn {
                    return;
                }
                if let Some((dimension, block)) = elevator_under(ctx.world(), *player) {
                    self.controller.mount(ctx, *player, &dimension, &block);
                }
            }
            WorldEvent::PlayerLeaving { player } => {
                self.controller.dismount(ctx, *player);
            }
            WorldEvent::EntityDied { entity } => {
                if ctx.world().is_player(*entity) || self.controller.is_riding(*entity) {
                    self.controller.dismount(ctx, *entity);
                }
            }
        }
    }
}

impl Default for ElevatorScript {
    fn default() -> Self {
        Self::new(ElevatorConfig::default())
    }
}

impl Script for ElevatorScript {
    fn id(&self) -> &'static str {
        crate::SCRIPT_ID
    }

    fn name(&self) -> &'static str {
        "Elevators"
    }

    fn description(&self) -> &'static str {
        "Jump or crouch on a colored elevator to ride to the next one in the column"
    }

    fn on_load(&mut self, _ctx: &mut ScriptContext<'_>) {
        info!(target: "elevator", "Elevator script loaded");
    }

    fn on_unload(&mut self, ctx: &mut ScriptContext<'_>) {
        self.controller.release(ctx);
        self.seeds.release(ctx);
        debug!(target: "elevator", "Elevator script unloaded");
    }

    fn subscribed_events(&self) -> &[EventFilter] {
        &[
            EventFilter::EntitySpawned,
            EventFilter::StepOn,
            EventFilter::StepOff,
            EventFilter::BlockDestroyed,
            EventFilter::BlockTick,
            EventFilter::PlayerSpawned,
            EventFilter::PlayerLeaving,
            EventFilter::EntityDied,
            EventFilter::WorldInitialize,
        ]
    }

    fn on_event(&mut self, event: &HostEvent, ctx: &mut ScriptContext<'_>) {
        match event {
            HostEvent::World(world_event) => self.handle_world_event(world_event, ctx),
            HostEvent::System(SystemEvent::WorldInitialize) => self.controller.reconcile(ctx),
            HostEvent::System(_) => {}
        }
    }

    fn on_tick(&mut self, ctx: &mut ScriptContext<'_>) {
        for conversion in self.seeds.tick(ctx, &self.config) {
            let block = conversion.as_block();
            for player in &conversion.players {
                self.controller
                    .mount(ctx, *player, &conversion.block.dimension, &block);
            }
        }

        self.controller.tick(ctx);
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
