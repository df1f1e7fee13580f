use tracing::{debug, error, warn};

use crate::blocks;
use crate::config::ElevatorConfig;
use crate::scan::{ScanOutcome, StopReason, TransitDirection, scan_column};
use crate::session::{RideSession, SessionRegistry};
use lifts_events::{Block, DimensionId, EntityId, Vec3};
use lifts_scripting_host::{DynamicValue, RunId, ScriptContext, World, WorldError};

/// Entity property holding the player's ride run id across reloads
pub const SESSION_HANDLE_PROPERTY: &str = "bt:e.run_id";

/// Why a ride ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    PlayerInvalid,
    LeftAnchor,
    ScanStopped,
    Dismounted,
    /// The ride reached another elevator
    Arrived,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Still riding, nothing happened this tick
    Waiting,
    Ended(EndReason),
    Teleported { to: Vec3 },
}

/// Plays the arrival sound once the teleport has actually moved the player
#[derive(Debug, Clone)]
struct ArrivalCue {
    player: EntityId,
    dimension: DimensionId,
    origin_floor_y: i32,
    run: RunId,
    started_at: u64,
}

/// Keeps "player standing on an elevator" and "a run scanning for the next
/// elevator" in one-to-one correspondence, and performs the teleport.
#[derive(Debug)]
pub struct TransitController {
    config: ElevatorConfig,
    sessions: SessionRegistry,
    cues: Vec<ArrivalCue>,
}

impl TransitController {
    pub fn new(config: ElevatorConfig) -> Self {
        Self {
            config,
            sessions: SessionRegistry::new(),
            cues: Vec::new(),
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn is_riding(&self, player: EntityId) -> bool {
        self.sessions.contains(player)
    }

    pub fn pending_cues(&self) -> usize {
        self.cues.len()
    }

    /// Start a ride for a player standing on `block`. Any ride the player
    /// already has is cancelled first. Returns false if `block` is not an
    /// elevator.
    pub fn mount(
        &mut self,
        ctx: &mut ScriptContext<'_>,
        player: EntityId,
        dimension: &DimensionId,
        block: &Block,
    ) -> bool {
        if !blocks::is_transit(&block.type_id) {
            return false;
        }

        if let Some(previous) = self.sessions.remove(player) {
            ctx.clear_run(previous.run);
            debug!(target: "elevator", "{} remounted, superseding run {:?}", player, previous.run);
        }

        let run = ctx.run_interval(self.config.poll_interval_ticks, "elevator:ride");
        self.sessions.insert(RideSession {
            player,
            dimension: dimension.clone(),
            anchor: block.pos,
            anchor_type: block.type_id.clone(),
            watermark: ctx.current_tick(),
            run,
        });

        let handle = Some(DynamicValue::Number(run.as_u64() as f64));
        if let Err(e) = ctx
            .world_mut()
            .set_dynamic_property(player, SESSION_HANDLE_PROPERTY, handle)
        {
            warn!(target: "elevator", "Could not store ride handle on {}: {}", player, e);
        }

        debug!(target: "elevator", "{} mounted {} at {} in {}", player, block.type_id, block.pos, dimension);
        true
    }

    /// End a player's ride, if any, and clear the stored handle. Safe to
    /// call any number of times, in any order relative to polling.
    pub fn dismount(&mut self, ctx: &mut ScriptContext<'_>, player: EntityId) -> bool {
        let had_session = self.end_session(ctx, player, EndReason::Dismounted);
        if !had_session {
            clear_handle(ctx, player);
        }
        had_session
    }

    /// Restart rides after the script environment was rebuilt. Every player
    /// carrying a handle from before has it cleared; those standing on an
    /// elevator get a fresh ride. The old handle is never reused.
    pub fn reconcile(&mut self, ctx: &mut ScriptContext<'_>) {
        for player in ctx.world().players() {
            match ctx.world().dynamic_property(player, SESSION_HANDLE_PROPERTY) {
                Ok(Some(_)) => {}
                Ok(None) => continue,
                Err(e) => {
                    debug!(target: "elevator", "Skipping {} during reconcile: {}", player, e);
                    continue;
                }
            }

            clear_handle(ctx, player);

            if let Some((dimension, block)) = elevator_under(ctx.world(), player) {
                debug!(target: "elevator", "Resuming ride for {} after reload", player);
                self.mount(ctx, player, &dimension, &block);
            }
        }
    }

    /// Cancel every run this controller owns, keeping the stored handles so
    /// a later [`reconcile`](Self::reconcile) can resume the rides.
    pub fn release(&mut self, ctx: &mut ScriptContext<'_>) {
        for session in self.sessions.drain() {
            ctx.clear_run(session.run);
        }
        for cue in self.cues.drain(..) {
            ctx.clear_run(cue.run);
        }
    }

    /// Poll every ride whose run fired this tick, then every arrival cue
    pub fn tick(&mut self, ctx: &mut ScriptContext<'_>) {
        let due: Vec<EntityId> = self
            .sessions
            .players()
            .into_iter()
            .filter(|player| {
                self.sessions
                    .get(*player)
                    .is_some_and(|session| ctx.check_run(session.run))
            })
            .collect();

        for player in due {
            self.poll(ctx, player);
        }

        self.tick_cues(ctx);
    }

    /// One poll of one ride
    pub fn poll(&mut self, ctx: &mut ScriptContext<'_>, player: EntityId) -> PollOutcome {
        let Some(session) = self.sessions.get(player).cloned() else {
            return PollOutcome::Ended(EndReason::Dismounted);
        };

        if !ctx.world().is_valid(player) {
            self.end_session(ctx, player, EndReason::PlayerInvalid);
            return PollOutcome::Ended(EndReason::PlayerInvalid);
        }

        let now = ctx.current_tick();
        if session.is_stale(now, self.config.stale_after_ticks) {
            if !still_on_anchor(ctx.world(), &session) {
                self.end_session(ctx, player, EndReason::LeftAnchor);
                return PollOutcome::Ended(EndReason::LeftAnchor);
            }
            if let Some(session) = self.sessions.get_mut(player) {
                session.watermark = now;
            }
        }

        let input = match ctx.world().player_input(player) {
            Ok(input) => input,
            Err(e) => {
                debug!(target: "elevator", "No input for {}: {}", player, e);
                return PollOutcome::Waiting;
            }
        };
        let Some(direction) = TransitDirection::from_input(input) else {
            return PollOutcome::Waiting;
        };

        let outcome = scan_column(
            ctx.world(),
            &session.dimension,
            session.anchor,
            &session.anchor_type,
            direction,
        );

        match outcome {
            ScanOutcome::Hit(target) => self.teleport(ctx, &session, &target),
            ScanOutcome::Exhausted => PollOutcome::Waiting,
            ScanOutcome::Stopped { at, reason } => {
                match reason {
                    StopReason::Missing => {
                        debug!(target: "elevator", "Scan for {} stopped at unloaded {}", player, at);
                    }
                    StopReason::QueryFailed(e) => log_world_error("scanning", &e),
                }
                self.end_session(ctx, player, EndReason::ScanStopped);
                PollOutcome::Ended(EndReason::ScanStopped)
            }
        }
    }

    fn teleport(
        &mut self,
        ctx: &mut ScriptContext<'_>,
        session: &RideSession,
        target: &Block,
    ) -> PollOutcome {
        let player = session.player;
        self.end_session(ctx, player, EndReason::Arrived);

        let from = match ctx.world().entity_location(player) {
            Ok(location) => location,
            Err(e) => {
                log_world_error("reading location", &e);
                return PollOutcome::Ended(EndReason::PlayerInvalid);
            }
        };

        self.play_teleport_sound(ctx, &session.dimension, from);

        let to = target.pos.above().center();
        if let Err(e) = ctx.world_mut().teleport(player, to) {
            log_world_error("teleporting", &e);
            return PollOutcome::Ended(EndReason::PlayerInvalid);
        }

        let run = ctx.run_interval(1, "elevator:arrival-cue");
        self.cues.push(ArrivalCue {
            player,
            dimension: session.dimension.clone(),
            origin_floor_y: from.floor().y,
            run,
            started_at: ctx.current_tick(),
        });

        debug!(target: "elevator", "Teleported {} from {} to {}", player, from, to);
        PollOutcome::Teleported { to }
    }

    fn tick_cues(&mut self, ctx: &mut ScriptContext<'_>) {
        let now = ctx.current_tick();
        let mut cues = std::mem::take(&mut self.cues);

        cues.retain(|cue| {
            if !ctx.check_run(cue.run) {
                return true;
            }

            let location = match ctx.world().entity_location(cue.player) {
                Ok(location) => location,
                Err(_) => {
                    ctx.clear_run(cue.run);
                    return false;
                }
            };

            if location.floor().y != cue.origin_floor_y {
                self.play_teleport_sound(ctx, &cue.dimension, location);
                ctx.clear_run(cue.run);
                return false;
            }

            if now.saturating_sub(cue.started_at) >= self.config.arrival_cue_window_ticks {
                debug!(target: "elevator", "Teleport of {} never landed, dropping arrival sound", cue.player);
                ctx.clear_run(cue.run);
                return false;
            }

            true
        });

        self.cues = cues;
    }

    fn play_teleport_sound(&self, ctx: &mut ScriptContext<'_>, dimension: &DimensionId, at: Vec3) {
        if let Err(e) = ctx.world_mut().play_sound(
            dimension,
            &self.config.teleport_sound,
            at,
            self.config.teleport_volume,
        ) {
            log_world_error("playing teleport sound", &e);
        }
    }

    /// Cancel the player's ride and clear its handle. Returns whether there
    /// was a ride to end.
    fn end_session(
        &mut self,
        ctx: &mut ScriptContext<'_>,
        player: EntityId,
        reason: EndReason,
    ) -> bool {
        let Some(session) = self.sessions.remove(player) else {
            return false;
        };

        ctx.clear_run(session.run);
        clear_handle(ctx, player);
        debug!(target: "elevator", "Ride of {} ended: {:?}", player, reason);
        true
    }
}

/// The elevator block under a player, with the player's dimension
pub fn elevator_under(world: &dyn World, player: EntityId) -> Option<(DimensionId, Block)> {
    let dimension = world.entity_dimension(player).ok()?;
    let block = world.block_under(player).ok()??;
    blocks::is_transit(&block.type_id).then_some((dimension, block))
}

/// Re-derive the block under the player and compare it with the anchor
fn still_on_anchor(world: &dyn World, session: &RideSession) -> bool {
    match world.entity_dimension(session.player) {
        Ok(dimension) if dimension == session.dimension => {}
        _ => return false,
    }

    match world.block_under(session.player) {
        Ok(Some(block)) => block.pos == session.anchor && block.type_id == session.anchor_type,
        _ => false,
    }
}

fn clear_handle(ctx: &mut ScriptContext<'_>, player: EntityId) {
    if !ctx.world().is_valid(player) {
        return;
    }
    if let Err(e) = ctx
        .world_mut()
        .set_dynamic_property(player, SESSION_HANDLE_PROPERTY, None)
    {
        debug!(target: "elevator", "Could not clear ride handle on {}: {}", player, e);
    }
}

/// Unloaded-chunk failures are routine during dimension changes; anything
/// else is worth an error line.
pub(crate) fn log_world_error(action: &str, e: &WorldError) {
    if e.is_transient() {
        debug!(target: "elevator", "Ignoring transient error while {}: {}", action, e);
    } else {
        error!(target: "elevator", "Unexpected host error while {}: {}", action, e);
    }
}
