use super::scheduler::{RunId, Scheduler};
use super::world::World;

/// Context provided to scripts for interacting with the world and scheduler
pub struct ScriptContext<'a> {
    world: &'a mut dyn World,
    scheduler: &'a mut Scheduler,
}

impl<'a> ScriptContext<'a> {
    pub fn new(world: &'a mut dyn World, scheduler: &'a mut Scheduler) -> Self {
        Self { world, scheduler }
    }

    // ===== World Access =====

    pub fn world(&self) -> &dyn World {
        &*self.world
    }

    pub fn world_mut(&mut self) -> &mut dyn World {
        &mut *self.world
    }

    // ===== Scheduler Methods =====

    /// Schedule a run that fires once after `delay` ticks
    pub fn run_once(&mut self, delay: u64, name: impl Into<String>) -> RunId {
        self.scheduler.run_once(delay, name)
    }

    /// Schedule a run that fires every `every` ticks until cleared
    pub fn run_interval(&mut self, every: u64, name: impl Into<String>) -> RunId {
        self.scheduler.run_interval(every, name)
    }

    /// Cancel a run; cancelling twice is harmless
    pub fn clear_run(&mut self, id: RunId) -> bool {
        self.scheduler.clear_run(id)
    }

    /// Check if a run fired this tick (consumes the fired state)
    pub fn check_run(&mut self, id: RunId) -> bool {
        self.scheduler.check_run(id)
    }

    // ===== State Access =====

    pub fn current_tick(&self) -> u64 {
        self.scheduler.current_tick()
    }
}
