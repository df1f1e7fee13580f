use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::{debug, error, info, warn};

use super::config::ScriptingConfig;
use super::context::ScriptContext;
use super::registry::ScriptRegistry;
use super::scheduler::Scheduler;
use super::world::World;
use super::Script;
use lifts_events::{HostEvent, SystemEvent};

/// Runs scripts against a world and dispatches events to them
pub struct ScriptRunner<W: World> {
    /// The world every script acts on
    world: W,
    /// All registered scripts
    scripts: Vec<Box<dyn Script>>,
    /// Scheduler shared across all scripts
    scheduler: Scheduler,
}

impl<W: World> ScriptRunner<W> {
    pub fn new(world: W) -> Self {
        Self {
            world,
            scripts: Vec::new(),
            scheduler: Scheduler::new(),
        }
    }

    /// Register a script and call its `on_load`
    pub fn register_script(&mut self, mut script: Box<dyn Script>) {
        debug!(target: "scripting", "Registering script: {} ({})", script.name(), script.id());

        let mut ctx = ScriptContext::new(&mut self.world, &mut self.scheduler);
        script.on_load(&mut ctx);

        self.scripts.push(script);
    }

    /// Get the number of registered scripts
    pub fn script_count(&self) -> usize {
        self.scripts.len()
    }

    /// Get the IDs of all registered scripts
    pub fn script_ids(&self) -> Vec<&str> {
        self.scripts.iter().map(|s| s.id()).collect()
    }

    /// Find a registered script by concrete type
    pub fn script_mut<T: Script>(&mut self) -> Option<&mut T> {
        self.scripts
            .iter_mut()
            .find_map(|script| script.as_any_mut().downcast_mut::<T>())
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn current_tick(&self) -> u64 {
        self.scheduler.current_tick()
    }

    /// Advance the scheduler one tick, then tick every script.
    ///
    /// A script that panics is logged and the remaining scripts still run.
    pub fn tick(&mut self) {
        let fired = self.scheduler.advance();
        if !fired.is_empty() {
            debug!(target: "scripting", "Runs fired on tick {}: {}", self.scheduler.current_tick(), fired.len());
        }

        let mut ctx = ScriptContext::new(&mut self.world, &mut self.scheduler);

        for script in &mut self.scripts {
            if let Err(e) = catch_unwind(AssertUnwindSafe(|| script.on_tick(&mut ctx))) {
                error!(target: "scripting",
                    "Script {} ({}) panicked during tick: {:?}",
                    script.name(),
                    script.id(),
                    e
                );
            }
        }
    }

    /// Dispatch an event to every script subscribed to it
    pub fn handle_event(&mut self, event: &HostEvent) {
        let mut ctx = ScriptContext::new(&mut self.world, &mut self.scheduler);

        for script in &mut self.scripts {
            let subscribed = script
                .subscribed_events()
                .iter()
                .any(|filter| filter.matches(event));

            if !subscribed {
                continue;
            }

            if let Err(e) = catch_unwind(AssertUnwindSafe(|| script.on_event(event, &mut ctx))) {
                error!(target: "scripting",
                    "Script {} ({}) panicked while handling event: {:?}",
                    script.name(),
                    script.id(),
                    e
                );
            }
        }
    }

    /// Unload all scripts, calling their `on_unload`
    pub fn unload_scripts(&mut self) {
        let count = self.scripts.len();

        if count == 0 {
            return;
        }

        debug!(target: "scripting", "Unloading {} script(s)", count);

        let mut ctx = ScriptContext::new(&mut self.world, &mut self.scheduler);
        for script in self.scripts.iter_mut() {
            debug!(target: "scripting", "Calling on_unload for: {} ({})", script.name(), script.id());
            script.on_unload(&mut ctx);
        }

        self.scripts.clear();
    }

    /// Rebuild the script environment, the way the host does on a world
    /// reload: scripts are unloaded, every scheduled run is dropped, fresh
    /// scripts are built from the registry, and they receive
    /// `WorldInitialize`. Anything scripts stored on entities survives.
    pub fn reload_scripts(&mut self, registry: &ScriptRegistry, config: &ScriptingConfig) {
        let old_script_count = self.scripts.len();
        debug!(target: "scripting", "Reloading scripts");

        self.unload_scripts();
        self.scheduler.clear_all();

        for script in registry.build(config) {
            self.register_script(script);
        }

        let new_script_count = self.scripts.len();

        // Warn if we went from having scripts to having none
        if old_script_count > 0 && new_script_count == 0 {
            warn!(
                target: "scripting",
                "Script reload resulted in zero scripts (was {}). Check logs for errors.",
                old_script_count
            );
        } else if new_script_count > 0 {
            info!(target: "scripting", "Reloaded {} script(s)", new_script_count);
        }

        self.handle_event(&HostEvent::System(SystemEvent::WorldInitialize));
    }
}

impl<W: World> Drop for ScriptRunner<W> {
    fn drop(&mut self) {
        self.unload_scripts();
    }
}
