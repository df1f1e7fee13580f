// Integration tests for the script runner

use std::any::Any;

use lifts_events::{EntityId, HostEvent, SystemEvent, WorldEvent};
use lifts_scripting_host::{
    EventFilter, MemoryWorld, RunId, Script, ScriptContext, ScriptRegistry, ScriptRunner,
    ScriptingConfig, create_runner_from_config,
};

/// Records everything the runner does to it
#[derive(Default)]
struct RecordingScript {
    loads: u32,
    unloads: u32,
    ticks: u32,
    events: Vec<HostEvent>,
    run: Option<RunId>,
    run_fired: u32,
}

impl Script for RecordingScript {
    fn id(&self) -> &'static str {
        "recording"
    }

    fn name(&self) -> &'static str {
        "Recording"
    }

    fn description(&self) -> &'static str {
        "Records lifecycle calls for tests"
    }

    fn on_load(&mut self, ctx: &mut ScriptContext<'_>) {
        self.loads += 1;
        self.run = Some(ctx.run_interval(2, "recording:every-other"));
    }

    fn on_unload(&mut self, _ctx: &mut ScriptContext<'_>) {
        self.unloads += 1;
    }

    fn subscribed_events(&self) -> &[EventFilter] {
        &[EventFilter::PlayerLeaving, EventFilter::WorldInitialize]
    }

    fn on_event(&mut self, event: &HostEvent, _ctx: &mut ScriptContext<'_>) {
        self.events.push(event.clone());
    }

    fn on_tick(&mut self, ctx: &mut ScriptContext<'_>) {
        self.ticks += 1;
        if let Some(run) = self.run {
            if ctx.check_run(run) {
                self.run_fired += 1;
            }
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Panics on every tick
struct PanickingScript;

impl Script for PanickingScript {
    fn id(&self) -> &'static str {
        "panicking"
    }

    fn name(&self) -> &'static str {
        "Panicking"
    }

    fn description(&self) -> &'static str {
        "Always panics"
    }

    fn on_load(&mut self, _ctx: &mut ScriptContext<'_>) {}

    fn on_unload(&mut self, _ctx: &mut ScriptContext<'_>) {}

    fn subscribed_events(&self) -> &[EventFilter] {
        &[EventFilter::All]
    }

    fn on_event(&mut self, _event: &HostEvent, _ctx: &mut ScriptContext<'_>) {
        panic!("event handler blew up");
    }

    fn on_tick(&mut self, _ctx: &mut ScriptContext<'_>) {
        panic!("tick handler blew up");
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn recording_factory(_config: Option<&toml::Value>) -> anyhow::Result<Box<dyn Script>> {
    Ok(Box::new(RecordingScript::default()))
}

fn failing_factory(_config: Option<&toml::Value>) -> anyhow::Result<Box<dyn Script>> {
    anyhow::bail!("bad config")
}

fn leaving() -> HostEvent {
    HostEvent::World(WorldEvent::PlayerLeaving {
        player: EntityId(7),
    })
}

#[test]
fn test_register_calls_on_load() {
    let mut runner = ScriptRunner::new(MemoryWorld::new());
    runner.register_script(Box::new(RecordingScript::default()));

    assert_eq!(runner.script_count(), 1);
    assert_eq!(runner.script_ids(), vec!["recording"]);
    assert_eq!(runner.script_mut::<RecordingScript>().unwrap().loads, 1);
}

#[test]
fn test_events_only_reach_subscribers() {
    let mut runner = ScriptRunner::new(MemoryWorld::new());
    runner.register_script(Box::new(RecordingScript::default()));

    runner.handle_event(&leaving());
    runner.handle_event(&HostEvent::World(WorldEvent::EntityDied {
        entity: EntityId(7),
    }));

    let script = runner.script_mut::<RecordingScript>().unwrap();
    assert_eq!(script.events.len(), 1);
    assert!(matches!(
        script.events[0],
        HostEvent::World(WorldEvent::PlayerLeaving { .. })
    ));
}

#[test]
fn test_tick_advances_scheduler_before_scripts() {
    let mut runner = ScriptRunner::new(MemoryWorld::new());
    runner.register_script(Box::new(RecordingScript::default()));

    for _ in 0..4 {
        runner.tick();
    }

    assert_eq!(runner.current_tick(), 4);
    let script = runner.script_mut::<RecordingScript>().unwrap();
    assert_eq!(script.ticks, 4);
    // Interval of 2 fires on ticks 2 and 4
    assert_eq!(script.run_fired, 2);
}

#[test]
fn test_panicking_script_does_not_stop_others() {
    let mut runner = ScriptRunner::new(MemoryWorld::new());
    runner.register_script(Box::new(PanickingScript));
    runner.register_script(Box::new(RecordingScript::default()));

    runner.tick();
    runner.handle_event(&leaving());

    let script = runner.script_mut::<RecordingScript>().unwrap();
    assert_eq!(script.ticks, 1);
    assert_eq!(script.events.len(), 1);
}

#[test]
fn test_registry_skips_disabled_and_failing_scripts() {
    let mut registry = ScriptRegistry::new();
    registry
        .register("recording", recording_factory)
        .register("broken", failing_factory);

    let config = ScriptingConfig::default();
    let runner = create_runner_from_config(MemoryWorld::new(), &registry, &config);
    assert_eq!(runner.script_ids(), vec!["recording"]);

    let config = ScriptingConfig {
        disabled_scripts: vec!["recording".to_string()],
        ..Default::default()
    };
    let runner = create_runner_from_config(MemoryWorld::new(), &registry, &config);
    assert_eq!(runner.script_count(), 0);
}

#[test]
fn test_reload_rebuilds_scripts_and_drops_runs() {
    let mut registry = ScriptRegistry::new();
    registry.register("recording", recording_factory);
    let config = ScriptingConfig::default();

    let mut runner = create_runner_from_config(MemoryWorld::new(), &registry, &config);
    let old_run = runner.script_mut::<RecordingScript>().unwrap().run.unwrap();
    runner.tick();

    runner.reload_scripts(&registry, &config);

    assert!(!runner.scheduler().is_active(old_run));
    // Only the fresh script's run remains
    assert_eq!(runner.scheduler().active_count(), 1);

    let script = runner.script_mut::<RecordingScript>().unwrap();
    assert_eq!(script.loads, 1);
    assert_eq!(script.ticks, 0);
    assert_ne!(script.run, Some(old_run));
    assert!(matches!(
        script.events.as_slice(),
        [HostEvent::System(SystemEvent::WorldInitialize)]
    ));
}
