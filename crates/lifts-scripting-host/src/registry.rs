use tracing::{debug, error};

use super::config::ScriptingConfig;
use super::script_runner::ScriptRunner;
use super::world::World;
use super::Script;

/// Builds a script from its optional `[scripting.config.<id>]` table
pub type ScriptFactory = fn(Option<&toml::Value>) -> anyhow::Result<Box<dyn Script>>;

/// The scripts this host knows how to build, by id
#[derive(Default)]
pub struct ScriptRegistry {
    factories: Vec<(&'static str, ScriptFactory)>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory; a later registration with the same id replaces it
    pub fn register(&mut self, id: &'static str, factory: ScriptFactory) -> &mut Self {
        self.factories.retain(|(existing, _)| *existing != id);
        self.factories.push((id, factory));
        self
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.factories.iter().map(|(id, _)| *id).collect()
    }

    /// Build every enabled script. Scripts whose factory fails are logged
    /// and left out.
    pub fn build(&self, config: &ScriptingConfig) -> Vec<Box<dyn Script>> {
        let mut scripts = Vec::new();

        for (id, factory) in &self.factories {
            if !config.is_script_enabled(id) {
                debug!(target: "scripting", "Script {} is disabled, skipping", id);
                continue;
            }

            match factory(config.script_config(id)) {
                Ok(script) => scripts.push(script),
                Err(e) => {
                    error!(target: "scripting", "Failed to create script {}: {:#}", id, e);
                }
            }
        }

        scripts
    }
}

/// Create a script runner from config
pub fn create_runner_from_config<W: World>(
    world: W,
    registry: &ScriptRegistry,
    config: &ScriptingConfig,
) -> ScriptRunner<W> {
    debug!(target: "scripting", "Creating script runner");
    let mut runner = ScriptRunner::new(world);

    for script in registry.build(config) {
        runner.register_script(script);
    }

    runner
}
