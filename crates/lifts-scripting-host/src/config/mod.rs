mod lifts_config;
mod scripting_config;

pub use lifts_config::{ConfigLoadError, LiftsConfig, LoggingConfig};
pub use scripting_config::ScriptingConfig;
