use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptingConfig {
    /// Whether scripting is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Script ids that should not be loaded even though they are registered
    #[serde(default)]
    pub disabled_scripts: Vec<String>,

    /// Per-script configuration (script ID -> config values)
    #[serde(default)]
    pub config: HashMap<String, toml::Value>,

    /// Host tick length in milliseconds (default: 50ms, 20 ticks per second)
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_tick_interval() -> u64 {
    50
}

impl Default for ScriptingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            disabled_scripts: Vec::new(),
            config: HashMap::new(),
            tick_interval_ms: default_tick_interval(),
        }
    }
}

impl ScriptingConfig {
    pub fn is_script_enabled(&self, id: &str) -> bool {
        self.enabled && !self.disabled_scripts.iter().any(|disabled| disabled == id)
    }

    pub fn script_config(&self, id: &str) -> Option<&toml::Value> {
        self.config.get(id)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScriptingConfig::default();
        assert!(config.enabled);
        assert!(config.is_script_enabled("elevator"));
        assert_eq!(config.tick_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_disabled_script() {
        let config = ScriptingConfig {
            disabled_scripts: vec!["elevator".to_string()],
            ..Default::default()
        };
        assert!(!config.is_script_enabled("elevator"));
        assert!(config.is_script_enabled("other"));
    }

    #[test]
    fn test_scripting_disabled_disables_everything() {
        let config = ScriptingConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(!config.is_script_enabled("elevator"));
    }

    #[test]
    fn test_per_script_table_parses() {
        let config: ScriptingConfig = toml::from_str(
            r#"
            [config.elevator]
            stale_after_ticks = 100
            "#,
        )
        .unwrap();

        let table = config.script_config("elevator").unwrap();
        assert_eq!(
            table.get("stale_after_ticks").and_then(toml::Value::as_integer),
            Some(100)
        );
    }
}
