use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Elevator settings, read from `[scripting.config.elevator]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevatorConfig {
    /// Ticks between checks that a riding player is still on their anchor
    pub stale_after_ticks: u64,
    /// Ticks between ride polls (1 = every tick)
    pub poll_interval_ticks: u64,
    /// Ticks the arrival sound waits for the teleport to land before giving up
    pub arrival_cue_window_ticks: u64,
    /// Ticks a seed may rest on a cauldron before it is no longer watched
    pub cauldron_grace_ticks: u32,
    /// Item that turns wool into an elevator when it comes to rest on it
    pub seed_item: String,
    pub teleport_sound: String,
    pub teleport_volume: f32,
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        Self {
            stale_after_ticks: 200,
            poll_interval_ticks: 1,
            arrival_cue_window_ticks: 5,
            cauldron_grace_ticks: 10,
            seed_item: "minecraft:ender_pearl".to_string(),
            teleport_sound: "mob.shulker.teleport".to_string(),
            teleport_volume: 4.0,
        }
    }
}

impl ElevatorConfig {
    /// Build from the script's config table; missing keys keep their defaults
    pub fn from_toml(value: Option<&toml::Value>) -> anyhow::Result<Self> {
        match value {
            None => Ok(Self::default()),
            Some(value) => value
                .clone()
                .try_into()
                .context("Invalid [scripting.config.elevator] table"),
        }
    }
}
