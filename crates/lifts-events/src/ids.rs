use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier the host assigns to every entity (players, dropped items, mobs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Namespaced dimension identifier, e.g. `minecraft:overworld`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DimensionId(String);

impl DimensionId {
    pub const OVERWORLD: &'static str = "minecraft:overworld";
    pub const NETHER: &'static str = "minecraft:nether";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn overworld() -> Self {
        Self::new(Self::OVERWORLD)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
