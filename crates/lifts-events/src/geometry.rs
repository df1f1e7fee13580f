use serde::{Deserialize, Serialize};
use std::fmt;

/// Type id of an empty block
pub const AIR: &str = "minecraft:air";

/// Integer block coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn above(self) -> Self {
        self.with_y(self.y + 1)
    }

    pub const fn below(self) -> Self {
        self.with_y(self.y - 1)
    }

    pub const fn with_y(self, y: i32) -> Self {
        Self { y, ..self }
    }

    /// Center point of the block volume
    pub fn center(self) -> Vec3 {
        Vec3::new(
            f64::from(self.x) + 0.5,
            f64::from(self.y) + 0.5,
            f64::from(self.z) + 0.5,
        )
    }

    /// Corner of the block volume, matching how the host reports block locations
    pub fn corner(self) -> Vec3 {
        Vec3::new(f64::from(self.x), f64::from(self.y), f64::from(self.z))
    }

    /// Chunk column (16x16) containing this block
    pub const fn chunk(self) -> (i32, i32) {
        (self.x.div_euclid(16), self.z.div_euclid(16))
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Continuous world location
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Block the point lies in
    pub fn floor(self) -> BlockPos {
        BlockPos::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }

    /// Block an entity at this location is standing on
    pub fn standing_on(self) -> BlockPos {
        self.floor().below()
    }

    pub fn distance(self, other: Vec3) -> f64 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// Vertical build limits of a dimension. `max` is exclusive, `min` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightRange {
    pub min: i32,
    pub max: i32,
}

impl HeightRange {
    pub const OVERWORLD: Self = Self { min: -64, max: 320 };
    pub const NETHER: Self = Self { min: 0, max: 128 };

    pub const fn contains(&self, y: i32) -> bool {
        y >= self.min && y < self.max
    }
}

impl Default for HeightRange {
    fn default() -> Self {
        Self::OVERWORLD
    }
}

/// A block as seen by a query: where it is and what it is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub pos: BlockPos,
    pub type_id: String,
}

impl Block {
    pub fn new(pos: BlockPos, type_id: impl Into<String>) -> Self {
        Self {
            pos,
            type_id: type_id.into(),
        }
    }

    pub fn is_air(&self) -> bool {
        self.type_id == AIR
    }

    pub fn center(&self) -> Vec3 {
        self.pos.center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_handles_negative_coordinates() {
        let pos = Vec3::new(-0.5, 64.0, -16.01).floor();
        assert_eq!(pos, BlockPos::new(-1, 64, -17));
    }

    #[test]
    fn test_standing_on_is_one_below_feet() {
        let feet = Vec3::new(10.5, 65.0, 10.5);
        assert_eq!(feet.standing_on(), BlockPos::new(10, 64, 10));
    }

    #[test]
    fn test_center_of_block_above() {
        let center = BlockPos::new(10, 70, 10).above().center();
        assert_eq!(center, Vec3::new(10.5, 71.5, 10.5));
    }

    #[test]
    fn test_chunk_of_negative_block() {
        assert_eq!(BlockPos::new(-1, 0, 16).chunk(), (-1, 1));
        assert_eq!(BlockPos::new(15, 0, 0).chunk(), (0, 0));
    }

    #[test]
    fn test_height_range_bounds() {
        let range = HeightRange::OVERWORLD;
        assert!(range.contains(-64));
        assert!(range.contains(319));
        assert!(!range.contains(320));
    }
}
