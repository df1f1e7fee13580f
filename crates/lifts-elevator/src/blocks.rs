use strum_macros::Display;

use lifts_events::{Block, BlockPos, DimensionId};

/// Namespace prefix of every elevator block id
const TRANSIT_PREFIX: &str = "bt:e.";
const TRANSIT_SUFFIX: &str = "_elevator";
const CONVERTIBLE_PREFIX: &str = "minecraft:";
const CONVERTIBLE_SUFFIX: &str = "_wool";

pub const CAULDRON: &str = "minecraft:cauldron";

/// Elevator and wool color variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Color {
    Black,
    Blue,
    Brown,
    Cyan,
    Gray,
    Green,
    LightBlue,
    LightGray,
    Lime,
    Magenta,
    Orange,
    Pink,
    Purple,
    Red,
    White,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 16] = [
        Color::Black,
        Color::Blue,
        Color::Brown,
        Color::Cyan,
        Color::Gray,
        Color::Green,
        Color::LightBlue,
        Color::LightGray,
        Color::Lime,
        Color::Magenta,
        Color::Orange,
        Color::Pink,
        Color::Purple,
        Color::Red,
        Color::White,
        Color::Yellow,
    ];

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|color| color.to_string() == name)
    }

    /// Elevator block of this color, e.g. `bt:e.light_blue_elevator`
    pub fn transit_type_id(self) -> String {
        format!("{}{}{}", TRANSIT_PREFIX, self, TRANSIT_SUFFIX)
    }

    /// Wool block of this color, e.g. `minecraft:light_blue_wool`
    pub fn convertible_type_id(self) -> String {
        format!("{}{}{}", CONVERTIBLE_PREFIX, self, CONVERTIBLE_SUFFIX)
    }
}

pub fn transit_color(type_id: &str) -> Option<Color> {
    type_id
        .strip_prefix(TRANSIT_PREFIX)?
        .strip_suffix(TRANSIT_SUFFIX)
        .and_then(Color::from_name)
}

pub fn convertible_color(type_id: &str) -> Option<Color> {
    type_id
        .strip_prefix(CONVERTIBLE_PREFIX)?
        .strip_suffix(CONVERTIBLE_SUFFIX)
        .and_then(Color::from_name)
}

pub fn is_transit(type_id: &str) -> bool {
    transit_color(type_id).is_some()
}

/// A placed elevator block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitBlock {
    pub dimension: DimensionId,
    pub pos: BlockPos,
    pub color: Color,
}

impl TransitBlock {
    pub fn from_block(dimension: &DimensionId, block: &Block) -> Option<Self> {
        Some(Self {
            dimension: dimension.clone(),
            pos: block.pos,
            color: transit_color(&block.type_id)?,
        })
    }

    pub fn type_id(&self) -> String {
        self.color.transit_type_id()
    }
}
