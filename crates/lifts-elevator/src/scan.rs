use lifts_events::{Block, BlockPos, DimensionId};
use lifts_scripting_host::{PlayerInput, World, WorldError};

/// Which way a riding player wants to go this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitDirection {
    Up,
    Down,
}

impl TransitDirection {
    /// Jumping goes up, crouching goes down. Jumping wins if both are held.
    pub fn from_input(input: PlayerInput) -> Option<Self> {
        if input.jumping {
            Some(TransitDirection::Up)
        } else if input.sneaking {
            Some(TransitDirection::Down)
        } else {
            None
        }
    }

    fn step(self) -> i32 {
        match self {
            TransitDirection::Up => 1,
            TransitDirection::Down => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    /// The host had no block there (unloaded area)
    Missing,
    /// The query itself failed
    QueryFailed(WorldError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// First block of the anchor's exact type in the scan direction
    Hit(Block),
    /// Scan reached a position it could not read
    Stopped { at: BlockPos, reason: StopReason },
    /// Ran off the dimension's height range without a match
    Exhausted,
}

/// Walk the column above or below `anchor` for the next block of
/// `anchor_type`. Blocks of any other type in between are skipped.
pub fn scan_column(
    world: &dyn World,
    dimension: &DimensionId,
    anchor: BlockPos,
    anchor_type: &str,
    direction: TransitDirection,
) -> ScanOutcome {
    let height = world.height_range(dimension);
    let mut y = anchor.y + direction.step();

    while height.contains(y) {
        let pos = anchor.with_y(y);

        match world.block(dimension, pos) {
            Ok(Some(block)) if block.type_id == anchor_type => return ScanOutcome::Hit(block),
            Ok(Some(_)) => {}
            Ok(None) => {
                return ScanOutcome::Stopped {
                    at: pos,
                    reason: StopReason::Missing,
                };
            }
            Err(e) => {
                return ScanOutcome::Stopped {
                    at: pos,
                    reason: StopReason::QueryFailed(e),
                };
            }
        }

        y += direction.step();
    }

    ScanOutcome::Exhausted
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifts_scripting_host::MemoryWorld;

    const RED: &str = "bt:e.red_elevator";
    const BLUE: &str = "bt:e.blue_elevator";

    fn column(blocks: &[(i32, &str)]) -> MemoryWorld {
        let mut world = MemoryWorld::new();
        for (y, type_id) in blocks {
            world.set_block(&DimensionId::overworld(), BlockPos::new(10, *y, 10), type_id);
        }
        world
    }

    fn scan(world: &MemoryWorld, anchor_y: i32, direction: TransitDirection) -> ScanOutcome {
        scan_column(
            world,
            &DimensionId::overworld(),
            BlockPos::new(10, anchor_y, 10),
            RED,
            direction,
        )
    }

    #[test]
    fn test_direction_from_input() {
        let both = PlayerInput {
            jumping: true,
            sneaking: true,
        };
        let crouch = PlayerInput {
            jumping: false,
            sneaking: true,
        };
        assert_eq!(TransitDirection::from_input(both), Some(TransitDirection::Up));
        assert_eq!(TransitDirection::from_input(crouch), Some(TransitDirection::Down));
        assert_eq!(TransitDirection::from_input(PlayerInput::default()), None);
    }

    #[test]
    fn test_scan_up_skips_other_blocks() {
        let world = column(&[
            (64, RED),
            (66, "minecraft:stone"),
            (68, BLUE),
            (70, RED),
            (75, RED),
        ]);

        match scan(&world, 64, TransitDirection::Up) {
            ScanOutcome::Hit(block) => assert_eq!(block.pos, BlockPos::new(10, 70, 10)),
            other => panic!("expected hit, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_down_finds_nearest_below() {
        let world = column(&[(10, RED), (40, RED), (64, RED)]);

        match scan(&world, 64, TransitDirection::Down) {
            ScanOutcome::Hit(block) => assert_eq!(block.pos.y, 40),
            other => panic!("expected hit, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_exhausts_height_range() {
        let world = column(&[(64, RED), (70, BLUE)]);
        assert_eq!(scan(&world, 64, TransitDirection::Up), ScanOutcome::Exhausted);
        assert_eq!(scan(&world, 64, TransitDirection::Down), ScanOutcome::Exhausted);
    }

    #[test]
    fn test_anchor_at_build_limit_has_nothing_to_scan() {
        let world = column(&[(319, RED)]);
        assert_eq!(scan(&world, 319, TransitDirection::Up), ScanOutcome::Exhausted);
    }

    #[test]
    fn test_scan_stops_at_unloaded_block_before_match() {
        let mut world = column(&[(64, RED), (70, RED)]);
        world.unload_block(&DimensionId::overworld(), BlockPos::new(10, 67, 10));

        assert_eq!(
            scan(&world, 64, TransitDirection::Up),
            ScanOutcome::Stopped {
                at: BlockPos::new(10, 67, 10),
                reason: StopReason::Missing,
            }
        );
    }

    #[test]
    fn test_scan_stops_on_query_error() {
        let mut world = column(&[(64, RED), (70, RED)]);
        world.fail_block_query(&DimensionId::overworld(), BlockPos::new(10, 65, 10), "boom");

        match scan(&world, 64, TransitDirection::Up) {
            ScanOutcome::Stopped {
                reason: StopReason::QueryFailed(e),
                ..
            } => assert!(!e.is_transient()),
            other => panic!("expected stop, got {:?}", other),
        }
    }
}
