// Whole-host runs on tokio's paused clock

use std::fs;
use std::time::Duration;

use tempfile::TempDir;
use tokio::time::sleep;

use lifts_events::{BlockPos, DimensionId, Vec3};
use lifts_runner::run_host;
use lifts_scripting_host::{LiftsConfig, MemoryWorld, World};

const RED: &str = "bt:e.red_elevator";

#[tokio::test(start_paused = true)]
async fn test_host_runs_shipped_scripts_until_shutdown() {
    let dimension = DimensionId::overworld();
    let mut world = MemoryWorld::new();
    world.set_block(&dimension, BlockPos::new(0, 64, 0), RED);
    let player = world.spawn_player(&dimension, Vec3::new(0.5, 65.0, 0.5));

    let runner = run_host(world, &LiftsConfig::default(), sleep(Duration::from_millis(200))).await;

    assert_eq!(runner.script_count(), 1);
    assert!((4..=5).contains(&runner.current_tick()), "tick {}", runner.current_tick());
    // The world comes back untouched apart from the ticks
    assert!(runner.world().effects().is_empty());
    assert!(runner.world().is_player(player));
}

#[tokio::test(start_paused = true)]
async fn test_host_follows_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[scripting]
disabled_scripts = ["elevator"]
tick_interval_ms = 100
"#,
    )
    .unwrap();
    let config = LiftsConfig::load_from(&path).unwrap();

    let runner = run_host(MemoryWorld::new(), &config, sleep(Duration::from_millis(1000))).await;

    assert_eq!(runner.script_count(), 0);
    assert!((10..=11).contains(&runner.current_tick()), "tick {}", runner.current_tick());
}
