use tilenav_navigation::{Grid, MotionController, MotionEvent, NavigationCoordinator, TileCoord, Vector2};
use tracing_subscriber::EnvFilter;

/// Runs the coordinator headless: one click, then ticks until the agent arrives.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let grid = Grid::from_rows(&[
        [1u8, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 1, 0, 1, 1, 1, 1],
        [1, 1, 1, 0, 1, 0, 0, 1],
        [1, 0, 0, 0, 1, 1, 0, 1],
        [1, 1, 1, 1, 1, 1, 0, 1],
    ])?;
    println!("{}", grid);

    let tile_size = 32.0;
    let motion = MotionController::new(Vector2::new(60.0, 60.0), 7.0, tile_size)?;
    let mut nav = NavigationCoordinator::new(grid, motion);

    // Click in the middle of tile (5, 3)
    let click = nav.tile_frame().tile_center(5, 3);
    let steps = nav.request_path_to_pixel(click)?;
    println!("Path with {} waypoints: {:?}", steps, nav.snapshot().path);

    for tick in 1..=1000 {
        let report = nav.tick();
        match report.event {
            MotionEvent::WaypointReached(tile) => println!("tick {:>3}: reached {}", tick, tile),
            MotionEvent::Arrived(tile) => println!("tick {:>3}: arrived at {}", tick, tile),
            MotionEvent::Moved | MotionEvent::Idle => {}
        }
        if report.destination_reached {
            break;
        }
    }

    let snapshot = nav.snapshot();
    println!(
        "Final position {} in tile {} ({})",
        snapshot.position, snapshot.current_tile, snapshot.state
    );
    assert_eq!(snapshot.current_tile, TileCoord::new(5, 3));
    Ok(())
}
