mod blackboard; // shared navigation state for the render loop
mod bus; // broadcast topics
mod graphics; // macroquad window and drawing
mod map_layout; // built-in obstacle map
mod navigation; // fixed-rate navigation task
mod settings; // tilenav.toml + TILENAV_* env

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use blackboard::Blackboard;
use bus::Topic;
use graphics::window_conf;
use navigation::{NavCommand, build_coordinator, nav_task};
use settings::{Settings, check, shared_settings};
use tilenav_navigation::Grid;

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Tilenav (Macroquad Frontend) started.");

    if let Err(e) = run().await {
        error!("Tilenav stopped: {:#}", e);
    }
}

async fn run() -> anyhow::Result<()> {
    let settings = match shared_settings() {
        Ok(settings) => {
            info!(?settings, "Configuration loaded");
            check(settings);
            settings.clone()
        }
        Err(e) => {
            warn!("Falling back to default settings: {}", e);
            Settings::default()
        }
    };

    let grid = Grid::from_rows(&map_layout::DEFAULT_LAYOUT).context("Built-in map is malformed")?;
    let coordinator = build_coordinator(&settings, grid)?;
    // The render loop gets its own copy of the static map and tile frame
    let grid = coordinator.grid().clone();
    let frame = coordinator.tile_frame();

    let tokio_rt = tokio::runtime::Runtime::new().context("Failed to start Tokio runtime")?;

    let bb: Blackboard = Arc::default();
    let commands: Topic<NavCommand> = Topic::new(settings.nav.command_capacity);
    let cmd_rx = commands.subscribe();

    let nav_handle = tokio_rt.spawn({
        let bb = Arc::clone(&bb);
        let tick_period = settings.tick_period();
        async move {
            match nav_task(coordinator, bb, cmd_rx, tick_period).await {
                Ok(()) => info!("Navigation task finished."),
                Err(e) => error!("Navigation task failed: {:?}", e),
            }
        }
    });

    // Takes the only command sender; the nav task stops once it is dropped
    graphics::run_visualization_loop(bb, grid, frame, commands).await;

    if let Err(e) = tokio_rt.block_on(nav_handle) {
        error!("Navigation task did not shut down cleanly: {}", e);
    }
    tokio_rt.shutdown_timeout(Duration::from_millis(500));
    info!("Tilenav exited.");
    Ok(())
}
