use macroquad::prelude::*;
use std::time::Duration;
use tracing::info;

use tilenav_navigation::{Grid, NavSnapshot, TileCoord, TileFrame, Vector2};

use crate::blackboard::{Blackboard, snapshot};
use crate::bus::Topic;
use crate::navigation::NavCommand;
use crate::settings::shared_settings;

const FLOOR: Color = Color::new(0.93, 0.93, 0.90, 1.0);
const WALL: Color = Color::new(0.20, 0.22, 0.25, 1.0);
const PATH: Color = Color::new(0.29, 0.29, 0.29, 1.0); // #4a4a4a
const DESTINATION: Color = Color::new(0.85, 0.33, 0.25, 0.55);
const HOVER: Color = Color::new(0.25, 0.55, 0.85, 0.30);
const AGENT: Color = Color::new(0.15, 0.45, 0.80, 1.0);

const PATH_WIDTH: f32 = 5.0;
const STALE_AFTER: Duration = Duration::from_secs(1);

// Function to configure the macroquad window
pub fn window_conf() -> Conf {
    // Runs before logging is set up; run() reports a failed load
    let window = shared_settings()
        .as_ref()
        .map(|settings| settings.window.clone())
        .unwrap_or_default();
    Conf {
        window_title: window.title,
        window_width: window.width,
        window_height: window.height,
        high_dpi: true,
        ..Default::default()
    }
}

/// Render loop. Reads the blackboard every frame and forwards pointer and
/// click input to the navigation task. Returns when Escape is pressed.
pub async fn run_visualization_loop(bb: Blackboard, grid: Grid, frame: TileFrame, commands: Topic<NavCommand>) {
    info!("Visualization loop starting inside graphics module...");
    let mut last_pointer: Option<Vector2> = None;

    loop {
        if is_key_pressed(KeyCode::Escape) {
            info!("Escape pressed, closing window.");
            break;
        }

        let (mx, my) = mouse_position();
        let pointer = Vector2::new(mx, my);
        if last_pointer != Some(pointer) {
            commands.publish(NavCommand::Pointer(pointer));
            last_pointer = Some(pointer);
        }
        if is_mouse_button_pressed(MouseButton::Left) {
            commands.publish(NavCommand::Click(pointer));
        }

        let state = snapshot(&bb);

        clear_background(FLOOR);
        draw_walls(&grid, &frame);
        if let Some(tile) = state.nav.hover {
            fill_tile(&frame, tile, HOVER);
        }
        if let Some(tile) = state.nav.destination {
            fill_tile(&frame, tile, DESTINATION);
        }
        draw_path(&frame, &state.nav);
        draw_agent(&frame, &state.nav);

        let status = if state.last_tick_ts.elapsed() > STALE_AFTER {
            format!("navigation stalled after tick {}", state.ticks)
        } else {
            format!(
                "tile {}  {}  {}",
                state.nav.current_tile,
                state.nav.state,
                state.status.as_deref().unwrap_or("click a tile to move")
            )
        };
        draw_text(&status, 8.0, frame.tile_size() * 0.7, 22.0, WHITE);

        next_frame().await
    }
}

fn draw_walls(grid: &Grid, frame: &TileFrame) {
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            let tile = TileCoord::new(x, y);
            if !grid.is_walkable(tile) {
                fill_tile(frame, tile, WALL);
            }
        }
    }
}

fn fill_tile(frame: &TileFrame, tile: TileCoord, color: Color) {
    let origin = frame.tile_origin(tile.x, tile.y);
    draw_rectangle(origin.x, origin.y, frame.tile_size(), frame.tile_size(), color);
}

// Polyline from the agent through the remaining waypoint centers
fn draw_path(frame: &TileFrame, nav: &NavSnapshot) {
    let mut from = nav.position;
    for &tile in &nav.path {
        let to = frame.tile_center(tile.x, tile.y);
        draw_line(from.x, from.y, to.x, to.y, PATH_WIDTH, PATH);
        draw_circle(to.x, to.y, PATH_WIDTH / 2.0, PATH);
        from = to;
    }
}

fn draw_agent(frame: &TileFrame, nav: &NavSnapshot) {
    let radius = frame.tile_size() * 0.4;
    let (x, y) = (nav.position.x, nav.position.y);
    draw_circle(x, y, radius, AGENT);
    if !nav.direction.is_zero() {
        draw_line(
            x,
            y,
            x + nav.direction.x * radius,
            y + nav.direction.y * radius,
            2.0,
            WHITE,
        );
    }
}
