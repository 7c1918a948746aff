use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use tilenav_navigation::{Grid, MotionController, MotionEvent, NavigationCoordinator, TileCoord, Vector2};

use crate::blackboard::{Blackboard, publish_nav, set_status};
use crate::settings::Settings;

/// Input forwarded from the render loop to the navigation task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavCommand {
    /// Left click at a pixel position.
    Click(Vector2),
    /// Current pointer position.
    Pointer(Vector2),
}

pub fn build_coordinator(settings: &Settings, grid: Grid) -> anyhow::Result<NavigationCoordinator> {
    let start = Vector2::new(settings.agent.start_x, settings.agent.start_y);
    let motion = MotionController::new(start, settings.agent.speed, settings.map.tile_size)
        .context("Invalid agent or map settings")?;

    let start_tile = motion.current_tile();
    if !grid.is_walkable(start_tile) {
        warn!(%start_tile, "Agent starts on a blocked or off-map tile");
    }
    Ok(NavigationCoordinator::new(grid, motion))
}

/// Fixed-rate navigation task. Owns the coordinator; the outside only sees
/// the snapshots it writes to the blackboard.
///
/// # Arguments
/// * `nav` - The coordinator to drive.
/// * `bb` - Blackboard receiving a `NavSnapshot` after every tick.
/// * `cmd_rx` - Commands from the render loop. The task ends when the channel closes.
/// * `tick_period` - Time between motion ticks.
pub async fn nav_task(
    mut nav: NavigationCoordinator,
    bb: Blackboard,
    mut cmd_rx: broadcast::Receiver<Arc<NavCommand>>,
    tick_period: Duration,
) -> anyhow::Result<()> {
    info!(?tick_period, "Navigation task started.");
    let mut ticker = time::interval(tick_period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut pointer: Option<Vector2> = None;
    publish_nav(&bb, nav.snapshot());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(p) = pointer {
                    nav.update_hover(p);
                }
                let report = nav.tick();
                if let MotionEvent::WaypointReached(tile) = report.event {
                    debug!(%tile, "Waypoint reached");
                }
                if report.destination_reached {
                    set_status(&bb, format!("Arrived at {}", nav.motion().current_tile()));
                }
                publish_nav(&bb, nav.snapshot());
            }
            result = cmd_rx.recv() => {
                match result {
                    Ok(cmd) => apply_command(&mut nav, &bb, *cmd, &mut pointer),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("Command receiver lagged by {} messages in nav_task.", n);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        info!("Command channel closed. Navigation task stopping.");
                        return Ok(());
                    }
                }
            }
        }
    }
}

fn apply_command(
    nav: &mut NavigationCoordinator,
    bb: &Blackboard,
    cmd: NavCommand,
    pointer: &mut Option<Vector2>,
) {
    match cmd {
        NavCommand::Pointer(p) => *pointer = Some(p),
        NavCommand::Click(p) => {
            let goal = TileCoord::from(nav.tile_frame().tile_of(p));
            match nav.request_path_to_pixel(p) {
                Ok(0) => set_status(bb, format!("Already at {}", goal)),
                Ok(steps) => set_status(bb, format!("Heading to {} ({} steps)", goal, steps)),
                Err(e) => set_status(bb, e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blackboard::snapshot;
    use crate::bus::Topic;
    use crate::map_layout::DEFAULT_LAYOUT;

    fn demo_coordinator() -> NavigationCoordinator {
        let grid = Grid::from_rows(&DEFAULT_LAYOUT).unwrap();
        build_coordinator(&Settings::default(), grid).unwrap()
    }

    #[test]
    fn test_build_coordinator_rejects_bad_speed() {
        let mut settings = Settings::default();
        settings.agent.speed = -1.0;
        let grid = Grid::from_rows(&DEFAULT_LAYOUT).unwrap();
        assert!(build_coordinator(&settings, grid).is_err());
    }

    #[test]
    fn test_click_outcomes_reach_status() {
        let mut nav = demo_coordinator();
        let bb: Blackboard = Arc::default();
        let mut pointer = None;

        // Border wall
        apply_command(&mut nav, &bb, NavCommand::Click(Vector2::new(10.0, 10.0)), &mut pointer);
        let status = snapshot(&bb).status.unwrap();
        assert!(status.starts_with("No path found"), "{}", status);
        assert_eq!(nav.destination(), None);

        // Below the window
        apply_command(&mut nav, &bb, NavCommand::Click(Vector2::new(10.0, 900.0)), &mut pointer);
        assert!(snapshot(&bb).status.unwrap().starts_with("Invalid path request"));

        apply_command(&mut nav, &bb, NavCommand::Click(Vector2::new(176.0, 48.0)), &mut pointer);
        assert_eq!(snapshot(&bb).status.as_deref(), Some("Heading to (5, 1) (4 steps)"));
        assert_eq!(nav.destination(), Some(TileCoord::new(5, 1)));

        apply_command(&mut nav, &bb, NavCommand::Pointer(Vector2::new(1.0, 2.0)), &mut pointer);
        assert_eq!(pointer, Some(Vector2::new(1.0, 2.0)));
    }

    #[tokio::test]
    async fn test_nav_task_drives_agent_to_click() {
        let bb: Blackboard = Arc::default();
        let topic: Topic<NavCommand> = Topic::new(16);
        let rx = topic.subscribe();
        let handle = tokio::spawn(nav_task(demo_coordinator(), bb.clone(), rx, Duration::from_millis(1)));

        topic.publish(NavCommand::Pointer(Vector2::new(80.0, 48.0)));
        topic.publish(NavCommand::Click(Vector2::new(176.0, 48.0)));

        let arrived = time::timeout(Duration::from_secs(5), async {
            loop {
                if snapshot(&bb).status.as_deref() == Some("Arrived at (5, 1)") {
                    break;
                }
                time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(arrived.is_ok(), "Agent did not arrive, state: {:?}", snapshot(&bb).status);

        let state = snapshot(&bb);
        assert_eq!(state.nav.current_tile, TileCoord::new(5, 1));
        assert_eq!(state.nav.destination, None);
        assert_eq!(state.nav.hover, Some(TileCoord::new(2, 1)));
        assert!(state.ticks > 0);

        drop(topic);
        assert!(handle.await.unwrap().is_ok());
    }
}
