//! Path-following motion controller.
//!
//! Converts a queue of tile waypoints into constant-speed movement through
//! pixel space. Each tick the agent steps toward the center of the head
//! waypoint, stopping on it if it is within one step. As soon as its
//! position lies anywhere inside that tile the waypoint counts as reached
//! and the agent turns toward the next one.

use std::fmt;

use tilenav_kinematics::{ConstantSpeed, TileFrame, Vector2};
use tracing::debug;

use crate::error::NavigationError;
use crate::map::TileCoord;
use crate::path::Path;

/// Phase of the motion controller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotionState {
    /// No active path; direction is zero.
    #[default]
    Idle,
    /// Moving toward the head waypoint.
    Following,
    /// A waypoint was reached during the last tick. Lasts one tick.
    Arriving,
}

impl fmt::Display for MotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionState::Idle => write!(f, "idle"),
            MotionState::Following => write!(f, "following"),
            MotionState::Arriving => write!(f, "arriving"),
        }
    }
}

/// What happened during one [`MotionController::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotionEvent {
    /// Nothing to follow; the agent did not move.
    Idle,
    /// The agent moved but did not reach a waypoint.
    Moved,
    /// An intermediate waypoint was reached and removed from the path.
    WaypointReached(TileCoord),
    /// The final waypoint was reached; the path is now empty.
    Arrived(TileCoord),
}

/// Owns the agent's continuous state and consumes its [`Path`].
#[derive(Debug, Clone)]
pub struct MotionController {
    frame: TileFrame,
    drive: ConstantSpeed,
    position: Vector2,
    direction: Vector2,
    path: Path,
    state: MotionState,
}

impl MotionController {
    /// Creates an idle controller.
    ///
    /// # Arguments
    /// * `start` - Initial agent position in pixels.
    /// * `speed` - Distance travelled per tick in pixels.
    /// * `tile_size` - Edge length of a tile in pixels.
    ///
    /// # Returns
    /// * `Err(NavigationError::Kinematics)` if `speed` or `tile_size` is not positive and finite.
    pub fn new(start: Vector2, speed: f32, tile_size: f32) -> Result<Self, NavigationError> {
        Ok(Self {
            frame: TileFrame::new(tile_size)?,
            drive: ConstantSpeed::new(speed)?,
            position: start,
            direction: Vector2::ZERO,
            path: Path::new(),
            state: MotionState::Idle,
        })
    }

    /// Replaces the active path and turns toward its first waypoint.
    ///
    /// Any path in progress is discarded. An empty path stops the agent.
    pub fn set_path(&mut self, path: Path) {
        debug!(waypoints = path.len(), "Installing path");
        self.path = path;
        self.recompute_direction();
    }

    /// Points `direction` at the center of the head waypoint.
    ///
    /// Waypoints whose center coincides with the agent's position are
    /// dropped, since they give no direction to move in.
    fn recompute_direction(&mut self) {
        while let Some(head) = self.path.head() {
            let target = self.frame.tile_center(head.x, head.y);
            let direction = (target - self.position).normalize_or_zero();
            if direction.is_zero() {
                debug!(%head, "Already at waypoint center, skipping");
                self.path.pop_head();
                continue;
            }
            self.direction = direction;
            self.state = MotionState::Following;
            return;
        }
        self.direction = Vector2::ZERO;
        self.state = MotionState::Idle;
    }

    /// Advances the agent by one step.
    ///
    /// At most one waypoint is consumed per tick. A step never carries the
    /// agent past the head's center: when the center is within one step the
    /// agent lands on it. An agent at least as fast as the tile size therefore
    /// hops from center to center instead of leaving the path.
    pub fn tick(&mut self) -> MotionEvent {
        let Some(head) = self.path.head() else {
            self.direction = Vector2::ZERO;
            self.state = MotionState::Idle;
            return MotionEvent::Idle;
        };
        if self.state == MotionState::Arriving {
            self.state = MotionState::Following;
        }

        let target = self.frame.tile_center(head.x, head.y);
        self.position = if (target - self.position).length() <= self.drive.speed() {
            target
        } else {
            self.drive.step(self.position, self.direction)
        };

        if !self.frame.tile_contains(head.x, head.y, self.position) {
            return MotionEvent::Moved;
        }

        self.path.pop_head();
        self.recompute_direction();
        self.state = MotionState::Arriving;
        if self.path.is_empty() {
            debug!(%head, position = %self.position, "Arrived at final waypoint");
            MotionEvent::Arrived(head)
        } else {
            debug!(%head, remaining = self.path.len(), "Waypoint reached");
            MotionEvent::WaypointReached(head)
        }
    }

    /// The tile containing the agent's position.
    pub fn current_tile(&self) -> TileCoord {
        self.frame.tile_of(self.position).into()
    }

    /// Agent position in pixels.
    pub fn position(&self) -> Vector2 {
        self.position
    }

    /// Unit heading, or zero when there is nothing to follow.
    pub fn direction(&self) -> Vector2 {
        self.direction
    }

    /// Distance travelled per tick in pixels.
    pub fn speed(&self) -> f32 {
        self.drive.speed()
    }

    /// Remaining waypoints.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current phase.
    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Pixel/tile mapping used by this controller.
    pub fn tile_frame(&self) -> TileFrame {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astar::astar_search;
    use crate::map::Grid;
    use tilenav_kinematics::KinematicsError;

    const EPSILON: f32 = 1e-5;

    fn tiles(coords: &[(i32, i32)]) -> Path {
        coords.iter().copied().map(TileCoord::from).collect()
    }

    fn controller_at_tile(x: i32, y: i32) -> MotionController {
        let center = TileFrame::new(32.0).unwrap().tile_center(x, y);
        MotionController::new(center, 7.0, 32.0).unwrap()
    }

    #[test]
    fn test_new_controller_is_idle() {
        let mut motion = MotionController::new(Vector2::new(60.0, 60.0), 7.0, 32.0).unwrap();
        assert_eq!(motion.state(), MotionState::Idle);
        assert_eq!(motion.current_tile(), TileCoord::new(1, 1));
        assert_eq!(motion.direction(), Vector2::ZERO);

        assert_eq!(motion.tick(), MotionEvent::Idle);
        assert_eq!(motion.position(), Vector2::new(60.0, 60.0));
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(
            MotionController::new(Vector2::ZERO, 0.0, 32.0).err(),
            Some(NavigationError::Kinematics(KinematicsError::InvalidSpeed(
                "must be positive and finite"
            )))
        );
        assert!(matches!(
            MotionController::new(Vector2::ZERO, 7.0, -1.0),
            Err(NavigationError::Kinematics(KinematicsError::InvalidTileSize(_)))
        ));
    }

    #[test]
    fn test_set_path_points_at_head_center() {
        let mut motion = controller_at_tile(1, 1);
        motion.set_path(tiles(&[(2, 1), (3, 1)]));

        assert_eq!(motion.state(), MotionState::Following);
        assert!((motion.direction().x - 1.0).abs() < EPSILON);
        assert!(motion.direction().y.abs() < EPSILON);
        assert!((motion.direction().length() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_empty_path_goes_idle() {
        let mut motion = controller_at_tile(1, 1);
        motion.set_path(tiles(&[(2, 1)]));
        motion.set_path(Path::new());

        assert_eq!(motion.state(), MotionState::Idle);
        assert_eq!(motion.direction(), Vector2::ZERO);
        assert_eq!(motion.tick(), MotionEvent::Idle);
    }

    #[test]
    fn test_zero_delta_head_is_skipped() {
        let mut motion = controller_at_tile(1, 1);

        // Head is the tile the agent sits in the center of
        motion.set_path(tiles(&[(1, 1), (1, 2)]));
        assert_eq!(motion.path().to_vec(), vec![TileCoord::new(1, 2)]);
        assert!(!motion.direction().x.is_nan() && !motion.direction().y.is_nan());
        assert!((motion.direction().y - 1.0).abs() < EPSILON);

        motion.set_path(tiles(&[(1, 1)]));
        assert!(motion.path().is_empty());
        assert_eq!(motion.direction(), Vector2::ZERO);
        assert_eq!(motion.state(), MotionState::Idle);
    }

    #[test]
    fn test_tick_moves_at_constant_speed() {
        let mut motion = controller_at_tile(1, 1);
        motion.set_path(tiles(&[(2, 1)]));
        let before = motion.position();

        assert_eq!(motion.tick(), MotionEvent::Moved);
        assert!(((motion.position() - before).length() - 7.0).abs() < EPSILON);
        assert_eq!(motion.speed(), 7.0);
    }

    #[test]
    fn test_waypoint_then_arrival() {
        let mut motion = controller_at_tile(1, 1);
        motion.set_path(tiles(&[(2, 1), (2, 2)]));

        // 48 -> 55 -> 62 -> 69: tile (2, 1) entered on the third tick
        assert_eq!(motion.tick(), MotionEvent::Moved);
        assert_eq!(motion.tick(), MotionEvent::Moved);
        assert_eq!(motion.tick(), MotionEvent::WaypointReached(TileCoord::new(2, 1)));
        assert_eq!(motion.state(), MotionState::Arriving);
        assert_eq!(motion.path().len(), 1);
        // Now heading down toward (80, 80)
        assert!(motion.direction().y > 0.0);

        assert_eq!(motion.tick(), MotionEvent::Moved);
        assert_eq!(motion.state(), MotionState::Following);

        let mut arrived = None;
        for _ in 0..20 {
            if let MotionEvent::Arrived(tile) = motion.tick() {
                arrived = Some(tile);
                break;
            }
        }
        assert_eq!(arrived, Some(TileCoord::new(2, 2)));
        assert_eq!(motion.current_tile(), TileCoord::new(2, 2));
        assert_eq!(motion.state(), MotionState::Arriving);
        assert_eq!(motion.direction(), Vector2::ZERO);

        let resting = motion.position();
        assert_eq!(motion.tick(), MotionEvent::Idle);
        assert_eq!(motion.state(), MotionState::Idle);
        assert_eq!(motion.position(), resting);
    }

    #[test]
    fn test_follows_search_result_without_teleporting() {
        let grid = Grid::from_rows(&[
            [1u8, 1, 1, 1, 1, 1],
            [1, 0, 0, 0, 0, 1],
            [1, 1, 1, 1, 0, 1],
            [0, 0, 0, 1, 0, 1],
            [1, 1, 1, 1, 0, 1],
            [1, 0, 1, 1, 1, 1],
        ])
        .unwrap();
        let start = TileCoord::new(0, 0);
        let goal = TileCoord::new(0, 4);
        let path = astar_search(&grid, start, goal).unwrap();

        let mut motion = controller_at_tile(start.x, start.y);
        motion.set_path(path);

        let mut previous = motion.current_tile();
        let mut arrived = false;
        for _ in 0..500 {
            let event = motion.tick();
            let tile = motion.current_tile();
            assert!(
                tile == previous || tile.is_adjacent(previous),
                "Jumped from {} to {}",
                previous,
                tile
            );
            assert!(grid.is_walkable(tile), "Entered blocked tile {}", tile);
            previous = tile;
            if event == MotionEvent::Arrived(goal) {
                arrived = true;
                break;
            }
        }
        assert!(arrived, "Agent never reached {}", goal);
        assert_eq!(motion.current_tile(), goal);
    }

    #[test]
    fn test_fast_agent_lands_on_centers() {
        // One step is more than two tiles
        let center = TileFrame::new(32.0).unwrap().tile_center(1, 1);
        let mut motion = MotionController::new(center, 70.0, 32.0).unwrap();
        motion.set_path(tiles(&[(2, 1), (3, 1)]));

        assert_eq!(motion.tick(), MotionEvent::WaypointReached(TileCoord::new(2, 1)));
        assert_eq!(motion.position(), Vector2::new(80.0, 48.0));
        assert_eq!(motion.tick(), MotionEvent::Arrived(TileCoord::new(3, 1)));
        assert_eq!(motion.position(), Vector2::new(112.0, 48.0));
        assert_eq!(motion.current_tile(), TileCoord::new(3, 1));

        assert_eq!(motion.tick(), MotionEvent::Idle);
        assert_eq!(motion.position(), Vector2::new(112.0, 48.0));
    }

    #[test]
    fn test_fast_agent_stays_on_search_path() {
        let grid = Grid::from_rows(&[
            [1u8, 1, 1, 1, 1],
            [0, 0, 0, 0, 1],
            [1, 1, 1, 1, 1],
            [1, 0, 0, 0, 0],
            [1, 1, 1, 1, 1],
        ])
        .unwrap();
        let start = TileCoord::new(0, 0);
        let goal = TileCoord::new(4, 4);
        let path = astar_search(&grid, start, goal).unwrap();
        let waypoints = path.len();

        for speed in [32.0, 45.0, 100.0] {
            let center = TileFrame::new(32.0).unwrap().tile_center(start.x, start.y);
            let mut motion = MotionController::new(center, speed, 32.0).unwrap();
            motion.set_path(path.clone());

            let mut previous = motion.current_tile();
            let mut reached = 0;
            for _ in 0..=waypoints {
                let event = motion.tick();
                let tile = motion.current_tile();
                assert!(
                    tile == previous || tile.is_adjacent(previous),
                    "Speed {}: jumped from {} to {}",
                    speed,
                    previous,
                    tile
                );
                assert!(grid.is_walkable(tile), "Speed {}: left the path at {}", speed, tile);
                previous = tile;
                if matches!(event, MotionEvent::WaypointReached(_) | MotionEvent::Arrived(_)) {
                    reached += 1;
                }
            }
            // Every step reaches the next center, so one waypoint per tick
            assert_eq!(reached, waypoints, "Speed {}", speed);
            assert_eq!(motion.current_tile(), goal, "Speed {}", speed);
        }
    }

    #[test]
    fn test_redirect_changes_direction_immediately() {
        let mut motion = controller_at_tile(1, 1);
        motion.set_path(tiles(&[(2, 1), (3, 1)]));
        motion.tick();
        motion.tick();
        let heading_right = motion.direction();
        assert!(heading_right.x > 0.99);

        motion.set_path(tiles(&[(1, 2), (1, 3)]));
        let redirected = motion.direction();
        assert_ne!(redirected, heading_right);
        assert!(redirected.y > 0.0);
        assert!(redirected.x < 0.0);
        assert!((redirected.length() - 1.0).abs() < EPSILON);
        assert_eq!(motion.path().head(), Some(TileCoord::new(1, 2)));
        assert_eq!(motion.state(), MotionState::Following);
    }
}
