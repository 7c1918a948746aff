//! Glue between input, search and motion.
//!
//! The [`NavigationCoordinator`] owns the grid and the [`MotionController`],
//! turns click requests into installed paths, and tracks the destination and
//! hover markers shown by a frontend.

use tilenav_kinematics::{TileFrame, Vector2};
use tracing::{debug, info, warn};

use crate::astar::astar_search;
use crate::error::NavigationError;
use crate::map::{Grid, TileCoord};
use crate::motion::{MotionController, MotionEvent, MotionState};

/// Read-only view of everything needed to draw one frame.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavSnapshot {
    /// Agent position in pixels.
    pub position: Vector2,
    /// Agent heading (unit or zero).
    pub direction: Vector2,
    /// Motion phase.
    pub state: MotionState,
    /// Tile containing the agent.
    pub current_tile: TileCoord,
    /// Remaining waypoints in travel order.
    pub path: Vec<TileCoord>,
    /// Most recent unreached goal.
    pub destination: Option<TileCoord>,
    /// Walkable tile under the pointer.
    pub hover: Option<TileCoord>,
    /// Edge length of a tile in pixels.
    pub tile_size: f32,
}

/// Outcome of one [`NavigationCoordinator::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// What the motion controller did.
    pub event: MotionEvent,
    /// `true` on the tick the destination marker was cleared.
    pub destination_reached: bool,
}

/// Validates path requests and drives the agent along the result.
#[derive(Debug, Clone)]
pub struct NavigationCoordinator {
    grid: Grid,
    motion: MotionController,
    destination: Option<TileCoord>,
    hover: Option<TileCoord>,
}

impl NavigationCoordinator {
    /// Creates a coordinator with no destination.
    pub fn new(grid: Grid, motion: MotionController) -> Self {
        info!(
            width = grid.width(),
            height = grid.height(),
            walkable = grid.walkable_count(),
            agent_tile = %motion.current_tile(),
            "Navigation coordinator ready"
        );
        Self {
            grid,
            motion,
            destination: None,
            hover: None,
        }
    }

    /// Plans from `start` to `goal` and hands the result to the motion controller.
    ///
    /// A rejected request changes nothing: the agent keeps following whatever
    /// path it had.
    ///
    /// # Returns
    /// * `Ok(len)` - Number of waypoints installed; `0` when `start == goal`.
    /// * `Err(NavigationError::InvalidRequest)` - `start` or `goal` is outside the grid.
    /// * `Err(NavigationError::NoPathFound)` - `goal` is unreachable.
    pub fn request_path(&mut self, start: TileCoord, goal: TileCoord) -> Result<usize, NavigationError> {
        if !self.grid.in_bounds(start) || !self.grid.in_bounds(goal) {
            warn!(%start, %goal, "Path request outside the grid");
            return Err(NavigationError::InvalidRequest { start, goal });
        }

        let path = astar_search(&self.grid, start, goal).inspect_err(|e| {
            warn!(%start, %goal, error = %e, "Path request rejected");
        })?;

        let len = path.len();
        info!(%start, %goal, waypoints = len, "Path installed");
        self.motion.set_path(path);
        self.destination = if len == 0 { None } else { Some(goal) };
        Ok(len)
    }

    /// Plans from the agent's current tile to the tile under `click`.
    pub fn request_path_to_pixel(&mut self, click: Vector2) -> Result<usize, NavigationError> {
        let goal: TileCoord = self.tile_frame().tile_of(click).into();
        let start = self.motion.current_tile();
        debug!(%click, %goal, "Click received");
        self.request_path(start, goal)
    }

    /// Advances the agent one step and clears the destination once reached.
    pub fn tick(&mut self) -> TickReport {
        let event = self.motion.tick();

        let current = self.motion.current_tile();
        let destination_reached = self.destination == Some(current);
        if destination_reached {
            info!(tile = %current, "Destination reached");
            self.destination = None;
        }

        TickReport {
            event,
            destination_reached,
        }
    }

    /// Sets the hover marker to the walkable tile under `pointer`, or clears it.
    pub fn update_hover(&mut self, pointer: Vector2) -> Option<TileCoord> {
        let tile = TileCoord::from(self.tile_frame().tile_of(pointer));
        self.hover = self.grid.is_walkable(tile).then_some(tile);
        self.hover
    }

    /// Copies out the state a frontend draws.
    pub fn snapshot(&self) -> NavSnapshot {
        NavSnapshot {
            position: self.motion.position(),
            direction: self.motion.direction(),
            state: self.motion.state(),
            current_tile: self.motion.current_tile(),
            path: self.motion.path().to_vec(),
            destination: self.destination,
            hover: self.hover,
            tile_size: self.tile_frame().tile_size(),
        }
    }

    /// The grid being navigated.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The agent's motion controller.
    pub fn motion(&self) -> &MotionController {
        &self.motion
    }

    /// Most recent unreached goal.
    pub fn destination(&self) -> Option<TileCoord> {
        self.destination
    }

    /// Walkable tile last seen under the pointer.
    pub fn hover(&self) -> Option<TileCoord> {
        self.hover
    }

    /// Pixel/tile mapping shared with the motion controller.
    pub fn tile_frame(&self) -> TileFrame {
        self.motion.tile_frame()
    }
}
