//! This module defines the error types used by the `tilenav-navigation` crate.

#![warn(missing_docs)]

use crate::map::TileCoord;
use tilenav_kinematics::KinematicsError;

/// Error type for navigation operations.
///
/// Every variant is a recoverable outcome: a rejected request never mutates
/// the grid, the active path or the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// Error for invalid map dimensions.
    /// This variant is returned when a grid is empty or its rows differ in length.
    InvalidDimensions(&'static str),
    /// Error for an invalid construction parameter (e.g. an obstacle ratio outside `[0, 1]`).
    InvalidParameter(&'static str),
    /// Error for out-of-bounds cell access.
    OutOfBounds(TileCoord),
    /// A path request whose start or goal lies outside the grid.
    /// No search was performed.
    InvalidRequest {
        /// Requested start tile.
        start: TileCoord,
        /// Requested goal tile.
        goal: TileCoord,
    },
    /// The goal cannot be reached from the start over walkable tiles.
    NoPathFound {
        /// Requested start tile.
        start: TileCoord,
        /// Requested goal tile.
        goal: TileCoord,
    },
    /// Invalid speed or tile size for the motion controller.
    Kinematics(KinematicsError),
}

impl core::fmt::Display for NavigationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NavigationError::InvalidDimensions(msg) => write!(f, "Invalid map dimensions: {}", msg),
            NavigationError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            NavigationError::OutOfBounds(p) => write!(f, "Map access out of bounds: {}", p),
            NavigationError::InvalidRequest { start, goal } => {
                write!(f, "Invalid path request: {} -> {} is outside the grid", start, goal)
            }
            NavigationError::NoPathFound { start, goal } => {
                write!(f, "No path found from {} to {}", start, goal)
            }
            NavigationError::Kinematics(e) => write!(f, "Kinematics error: {}", e),
        }
    }
}

impl core::error::Error for NavigationError {}

impl From<KinematicsError> for NavigationError {
    fn from(e: KinematicsError) -> Self {
        NavigationError::Kinematics(e)
    }
}
