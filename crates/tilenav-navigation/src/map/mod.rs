//! Map-related functionality for navigation.
//!
//! This module provides the binary obstacle grid and the tile coordinate type
//! used by search and motion.

pub mod grid;
pub mod point_types;

pub use grid::{CellState, Grid, NEIGHBOR_OFFSETS};
pub use point_types::TileCoord;
