#![warn(missing_docs)]
//! Grid path planning and path following for a single agent.
//!
//! [`astar`] finds shortest 4-connected paths on a binary obstacle [`map::Grid`],
//! [`motion`] moves the agent along them at constant speed, and
//! [`coordinator`] ties the two together behind click-style requests.

pub mod astar;
pub mod coordinator;
pub mod error;
pub mod map;
pub mod motion;
pub mod path;

pub use astar::{PathResult, astar_search, astar_search_detailed};
pub use coordinator::{NavSnapshot, NavigationCoordinator, TickReport};
pub use error::NavigationError;
pub use map::{CellState, Grid, TileCoord};
pub use motion::{MotionController, MotionEvent, MotionState};
pub use path::Path;
pub use tilenav_kinematics::{TileFrame, Vector2};
