#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for constant-speed point motion on a tiled plane."]
#![doc = ""]
#![doc = "This crate provides a 2D vector type, the mapping between continuous pixel"]
#![doc = "space and integer tile indices, and a constant-speed stepper used to move an agent."]

use core::fmt;
use core::ops::{Add, AddAssign, Mul, Sub};
use libm::{floorf, sqrtf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::KinematicsError;

/// Vectors shorter than this are treated as zero when normalizing.
pub const NORMALIZE_EPSILON: f32 = 1e-6;

/// A 2‑D vector in pixel space `(x, y)`, with `y` growing downwards as on screen.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    /// Horizontal component (px).
    pub x: f32,
    /// Vertical component (px).
    pub y: f32,
}

impl Vector2 {
    /// The zero vector.
    pub const ZERO: Vector2 = Vector2::new(0.0, 0.0);

    /// Construct a new vector.
    ///
    /// # Arguments
    ///
    /// * `x`: Horizontal component in pixels.
    /// * `y`: Vertical component in pixels.
    pub const fn new(x: f32, y: f32) -> Self {
        Vector2 { x, y }
    }

    /// Euclidean length of the vector.
    pub fn length(self) -> f32 {
        sqrtf(self.x * self.x + self.y * self.y)
    }

    /// Returns `true` if both components are exactly zero.
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Scale the vector to unit length.
    ///
    /// A vector shorter than [`NORMALIZE_EPSILON`] (or one with non-finite
    /// components) has no meaningful direction and yields [`Vector2::ZERO`]
    /// instead of NaN components.
    ///
    /// # Returns
    ///
    /// A unit vector pointing the same way, or the zero vector.
    pub fn normalize_or_zero(self) -> Self {
        let len = self.length();
        if !len.is_finite() || len < NORMALIZE_EPSILON {
            return Vector2::ZERO;
        }
        Vector2::new(self.x / len, self.y / len)
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Vector2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: f32) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Mapping between continuous pixel space and integer tile indices.
///
/// Tiles are square, `tile_size` pixels wide, with tile `(0, 0)` covering
/// `[0, tile_size) x [0, tile_size)`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileFrame {
    /// Edge length of a tile (px).
    tile_size: f32,
}

impl TileFrame {
    /// Construct a new tile frame.
    ///
    /// # Arguments
    ///
    /// * `tile_size`: Edge length of one tile in pixels.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidTileSize)` if `tile_size` is not positive and finite.
    pub fn new(tile_size: f32) -> Result<Self, KinematicsError> {
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(KinematicsError::InvalidTileSize("must be positive and finite"));
        }
        Ok(TileFrame { tile_size })
    }

    /// Returns the tile size.
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Converts a pixel position to the `(column, row)` of the tile containing it.
    ///
    /// Uses floor division, so positions left of or above the origin map to
    /// negative indices rather than being folded onto tile zero.
    pub fn tile_of(&self, p: Vector2) -> (i32, i32) {
        (
            floorf(p.x / self.tile_size) as i32,
            floorf(p.y / self.tile_size) as i32,
        )
    }

    /// Returns the pixel position of the center of tile `(col, row)`.
    pub fn tile_center(&self, col: i32, row: i32) -> Vector2 {
        Vector2::new(
            (col as f32 + 0.5) * self.tile_size,
            (row as f32 + 0.5) * self.tile_size,
        )
    }

    /// Returns the top-left pixel corner of tile `(col, row)`.
    pub fn tile_origin(&self, col: i32, row: i32) -> Vector2 {
        Vector2::new(col as f32 * self.tile_size, row as f32 * self.tile_size)
    }

    /// Returns `true` if `p` lies inside the bounds of tile `(col, row)`.
    pub fn tile_contains(&self, col: i32, row: i32, p: Vector2) -> bool {
        self.tile_of(p) == (col, row)
    }
}

impl fmt::Display for TileFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileFrame (tile: {:.1} px)", self.tile_size)
    }
}

/// Constant-speed stepper.
///
/// Moves a point a fixed distance per tick along a direction vector.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantSpeed {
    /// Distance travelled per tick (px).
    speed: f32,
}

impl ConstantSpeed {
    /// Construct a new stepper.
    ///
    /// # Arguments
    ///
    /// * `speed`: Distance covered per tick, in pixels.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidSpeed)` if `speed` is not positive and finite.
    pub fn new(speed: f32) -> Result<Self, KinematicsError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(KinematicsError::InvalidSpeed("must be positive and finite"));
        }
        Ok(ConstantSpeed { speed })
    }

    /// Returns the speed.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Advances `position` by one tick along `direction`.
    ///
    /// `direction` is expected to be a unit vector or zero; a zero direction
    /// leaves the position unchanged.
    ///
    /// # Returns
    ///
    /// The new position.
    pub fn step(&self, position: Vector2, direction: Vector2) -> Vector2 {
        position + direction * self.speed
    }
}

impl fmt::Display for ConstantSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConstantSpeed ({:.2} px/tick)", self.speed)
    }
}
