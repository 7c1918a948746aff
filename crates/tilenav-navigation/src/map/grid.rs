#![warn(missing_docs)]

use rand::Rng;

use super::TileCoord;
use crate::error::NavigationError;

/// Offsets visited by [`Grid::neighbors`], in order: left, right, up, down.
///
/// The search engine expands neighbors in this order, so it fixes how ties
/// between equally short paths are broken.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// State of one grid cell.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    /// Cell blocked by an obstacle; never occupied or traversed.
    Obstacle = 0,
    /// Cell the agent may occupy and traverse.
    Walkable = 1,
}

impl CellState {
    /// Creates a CellState from a map value: `0` is an obstacle, anything else is walkable.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => CellState::Obstacle,
            _ => CellState::Walkable,
        }
    }

    /// Returns `true` for [`CellState::Walkable`].
    pub fn is_walkable(&self) -> bool {
        matches!(self, CellState::Walkable)
    }
}

impl std::fmt::Display for CellState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellState::Obstacle => write!(f, "Obstacle"),
            CellState::Walkable => write!(f, "Walkable"),
        }
    }
}

/// A rectangular binary obstacle map.
///
/// Dimensions are fixed at construction. Cells are stored row-major and
/// addressed by [`TileCoord`] with `0 <= x < width`, `0 <= y < height`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    /// Width of the grid in cells
    width: usize,
    /// Height of the grid in cells
    height: usize,
    /// Vector storing the state of each cell
    data: Vec<CellState>,
}

impl Grid {
    /// Creates a new, fully walkable grid.
    ///
    /// # Arguments
    /// * `width` - Width of the grid in cells
    /// * `height` - Height of the grid in cells
    ///
    /// # Returns
    /// * `Result<Self, NavigationError>` - The created grid or an error if the dimensions are invalid
    pub fn new(width: usize, height: usize) -> Result<Self, NavigationError> {
        Self::check_dimensions(width, height)?;
        Ok(Grid {
            width,
            height,
            data: vec![CellState::Walkable; width * height],
        })
    }

    /// Builds a grid from a row-major binary array, `rows[y][x]`.
    ///
    /// `0` marks an obstacle, any other value a walkable cell.
    ///
    /// # Returns
    /// * `Result<Self, NavigationError>` - The grid, or `InvalidDimensions` for an empty or ragged array
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, NavigationError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        Self::check_dimensions(width, height)?;

        let mut data = Vec::with_capacity(width * height);
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(NavigationError::InvalidDimensions("All rows must have the same length"));
            }
            data.extend(row.iter().map(|&v| CellState::from_u8(v)));
        }

        Ok(Grid { width, height, data })
    }

    /// Creates a grid where each cell is independently an obstacle with
    /// probability `obstacle_ratio`.
    ///
    /// # Arguments
    /// * `width` - Width of the grid in cells
    /// * `height` - Height of the grid in cells
    /// * `obstacle_ratio` - Probability in `[0, 1]` that a cell is an obstacle
    /// * `rng` - Random number generator
    pub fn random<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        obstacle_ratio: f64,
        rng: &mut R,
    ) -> Result<Self, NavigationError> {
        if !(0.0..=1.0).contains(&obstacle_ratio) {
            return Err(NavigationError::InvalidParameter("Obstacle ratio must be within [0, 1]"));
        }
        let mut grid = Self::new(width, height)?;
        for cell in grid.data.iter_mut() {
            if rng.random_bool(obstacle_ratio) {
                *cell = CellState::Obstacle;
            }
        }
        Ok(grid)
    }

    fn check_dimensions(width: usize, height: usize) -> Result<(), NavigationError> {
        if width == 0 || height == 0 {
            return Err(NavigationError::InvalidDimensions("Width and height must be non-zero"));
        }
        // Tile coordinates are i32
        if width > i32::MAX as usize || height > i32::MAX as usize || width.checked_mul(height).is_none() {
            return Err(NavigationError::InvalidDimensions("Map dimensions too large"));
        }
        Ok(())
    }

    /// Calculates the index in the data vector, or `None` when out of bounds
    fn get_index(&self, p: TileCoord) -> Option<usize> {
        if self.in_bounds(p) {
            Some(p.y as usize * self.width + p.x as usize)
        } else {
            None
        }
    }

    /// Width of the grid in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the grid in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `true` if `p` addresses a cell of this grid.
    pub fn in_bounds(&self, p: TileCoord) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }

    /// Gets the state of a cell, or `None` when out of bounds.
    pub fn cell(&self, p: TileCoord) -> Option<CellState> {
        self.get_index(p).map(|i| self.data[i])
    }

    /// Sets the state of a cell.
    ///
    /// Intended for building maps before they are handed to a coordinator,
    /// which only ever reads its grid.
    ///
    /// # Returns
    /// * `Result<(), NavigationError>` - Success or `OutOfBounds`
    pub fn set_cell(&mut self, p: TileCoord, state: CellState) -> Result<(), NavigationError> {
        let index = self.get_index(p).ok_or(NavigationError::OutOfBounds(p))?;
        self.data[index] = state;
        Ok(())
    }

    /// Returns `false` for out-of-bounds or obstacle cells, `true` otherwise.
    pub fn is_walkable(&self, p: TileCoord) -> bool {
        self.cell(p).is_some_and(|c| c.is_walkable())
    }

    /// Yields the in-bounds walkable 4-neighbors of `p`, in [`NEIGHBOR_OFFSETS`] order.
    ///
    /// Any input is accepted; a tile with no walkable neighbors yields nothing.
    pub fn neighbors(&self, p: TileCoord) -> impl Iterator<Item = TileCoord> + '_ {
        NEIGHBOR_OFFSETS
            .iter()
            .map(move |&(dx, dy)| p.offset(dx, dy))
            .filter(|&n| self.is_walkable(n))
    }

    /// Number of walkable cells.
    pub fn walkable_count(&self) -> usize {
        self.data.iter().filter(|c| c.is_walkable()).count()
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Grid ({}x{})", self.width, self.height)?;
        for row in self.data.chunks(self.width) {
            for cell in row {
                write!(f, "{}", if cell.is_walkable() { '.' } else { '#' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
