/*

A* = f(n) = g(n) + h(n)

Where:
    n = a tile of the grid
    g(n) = number of steps from start to n
    h(n) = Manhattan distance from n to the goal
    f(n) = estimated length of the shortest path through n

Initialize:
    - heap of tiles to explore, ordered by f, ties by insertion order
    - set of closed tiles
    - start tile, g(start) = 0, f(start) = h(start)

Loop:
    - pop tile with lowest f from the heap (skip it if already closed)
    - if it is the goal, rebuild the path
    - close it
    - for each walkable neighbor that is not closed:
        - if g(n) + 1 improves on the neighbor's best g, record it and push it

With unit steps the Manhattan heuristic is consistent, so a closed tile is
never reached more cheaply later and is never reopened.

*/

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;

use crate::error::NavigationError;
use crate::map::{Grid, TileCoord};
use crate::path::Path;

/// Represents the result of an A* search with metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    /// The computed path, if one was found.
    pub path: Option<Path>,
    /// The total cost (number of steps) of the path.
    pub total_cost: Option<u32>,
    /// The number of tiles expanded during the search.
    pub nodes_explored: usize,
    /// The length of the path (number of waypoints).
    pub path_length: usize,
}

impl PathResult {
    /// Creates a new PathResult for a successful search.
    pub fn success(path: Path, total_cost: u32, nodes_explored: usize) -> Self {
        let path_length = path.len();
        Self {
            path: Some(path),
            total_cost: Some(total_cost),
            nodes_explored,
            path_length,
        }
    }

    /// Creates a new PathResult for a failed search.
    pub fn failure(nodes_explored: usize) -> Self {
        Self {
            path: None,
            total_cost: None,
            nodes_explored,
            path_length: 0,
        }
    }

    /// Returns true if a path was found.
    pub fn is_success(&self) -> bool {
        self.path.is_some()
    }

    /// Returns the path if one was found.
    pub fn into_path(self) -> Option<Path> {
        self.path
    }
}

impl fmt::Display for PathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(_) => write!(
                f,
                "PathResult {{ success: true, path_length: {}, total_cost: {}, nodes_explored: {} }}",
                self.path_length,
                self.total_cost.unwrap_or(0),
                self.nodes_explored
            ),
            None => write!(
                f,
                "PathResult {{ success: false, nodes_explored: {} }}",
                self.nodes_explored
            ),
        }
    }
}

/// Calculates the Manhattan distance between two tiles.
pub fn manhattan_distance(a: TileCoord, b: TileCoord) -> u32 {
    a.manhattan_distance(b)
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
struct State {
    cost: u32,
    sequence: u64,
    position: TileCoord,
}

// BinaryHeap is a max-heap: flip both keys so the lowest f, then the earliest
// pushed entry, comes out first.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Walks the `came_from` links back from the goal; the start is left out.
fn reconstruct_path(came_from: &HashMap<TileCoord, TileCoord>, mut current: TileCoord) -> Path {
    let mut waypoints = vec![current];
    while let Some(&previous) = came_from.get(&current) {
        waypoints.push(previous);
        current = previous;
    }
    waypoints.pop();
    waypoints.reverse();
    Path::from_waypoints(waypoints)
}

/// Finds a shortest 4-connected path from `start` to `goal`.
///
/// # Arguments
/// * `grid` - The grid to plan in.
/// * `start` - Starting tile; excluded from the returned path.
/// * `goal` - Goal tile; the last waypoint of the returned path.
///
/// # Returns
/// * `Ok(Path)` - The path; empty when `start == goal`.
/// * `Err(NavigationError::InvalidRequest)` - `start` or `goal` is out of bounds.
/// * `Err(NavigationError::NoPathFound)` - The goal is unreachable.
pub fn astar_search(grid: &Grid, start: TileCoord, goal: TileCoord) -> Result<Path, NavigationError> {
    astar_search_detailed(grid, start, goal)?
        .into_path()
        .ok_or(NavigationError::NoPathFound { start, goal })
}

/// Finds a path like [`astar_search`], returning search metadata as well.
///
/// An unreachable goal is reported as a failed [`PathResult`] rather than an
/// error; only out-of-bounds requests are errors here.
///
/// # Arguments
/// * `grid` - The grid to plan in.
/// * `start` - Starting tile.
/// * `goal` - Goal tile.
pub fn astar_search_detailed(
    grid: &Grid,
    start: TileCoord,
    goal: TileCoord,
) -> Result<PathResult, NavigationError> {
    if !grid.in_bounds(start) || !grid.in_bounds(goal) {
        return Err(NavigationError::InvalidRequest { start, goal });
    }
    if start == goal {
        return Ok(PathResult::success(Path::new(), 0, 0));
    }

    let mut nodes_explored = 0;
    let mut sequence: u64 = 0;

    let mut open_set = BinaryHeap::new();
    let mut closed: HashSet<TileCoord> = HashSet::new();
    let mut came_from: HashMap<TileCoord, TileCoord> = HashMap::new();
    let mut g_score: HashMap<TileCoord, u32> = HashMap::new();
    g_score.insert(start, 0);

    open_set.push(State {
        cost: manhattan_distance(start, goal),
        sequence,
        position: start,
    });

    while let Some(State {
        position: current, ..
    }) = open_set.pop()
    {
        // Stale entry left behind by a later improvement
        if !closed.insert(current) {
            continue;
        }
        nodes_explored += 1;

        let current_g = g_score.get(&current).copied().unwrap_or(0);
        if current == goal {
            let path = reconstruct_path(&came_from, current);
            return Ok(PathResult::success(path, current_g, nodes_explored));
        }

        for neighbor in grid.neighbors(current) {
            if closed.contains(&neighbor) {
                continue;
            }
            let tentative_g_score = current_g + 1;
            if tentative_g_score < g_score.get(&neighbor).copied().unwrap_or(u32::MAX) {
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative_g_score);
                sequence += 1;
                open_set.push(State {
                    cost: tentative_g_score + manhattan_distance(neighbor, goal),
                    sequence,
                    position: neighbor,
                });
            }
        }
    }

    Ok(PathResult::failure(nodes_explored))
}
