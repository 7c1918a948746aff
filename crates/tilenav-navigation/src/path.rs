//! The waypoint queue handed from the search engine to the motion controller.

use std::collections::VecDeque;
use std::fmt;

use crate::map::TileCoord;

/// Ordered waypoints from (but excluding) a start tile to (and including) a goal.
///
/// Consecutive waypoints are 4-adjacent. The queue is consumed from the
/// front as the agent reaches each tile. An empty path means either "already
/// at the goal" or "nothing left to follow".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    waypoints: VecDeque<TileCoord>,
}

impl Path {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a path from waypoints in travel order.
    pub fn from_waypoints(waypoints: Vec<TileCoord>) -> Self {
        Self {
            waypoints: waypoints.into(),
        }
    }

    /// The next waypoint to reach.
    pub fn head(&self) -> Option<TileCoord> {
        self.waypoints.front().copied()
    }

    /// The final waypoint.
    pub fn goal(&self) -> Option<TileCoord> {
        self.waypoints.back().copied()
    }

    /// Removes and returns the next waypoint.
    pub fn pop_head(&mut self) -> Option<TileCoord> {
        self.waypoints.pop_front()
    }

    /// Number of waypoints left.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Returns `true` if no waypoints are left.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Iterates over the remaining waypoints in travel order.
    pub fn iter(&self) -> impl Iterator<Item = &TileCoord> + '_ {
        self.waypoints.iter()
    }

    /// Copies the remaining waypoints into a `Vec`.
    pub fn to_vec(&self) -> Vec<TileCoord> {
        self.waypoints.iter().copied().collect()
    }
}

impl FromIterator<TileCoord> for Path {
    fn from_iter<I: IntoIterator<Item = TileCoord>>(iter: I) -> Self {
        Self {
            waypoints: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, p) in self.waypoints.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_consumed_from_front() {
        let mut path = Path::from_waypoints(vec![
            TileCoord::new(1, 0),
            TileCoord::new(2, 0),
            TileCoord::new(2, 1),
        ]);
        assert_eq!(path.len(), 3);
        assert_eq!(path.head(), Some(TileCoord::new(1, 0)));
        assert_eq!(path.goal(), Some(TileCoord::new(2, 1)));

        assert_eq!(path.pop_head(), Some(TileCoord::new(1, 0)));
        assert_eq!(path.head(), Some(TileCoord::new(2, 0)));
        assert_eq!(path.to_vec(), vec![TileCoord::new(2, 0), TileCoord::new(2, 1)]);

        path.pop_head();
        path.pop_head();
        assert!(path.is_empty());
        assert_eq!(path.head(), None);
        assert_eq!(path.pop_head(), None);
    }

    #[test]
    fn test_display() {
        let path: Path = [(0, 1), (0, 2)].into_iter().map(TileCoord::from).collect();
        assert_eq!(format!("{}", path), "[(0, 1) -> (0, 2)]");
        assert_eq!(format!("{}", Path::new()), "[]");
    }
}
