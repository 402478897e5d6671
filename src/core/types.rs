//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Simulation tick counter
pub type Tick = u64;

/// Identifier of a colony (one queen, one hive, one roster)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColonyId(pub usize);

/// Stable handle of a bee: its colony plus its slot in that colony's roster.
///
/// Slots are never reused, so a handle stays valid (and points at a dead
/// record) after the bee dies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BeeId {
    pub colony: ColonyId,
    pub slot: usize,
}

impl BeeId {
    pub fn new(colony: ColonyId, slot: usize) -> Self {
        Self { colony, slot }
    }
}

/// Identifier of a wasp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaspId(pub usize);

/// Integer cell on the grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    pub fn manhattan(&self, other: &Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn euclidean(&self, other: &Self) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Fixed rectangular bounds `[0, width) x [0, height)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    /// Clamp a position into bounds. Out-of-bounds moves land on the edge.
    pub fn clamp(&self, pos: GridPos) -> GridPos {
        GridPos::new(
            pos.x.clamp(0, self.width - 1),
            pos.y.clamp(0, self.height - 1),
        )
    }

    pub fn cell_count(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    /// Every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = GridPos> + '_ {
        (0..self.width).flat_map(move |x| (0..self.height).map(move |y| GridPos::new(x, y)))
    }
}

/// Square window of cells, already clipped to grid bounds (inclusive corners)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub min: GridPos,
    pub max: GridPos,
}

impl Window {
    /// Window of the given half-width around `center`, clipped to `bounds`
    ///
    /// Half-widths past the grid's longer side see the whole grid.
    pub fn around(center: GridPos, half_width: i32, bounds: &Bounds) -> Self {
        let half_width = half_width.clamp(0, bounds.width.max(bounds.height));
        let min = bounds.clamp(center.offset(-half_width, -half_width));
        let max = bounds.clamp(center.offset(half_width, half_width));
        Self { min, max }
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        (self.min.x..=self.max.x).contains(&pos.x) && (self.min.y..=self.max.y).contains(&pos.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_keeps_positions_on_grid() {
        let bounds = Bounds::new(10, 5);
        assert_eq!(bounds.clamp(GridPos::new(-1, 2)), GridPos::new(0, 2));
        assert_eq!(bounds.clamp(GridPos::new(10, 5)), GridPos::new(9, 4));
        assert_eq!(bounds.clamp(GridPos::new(3, 3)), GridPos::new(3, 3));
    }

    #[test]
    fn test_distances() {
        let a = GridPos::new(0, 0);
        let b = GridPos::new(3, 4);
        assert_eq!(a.manhattan(&b), 7);
        assert!((a.euclidean(&b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_is_clipped() {
        let bounds = Bounds::new(10, 10);
        let window = Window::around(GridPos::new(1, 8), 3, &bounds);
        assert_eq!(window.min, GridPos::new(0, 5));
        assert_eq!(window.max, GridPos::new(4, 9));
        assert!(window.contains(GridPos::new(0, 9)));
        assert!(!window.contains(GridPos::new(5, 9)));
    }

    #[test]
    fn test_huge_window_covers_grid() {
        let bounds = Bounds::new(10, 6);
        let window = Window::around(GridPos::new(4, 4), i32::MAX, &bounds);
        assert_eq!(window.min, GridPos::new(0, 0));
        assert_eq!(window.max, GridPos::new(9, 5));
        assert_eq!(GridPos::new(i32::MAX - 1, 0).offset(5, -1), GridPos::new(i32::MAX, -1));
    }

    #[test]
    fn test_bee_id_orders_by_colony_then_slot() {
        let a = BeeId::new(ColonyId(0), 3);
        let b = BeeId::new(ColonyId(0), 4);
        let c = BeeId::new(ColonyId(1), 0);
        assert!(a < b);
        assert!(b < c);
    }
}
