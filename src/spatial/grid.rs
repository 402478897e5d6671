//! Dense per-cell storage over the simulation grid

use crate::core::types::{Bounds, GridPos};

/// Generic 2D grid holding one value per cell
#[derive(Debug, Clone)]
pub struct Grid<T: Clone + Default> {
    bounds: Bounds,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            data: vec![T::default(); bounds.cell_count()],
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    fn index(&self, pos: GridPos) -> Option<usize> {
        if self.bounds.contains(pos) {
            Some(pos.y as usize * self.bounds.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, pos: GridPos) -> Option<&T> {
        self.index(pos).map(|i| &self.data[i])
    }

    #[inline]
    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut T> {
        self.index(pos).map(move |i| &mut self.data[i])
    }

    /// Write a value; positions outside the grid are ignored
    #[inline]
    pub fn set(&mut self, pos: GridPos, value: T) {
        if let Some(i) = self.index(pos) {
            self.data[i] = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_roundtrip_in_bounds() {
        let mut grid: Grid<Option<usize>> = Grid::new(Bounds::new(4, 3));
        grid.set(GridPos::new(3, 2), Some(7));
        assert_eq!(grid.get(GridPos::new(3, 2)), Some(&Some(7)));
        assert_eq!(grid.get(GridPos::new(0, 0)), Some(&None));
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut grid: Grid<u8> = Grid::new(Bounds::new(2, 2));
        grid.set(GridPos::new(2, 0), 9);
        assert_eq!(grid.get(GridPos::new(2, 0)), None);
        assert_eq!(grid.get(GridPos::new(-1, 0)), None);
        assert!(grid.get_mut(GridPos::new(0, 5)).is_none());
    }
}
