//! Spatial indexing over the grid

pub mod grid;

pub use grid::Grid;
