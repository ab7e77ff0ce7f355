//! Mathematical utilities: the log-diameter grid.

pub mod grid;

pub use grid::*;
