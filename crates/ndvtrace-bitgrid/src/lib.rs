#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// packed boolean grid.
pub mod grid;

/// morphological erosion of a grid.
pub mod erode;

/// Error types for the bitgrid module.
pub mod error;

pub use crate::erode::RowWindow;
pub use crate::error::BitGridError;
pub use crate::grid::{BitGrid, GridSize};
