pub mod arrow;

pub use arrow::GridCellsToArrow;
