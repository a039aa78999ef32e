//! Errors raised by the [`Grid`](crate::Grid) container.

use crate::geom::Point;

/// Precondition failures of [`Grid`](crate::Grid) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("cell {point} is outside the {width}x{height} grid")]
    OutOfBounds { point: Point, width: i32, height: i32 },
    #[error("grid dimensions are already set")]
    AlreadySized,
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("expected {expected} cells, found {found}")]
    CellCount { expected: usize, found: usize },
}
