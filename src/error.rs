//! Error types for the singledetect crate.

use crate::point::PointId;

/// Error type for all fallible operations in the singledetect crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DetectError {
    /// Returned when a k-NN query asks for a negative number of neighbors.
    #[error("k must be >= 0, got {k}")]
    NegativeK {
        /// The invalid k value.
        k: i64,
    },

    /// Returned when the detection threshold is non-finite or not positive.
    #[error("max distance must be finite and positive, got {max_distance}")]
    InvalidMaxDistance {
        /// The invalid threshold.
        max_distance: f64,
    },

    /// Returned when a viewport has non-finite bounds or zero extent on an axis.
    #[error("invalid viewport [{min_x}, {max_x}] x [{min_y}, {max_y}]")]
    InvalidViewport {
        /// Minimum X bound.
        min_x: f64,
        /// Minimum Y bound.
        min_y: f64,
        /// Maximum X bound.
        max_x: f64,
        /// Maximum Y bound.
        max_y: f64,
    },

    /// Returned when a cell side would let a neighbor escape the 3x3 block.
    #[error("cell side {cell_side} must be finite and >= max distance {max_distance}")]
    InvalidCellSide {
        /// The rejected cell side.
        cell_side: f64,
        /// The configured threshold.
        max_distance: f64,
    },

    /// Returned when the viewport and cell side call for more than
    /// [`MAX_GRID_CELLS`](crate::MAX_GRID_CELLS) cells.
    #[error("grid of {grid_width}x{grid_height} cells exceeds the limit of {max_cells} cells")]
    GridTooLarge {
        /// Cells along the X axis.
        grid_width: usize,
        /// Cells along the Y axis.
        grid_height: usize,
        /// The cell limit.
        max_cells: usize,
    },

    /// Returned when a point has a NaN or infinite coordinate.
    #[error("point {id} has non-finite position ({x}, {y})")]
    NonFinitePosition {
        /// Identifier of the offending point.
        id: PointId,
        /// The rejected X coordinate.
        x: f64,
        /// The rejected Y coordinate.
        y: f64,
    },

    /// Returned when two input points share an identifier.
    #[error("duplicate point id {id}")]
    DuplicatePointId {
        /// The repeated identifier.
        id: PointId,
    },

    /// Returned when a relocation names a slot past the end of the point set.
    #[error("point index {index} out of range for {len} points")]
    PointIndexOutOfRange {
        /// The requested slot.
        index: usize,
        /// Number of points owned by the engine.
        len: usize,
    },

    /// Returned when a relocation names an identifier the engine does not own.
    #[error("unknown point id {id}")]
    UnknownPointId {
        /// The requested identifier.
        id: PointId,
    },
}

/// Result type alias for operations that may fail with a [`DetectError`].
pub type Result<T> = std::result::Result<T, DetectError>;
