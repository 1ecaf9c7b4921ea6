//! Error types for geometry operations.

use std::error::Error;
use std::fmt;

use trellis_core::ObjectId;
use trellis_store::StoreError;

/// One of the three grid axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// The x axis (fastest-varying in the flattened cell index).
    X,
    /// The y axis.
    Y,
    /// The z axis (slowest-varying).
    Z,
}

impl Axis {
    /// Index of the axis in dimension vectors: x = 0, y = 1, z = 2.
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        })
    }
}

/// Errors from rectilinear grid geometry operations.
///
/// Every failure is an explicit status; unsupported derived
/// quantities are reported as [`GeomError::Unsupported`], never as a
/// silently empty or zeroed result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GeomError {
    /// The id does not resolve to a live object.
    AbsentGeometry {
        /// The unresolvable id.
        id: ObjectId,
    },
    /// The object exists but is not a rectilinear grid geometry.
    NotAGeometry {
        /// The object's id.
        id: ObjectId,
    },
    /// A bound-array reference is unset, or its target no longer
    /// resolves to a float32 array.
    MissingBounds {
        /// The affected axis.
        axis: Axis,
    },
    /// A candidate bound array is not a one-component float32 array.
    InvalidBounds {
        /// The affected axis.
        axis: Axis,
    },
    /// A bound array holds fewer points than the cell-count vector
    /// requires (`cells + 1` per axis).
    BoundsTooShort {
        /// The affected axis.
        axis: Axis,
        /// Points required for the configured cell count.
        needed: usize,
        /// Points actually present.
        actual: usize,
    },
    /// Adjacent bounds produced a non-positive spacing.
    NonMonotonicBounds {
        /// The affected axis.
        axis: Axis,
        /// Index of the lower bound of the offending pair.
        index: usize,
    },
    /// The cell-count vector is zero on some axis, so the grid has no
    /// cells to derive from.
    EmptyGrid,
    /// A flattened or per-axis cell index is outside the grid.
    CellOutOfRange {
        /// The offending index.
        index: usize,
        /// The exclusive limit it was checked against.
        limit: usize,
    },
    /// The derived quantity is not defined for this geometry kind.
    Unsupported {
        /// Short name of the rejected operation.
        operation: &'static str,
    },
    /// An underlying store mutation failed.
    Store(StoreError),
}

impl fmt::Display for GeomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AbsentGeometry { id } => write!(f, "geometry {id} does not resolve"),
            Self::NotAGeometry { id } => {
                write!(f, "object {id} is not a rectilinear grid geometry")
            }
            Self::MissingBounds { axis } => {
                write!(f, "{axis}-axis bounds are unset or no longer resolve")
            }
            Self::InvalidBounds { axis } => {
                write!(
                    f,
                    "{axis}-axis bounds must be a one-component float32 array"
                )
            }
            Self::BoundsTooShort {
                axis,
                needed,
                actual,
            } => {
                write!(
                    f,
                    "{axis}-axis bounds hold {actual} points, {needed} required"
                )
            }
            Self::NonMonotonicBounds { axis, index } => {
                write!(
                    f,
                    "{axis}-axis bounds are non-increasing at index {index}"
                )
            }
            Self::EmptyGrid => write!(f, "grid has a zero cell count"),
            Self::CellOutOfRange { index, limit } => {
                write!(f, "cell index {index} outside grid of {limit}")
            }
            Self::Unsupported { operation } => {
                write!(
                    f,
                    "operation '{operation}' is not supported by rectilinear grids"
                )
            }
            Self::Store(e) => write!(f, "store operation failed: {e}"),
        }
    }
}

impl Error for GeomError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for GeomError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
