//! Error types for layout operations.

use crate::id::{CellId, ContainerId, ObjectId};
use thiserror::Error;

/// Errors returned by [`LayoutTree`](crate::LayoutTree) operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// The container id does not name a live container.
    #[error("unknown {0}")]
    UnknownContainer(ContainerId),

    /// The object id does not name a registered object.
    #[error("unknown {0}")]
    UnknownObject(ObjectId),

    /// The cell is not part of the container.
    #[error("{cell} not found in {container}")]
    CellNotFound {
        /// Container that was searched
        container: ContainerId,
        /// Missing cell
        cell: CellId,
    },

    /// A positional index is past the end.
    #[error("index {index} out of range for {container} ({len} items)")]
    IndexOutOfRange {
        /// Container or grid addressed
        container: ContainerId,
        /// Requested index
        index: usize,
        /// Current number of items
        len: usize,
    },

    /// A grid operation was used on a linear container.
    #[error("{0} is not a grid")]
    NotAGrid(ContainerId),

    /// A linear-container operation was used on a grid.
    #[error("{0} is a grid; use the grid operations")]
    IsAGrid(ContainerId),

    /// The container is a helper maintained by a grid.
    #[error("{container} is maintained by grid {grid}")]
    GridInternal {
        /// Helper container
        container: ContainerId,
        /// Grid that maintains it
        grid: ContainerId,
    },

    /// Neither or both grid dimensions were fixed.
    #[error("invalid grid: rows={rows}, columns={columns} (exactly one must be nonzero)")]
    InvalidGrid {
        /// Requested row count
        rows: usize,
        /// Requested column count
        columns: usize,
    },

    /// A proportion was negative or not finite.
    #[error("invalid proportion {0} (must be finite and >= 0)")]
    InvalidProportion(f32),

    /// The container already sits in a cell or governs an object.
    #[error("{0} already has an owner")]
    AlreadyOwned(ContainerId),

    /// The object already sits in a cell.
    #[error("{0} is already placed in a cell")]
    AlreadyHosted(ObjectId),

    /// The payload is not an item of the grid.
    #[error("payload not found in {0}")]
    PayloadNotFound(ContainerId),

    /// The object is not placed in any cell.
    #[error("{0} is not placed in a cell")]
    NotHosted(ObjectId),

    /// The insertion would make a container its own ancestor.
    #[error("adding {child} to {parent} would create a cycle")]
    Cycle {
        /// Receiving container
        parent: ContainerId,
        /// Container being added
        child: ContainerId,
    },

    /// Flexible cells carry proportions that sum to zero.
    #[error("flexible cells in {0} have a zero proportion sum")]
    ZeroProportionSum(ContainerId),
}

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;
