//! Containers stored in the layout arena.

use crate::cell::Cell;
use crate::grid::GridState;
use crate::id::{CellId, ContainerId, ObjectId};
use serde::{Deserialize, Serialize};
use sizer_core::{Axis, Point, Size};

/// Who holds a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    /// The container sits in a cell of another container, or is a grid helper
    Container(ContainerId),
    /// The container governs the child layout of a managed object
    Object(ObjectId),
}

/// Location of a cell: container plus cell id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    /// Container holding the cell
    pub container: ContainerId,
    /// The cell
    pub cell: CellId,
}

impl CellRef {
    /// Create a new cell reference.
    #[must_use]
    pub const fn new(container: ContainerId, cell: CellId) -> Self {
        Self { container, cell }
    }
}

/// Cells and spacing of a linear container.
#[derive(Debug, Clone)]
pub(crate) struct LinearState {
    pub(crate) axis: Axis,
    pub(crate) gap: i32,
    pub(crate) cells: Vec<Cell>,
}

#[derive(Debug, Clone)]
pub(crate) enum ContainerKind {
    Linear(LinearState),
    Grid(Box<GridState>),
}

/// A linear or grid container.
#[derive(Debug, Clone)]
pub struct Container {
    pub(crate) id: ContainerId,
    pub(crate) kind: ContainerKind,
    pub(crate) default_size: Size,
    pub(crate) min_size: Size,
    pub(crate) size: Size,
    pub(crate) position: Point,
    pub(crate) stale: bool,
    pub(crate) owner: Option<Owner>,
    /// Set on the helper containers a grid builds for itself.
    pub(crate) grid: Option<ContainerId>,
}

impl Container {
    pub(crate) const fn new(id: ContainerId, kind: ContainerKind) -> Self {
        Self {
            id,
            kind,
            default_size: Size::ZERO,
            min_size: Size::ZERO,
            size: Size::ZERO,
            position: Point::ORIGIN,
            stale: true,
            owner: None,
            grid: None,
        }
    }

    pub(crate) const fn linear(id: ContainerId, axis: Axis, gap: i32) -> Self {
        Self::new(
            id,
            ContainerKind::Linear(LinearState {
                axis,
                gap,
                cells: Vec::new(),
            }),
        )
    }

    /// Container identifier.
    #[must_use]
    pub const fn id(&self) -> ContainerId {
        self.id
    }

    /// Growth axis, or `None` for a grid.
    #[must_use]
    pub const fn axis(&self) -> Option<Axis> {
        match &self.kind {
            ContainerKind::Linear(state) => Some(state.axis),
            ContainerKind::Grid(_) => None,
        }
    }

    /// Gap between consecutive cells; for a grid, the column gap.
    #[must_use]
    pub fn gap(&self) -> i32 {
        match &self.kind {
            ContainerKind::Linear(state) => state.gap,
            ContainerKind::Grid(grid) => grid.template.column_gap,
        }
    }

    /// Cells in order. Empty for a grid.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        match &self.kind {
            ContainerKind::Linear(state) => &state.cells,
            ContainerKind::Grid(_) => &[],
        }
    }

    /// Whether this is a grid container.
    #[must_use]
    pub const fn is_grid(&self) -> bool {
        matches!(self.kind, ContainerKind::Grid(_))
    }

    /// Explicit minimum floor.
    #[must_use]
    pub const fn default_size(&self) -> Size {
        self.default_size
    }

    /// Cached minimum size; current only when [`Container::is_stale`] is false.
    #[must_use]
    pub const fn min_size(&self) -> Size {
        self.min_size
    }

    /// Size from the last distribution.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Position from the last position pass.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Whether the cached minimum needs recomputing.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    /// Container or object holding this container.
    #[must_use]
    pub const fn owner(&self) -> Option<Owner> {
        self.owner
    }

    /// The grid maintaining this container, when it is a grid helper.
    #[must_use]
    pub const fn grid_owner(&self) -> Option<ContainerId> {
        self.grid
    }

    pub(crate) fn cell_index(&self, cell: CellId) -> Option<usize> {
        self.cells().iter().position(|c| c.id == cell)
    }

    pub(crate) fn linear_state(&self) -> Option<&LinearState> {
        match &self.kind {
            ContainerKind::Linear(state) => Some(state),
            ContainerKind::Grid(_) => None,
        }
    }

    pub(crate) fn linear_state_mut(&mut self) -> Option<&mut LinearState> {
        match &mut self.kind {
            ContainerKind::Linear(state) => Some(state),
            ContainerKind::Grid(_) => None,
        }
    }

    pub(crate) fn grid_state(&self) -> Option<&GridState> {
        match &self.kind {
            ContainerKind::Grid(grid) => Some(grid),
            ContainerKind::Linear(_) => None,
        }
    }

    pub(crate) fn grid_state_mut(&mut self) -> Option<&mut GridState> {
        match &mut self.kind {
            ContainerKind::Grid(grid) => Some(grid),
            ContainerKind::Linear(_) => None,
        }
    }
}
