//! Cells: one slot in a linear container.

use crate::error::{LayoutError, Result};
use crate::id::{CellId, ContainerId, ObjectId};
use serde::{Deserialize, Serialize};
use sizer_core::{Alignment, Alignments, Axis, Borders, Point, Proportions, Size};

/// What a cell holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Payload {
    /// Empty space of a fixed minimum size
    Spacer(Size),
    /// A registered managed object
    Object(ObjectId),
    /// A nested container
    Container(ContainerId),
}

impl From<Size> for Payload {
    fn from(size: Size) -> Self {
        Self::Spacer(size)
    }
}

impl From<ObjectId> for Payload {
    fn from(id: ObjectId) -> Self {
        Self::Object(id)
    }
}

impl From<ContainerId> for Payload {
    fn from(id: ContainerId) -> Self {
        Self::Container(id)
    }
}

/// Insertion parameters of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CellOptions {
    /// Growth weights
    pub proportions: Proportions,
    /// Cross-axis placement
    pub alignments: Alignments,
    /// Insets around the payload
    pub borders: Borders,
}

impl CellOptions {
    /// Options with zero proportions, expanding alignments and no borders.
    ///
    /// Payloads fill the cross axis by default. Layouts ported from sizers
    /// where an unset alignment means "start edge, at the minimum" need an
    /// explicit `alignments(Alignment::Min, Alignment::Min)`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both proportions.
    #[must_use]
    pub const fn proportions(mut self, horizontal: f32, vertical: f32) -> Self {
        self.proportions = Proportions::new(horizontal, vertical);
        self
    }

    /// Set the proportion along one axis.
    #[must_use]
    pub const fn proportion(mut self, axis: Axis, weight: f32) -> Self {
        self.proportions = self.proportions.with_along(axis, weight);
        self
    }

    /// Set both alignments.
    #[must_use]
    pub const fn alignments(mut self, horizontal: Alignment, vertical: Alignment) -> Self {
        self.alignments = Alignments::new(horizontal, vertical);
        self
    }

    /// Set the insets.
    #[must_use]
    pub const fn borders(mut self, borders: Borders) -> Self {
        self.borders = borders;
        self
    }

    /// Same inset on every side.
    #[must_use]
    pub const fn border(mut self, inset: i32) -> Self {
        self.borders = Borders::uniform(inset);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let Proportions {
            horizontal,
            vertical,
        } = self.proportions;
        for weight in [horizontal, vertical] {
            if !sizer_core::is_valid_weight(weight) {
                return Err(LayoutError::InvalidProportion(weight));
            }
        }
        Ok(())
    }
}

/// One slot of a linear container.
///
/// Cells are created by container insertions and owned by their container.
/// A detached cell can be handed to [`LayoutTree::insert_cell`](crate::LayoutTree::insert_cell).
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub(crate) id: CellId,
    pub(crate) payload: Payload,
    pub(crate) options: CellOptions,
    pub(crate) min_size: Size,
    pub(crate) size: Size,
    pub(crate) payload_offset: Point,
    pub(crate) preserve_payload: bool,
}

impl Cell {
    pub(crate) fn new(id: CellId, payload: Payload, options: CellOptions) -> Self {
        Self {
            id,
            payload,
            options,
            min_size: Size::ZERO,
            size: Size::ZERO,
            payload_offset: Point::ORIGIN,
            preserve_payload: false,
        }
    }

    /// Cell identifier.
    #[must_use]
    pub const fn id(&self) -> CellId {
        self.id
    }

    /// The cell's payload.
    #[must_use]
    pub const fn payload(&self) -> Payload {
        self.payload
    }

    /// Insertion parameters.
    #[must_use]
    pub const fn options(&self) -> &CellOptions {
        &self.options
    }

    /// Cached minimum size: payload minimum plus borders.
    #[must_use]
    pub const fn min_size(&self) -> Size {
        self.min_size
    }

    /// Size allocated by the last distribution.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Payload position relative to the cell's top-left corner.
    #[must_use]
    pub const fn payload_offset(&self) -> Point {
        self.payload_offset
    }

    /// Whether destroying the cell leaves the payload alive.
    #[must_use]
    pub const fn preserves_payload(&self) -> bool {
        self.preserve_payload
    }

    /// Size to request from the payload when the cell is given `size`.
    ///
    /// Along the growth axis a flexible cell hands over its full inner length
    /// and a fixed cell the payload minimum. Along the cross axis `Expand`
    /// hands over the full inner length and any other alignment the minimum.
    pub(crate) fn payload_request(&self, axis: Axis, size: Size) -> Size {
        let inner = self.options.borders.inner(size);
        let payload_min = self.options.borders.inner(self.min_size);
        let cross = axis.cross();

        let growth = if self.options.proportions.along(axis) > 0.0 {
            inner.along(axis)
        } else {
            payload_min.along(axis)
        };
        let across = if self.options.alignments.along(cross) == Alignment::Expand {
            inner.along(cross)
        } else {
            payload_min.along(cross)
        };
        Size::from_axes(axis, growth, across)
    }

    /// Record the allocated size and derive the payload offset from the size
    /// the payload actually took.
    ///
    /// A payload that took more than it was offered along the growth axis
    /// widens the cell, so the cells after it move along.
    pub(crate) fn finish_placement(&mut self, axis: Axis, size: Size, taken: Size) {
        if matches!(self.payload, Payload::Spacer(_)) {
            self.size = size;
            self.payload_offset = Point::ORIGIN;
            return;
        }

        let borders = self.options.borders;
        let length = size.along(axis).max(borders.outer(taken).along(axis));
        self.size = size.with_along(axis, length);
        let cross = axis.cross();
        let inner = borders.inner(size);
        let shift = self
            .options
            .alignments
            .along(cross)
            .offset(inner.along(cross), taken.along(cross));
        self.payload_offset = borders.offset() + Point::from_axes(axis, 0, shift);
    }
}
