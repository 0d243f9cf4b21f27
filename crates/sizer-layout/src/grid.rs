//! Grid containers.
//!
//! A grid turns a flat insertion sequence into a table. Exactly one dimension
//! is fixed: with a fixed column count items flow row by row, with a fixed row
//! count they flow column by column.
//!
//! Internally a grid keeps two linear helper containers fed with the same items:
//!
//! - the **column tracker** (horizontal) holds one vertical container per
//!   column and only serves to measure column widths;
//! - the **row tracker** (vertical) holds one horizontal container per row.
//!   Each item sits in an inner horizontal container, itself in an outer
//!   vertical container that fills the row height. The outer containers are
//!   given the measured column widths as their default size before the row
//!   tracker is laid out.
//!
//! The grid keeps a record of every item's insertion parameters. Inserting
//! anywhere but the end, removing, or changing an item's options rebuilds both
//! trackers from the records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sizer_core::{is_valid_weight, Alignment, Axis, Size};
use tracing::debug;

use crate::cell::{CellOptions, Payload};
use crate::container::{CellRef, Container, ContainerKind, Owner};
use crate::error::{LayoutError, Result};
use crate::id::{CellId, ContainerId};
use crate::tree::LayoutTree;

/// Direction in which items fill the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GridAutoFlow {
    /// Fill rows first (column count fixed)
    #[default]
    Row,
    /// Fill columns first (row count fixed)
    Column,
}

/// Grid dimensions and gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridTemplate {
    /// Fixed row count, or 0 when columns are fixed
    pub rows: usize,
    /// Fixed column count, or 0 when rows are fixed
    pub columns: usize,
    /// Gap between columns
    pub column_gap: i32,
    /// Gap between rows
    pub row_gap: i32,
}

impl GridTemplate {
    /// Grid with a fixed number of columns.
    #[must_use]
    pub const fn columns(columns: usize) -> Self {
        Self {
            rows: 0,
            columns,
            column_gap: 0,
            row_gap: 0,
        }
    }

    /// Grid with a fixed number of rows.
    #[must_use]
    pub const fn rows(rows: usize) -> Self {
        Self {
            rows,
            columns: 0,
            column_gap: 0,
            row_gap: 0,
        }
    }

    /// Set column gap.
    #[must_use]
    pub const fn with_column_gap(mut self, gap: i32) -> Self {
        self.column_gap = gap;
        self
    }

    /// Set row gap.
    #[must_use]
    pub const fn with_row_gap(mut self, gap: i32) -> Self {
        self.row_gap = gap;
        self
    }

    /// Set both gaps.
    #[must_use]
    pub const fn with_gap(mut self, gap: i32) -> Self {
        self.column_gap = gap;
        self.row_gap = gap;
        self
    }

    /// Fill direction implied by the fixed dimension.
    #[must_use]
    pub const fn auto_flow(&self) -> GridAutoFlow {
        if self.columns > 0 {
            GridAutoFlow::Row
        } else {
            GridAutoFlow::Column
        }
    }

    /// Check that exactly one dimension is fixed.
    pub fn validate(&self) -> Result<()> {
        if (self.rows == 0) == (self.columns == 0) {
            return Err(LayoutError::InvalidGrid {
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(())
    }

    /// `(row, column)` of the item at flat `index`.
    #[must_use]
    pub fn position_of(&self, index: usize) -> (usize, usize) {
        match self.auto_flow() {
            GridAutoFlow::Row => (index / self.columns, index % self.columns),
            GridAutoFlow::Column => {
                let rows = self.rows.max(1);
                (index % rows, index / rows)
            }
        }
    }
}

/// Insertion parameters of one grid item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridRecord {
    pub(crate) payload: Payload,
    pub(crate) options: CellOptions,
    pub(crate) preserve_payload: bool,
    pub(crate) cell: Option<CellRef>,
}

impl GridRecord {
    /// The item.
    #[must_use]
    pub const fn payload(&self) -> Payload {
        self.payload
    }

    /// Proportions, alignments and borders given at insertion.
    #[must_use]
    pub const fn options(&self) -> &CellOptions {
        &self.options
    }

    /// Whether destroying the item's slot leaves the payload alive.
    #[must_use]
    pub const fn preserves_payload(&self) -> bool {
        self.preserve_payload
    }

    /// Cell currently hosting the item. Changes on every rebuild.
    #[must_use]
    pub const fn cell(&self) -> Option<CellRef> {
        self.cell
    }
}

#[derive(Debug, Clone)]
pub(crate) struct GridState {
    pub(crate) template: GridTemplate,
    pub(crate) records: Vec<GridRecord>,
    pub(crate) column_tracker: ContainerId,
    pub(crate) row_tracker: ContainerId,
    pub(crate) column_lines: Vec<ContainerId>,
    pub(crate) row_lines: Vec<ContainerId>,
    pub(crate) row_proportions: BTreeMap<usize, f32>,
    pub(crate) column_proportions: BTreeMap<usize, f32>,
    /// Live helper containers, trackers included.
    pub(crate) helpers: Vec<ContainerId>,
    /// Arena slots released by the last rebuild, reused by the next one.
    pub(crate) spare: Vec<ContainerId>,
}

impl LayoutTree {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create an empty grid container.
    pub fn new_grid(&mut self, template: GridTemplate) -> Result<ContainerId> {
        template.validate()?;
        let id = ContainerId(self.containers.len());
        self.containers.push(None);

        let (column_tracker, row_tracker) = self.new_trackers(id, &template)?;
        let state = GridState {
            template,
            records: Vec::new(),
            column_tracker,
            row_tracker,
            column_lines: Vec::new(),
            row_lines: Vec::new(),
            row_proportions: BTreeMap::new(),
            column_proportions: BTreeMap::new(),
            helpers: vec![column_tracker, row_tracker],
            spare: Vec::new(),
        };
        if let Some(slot) = self.containers.get_mut(id.0) {
            *slot = Some(Container::new(id, ContainerKind::Grid(Box::new(state))));
        }
        debug!(grid = %id, rows = template.rows, columns = template.columns, "grid created");
        Ok(id)
    }

    /// Create a helper container, reusing a slot released by an earlier
    /// rebuild of the same grid when one is available.
    fn new_helper(&mut self, grid: ContainerId, axis: Axis, gap: i32) -> ContainerId {
        let make = |id: ContainerId| {
            let mut helper = Container::linear(id, axis, gap);
            helper.grid = Some(grid);
            helper
        };
        let id = match self.grid_mut(grid).ok().and_then(|state| state.spare.pop()) {
            Some(id) => {
                if let Some(slot) = self.containers.get_mut(id.0) {
                    *slot = Some(make(id));
                }
                id
            }
            None => self.alloc(make),
        };
        // The grid state does not exist yet while its trackers are created.
        if let Ok(state) = self.grid_mut(grid) {
            state.helpers.push(id);
        }
        id
    }

    fn new_trackers(
        &mut self,
        grid: ContainerId,
        template: &GridTemplate,
    ) -> Result<(ContainerId, ContainerId)> {
        let columns = self.new_helper(grid, Axis::Horizontal, template.column_gap);
        let rows = self.new_helper(grid, Axis::Vertical, template.row_gap);
        for tracker in [columns, rows] {
            self.container_mut(tracker)?.owner = Some(Owner::Container(grid));
        }
        Ok((columns, rows))
    }

    /// Drop every helper container belonging to `grid` and keep their slots
    /// for the next rebuild. Item payloads are left untouched.
    fn dispose_grid_helpers(&mut self, grid: ContainerId) -> Result<()> {
        let helpers = std::mem::take(&mut self.grid_mut(grid)?.helpers);
        self.release_slots(&helpers);
        self.grid_mut(grid)?.spare.extend(helpers);
        Ok(())
    }

    pub(crate) fn release_slots(&mut self, ids: &[ContainerId]) {
        for id in ids {
            if let Some(slot) = self.containers.get_mut(id.0) {
                *slot = None;
            }
        }
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Append an item. Returns its flat index.
    pub fn grid_add(
        &mut self,
        grid: ContainerId,
        payload: impl Into<Payload>,
        options: CellOptions,
    ) -> Result<usize> {
        let len = self.grid(grid)?.records.len();
        self.grid_insert(grid, len, payload, options)
    }

    /// Insert an item at flat `index`.
    pub fn grid_insert(
        &mut self,
        grid: ContainerId,
        index: usize,
        payload: impl Into<Payload>,
        options: CellOptions,
    ) -> Result<usize> {
        let payload = payload.into();
        let len = self.grid(grid)?.records.len();
        if index > len {
            return Err(LayoutError::IndexOutOfRange {
                container: grid,
                index,
                len,
            });
        }
        options.validate()?;
        self.check_payload(grid, payload)?;

        self.grid_mut(grid)?.records.insert(
            index,
            GridRecord {
                payload,
                options,
                preserve_payload: false,
                cell: None,
            },
        );
        if index == len {
            self.place_record(grid, index)?;
            self.propagate_stale(grid);
        } else {
            self.rebuild_grid(grid)?;
        }
        Ok(index)
    }

    /// Remove the item at flat `index`. With `destroy`, the payload is
    /// destroyed unless preserved; otherwise it is detached.
    pub fn grid_remove_at(&mut self, grid: ContainerId, index: usize, destroy: bool) -> Result<()> {
        let record = self.grid_take_record(grid, index)?;
        self.dispose_payload(record.payload, destroy && !record.preserve_payload);
        Ok(())
    }

    /// Remove the item currently hosted by `cell`.
    pub fn grid_remove_cell(&mut self, grid: ContainerId, cell: CellId, destroy: bool) -> Result<()> {
        let index = self
            .grid(grid)?
            .records
            .iter()
            .position(|r| r.cell.is_some_and(|c| c.cell == cell))
            .ok_or(LayoutError::CellNotFound {
                container: grid,
                cell,
            })?;
        self.grid_remove_at(grid, index, destroy)
    }

    /// Take a record out and rebuild; the payload is released, not disposed.
    pub(crate) fn grid_take_record(&mut self, grid: ContainerId, index: usize) -> Result<GridRecord> {
        let state = self.grid_mut(grid)?;
        let len = state.records.len();
        if index >= len {
            return Err(LayoutError::IndexOutOfRange {
                container: grid,
                index,
                len,
            });
        }
        let record = state.records.remove(index);
        self.rebuild_grid(grid)?;
        self.release_payload(record.payload);
        Ok(record)
    }

    pub(crate) fn grid_record_index(&self, grid: ContainerId, payload: Payload) -> Result<usize> {
        self.grid(grid)?
            .records
            .iter()
            .position(|r| r.payload == payload)
            .ok_or(LayoutError::PayloadNotFound(grid))
    }

    /// Replace an item's options and rebuild.
    pub fn grid_set_options(
        &mut self,
        grid: ContainerId,
        index: usize,
        options: CellOptions,
    ) -> Result<()> {
        options.validate()?;
        self.grid_record_mut(grid, index)?.options = options;
        self.rebuild_grid(grid)
    }

    /// Keep an item's payload alive when the item is destroyed.
    pub fn grid_set_preserve_payload(
        &mut self,
        grid: ContainerId,
        index: usize,
        preserve: bool,
    ) -> Result<()> {
        self.grid_record_mut(grid, index)?.preserve_payload = preserve;
        Ok(())
    }

    /// Change both gaps and rebuild.
    pub fn grid_set_gaps(&mut self, grid: ContainerId, column_gap: i32, row_gap: i32) -> Result<()> {
        let template = &mut self.grid_mut(grid)?.template;
        template.column_gap = column_gap;
        template.row_gap = row_gap;
        self.rebuild_grid(grid)
    }

    fn grid_record_mut(&mut self, grid: ContainerId, index: usize) -> Result<&mut GridRecord> {
        let records = &mut self.grid_mut(grid)?.records;
        let len = records.len();
        records.get_mut(index).ok_or(LayoutError::IndexOutOfRange {
            container: grid,
            index,
            len,
        })
    }

    /// Remove every item. Explicit row and column proportions are kept.
    pub(crate) fn grid_clear(&mut self, grid: ContainerId, destroy: bool) -> Result<()> {
        let records = std::mem::take(&mut self.grid_mut(grid)?.records);
        self.rebuild_grid(grid)?;
        for record in records {
            self.dispose_payload(record.payload, destroy && !record.preserve_payload);
        }
        debug!(grid = %grid, destroy, "grid cleared");
        Ok(())
    }

    /// Rebuild both trackers from the records, in order. Payloads survive.
    pub fn rebuild_grid(&mut self, grid: ContainerId) -> Result<()> {
        let state = self.grid(grid)?;
        let template = state.template;
        let payloads: Vec<Payload> = state.records.iter().map(|r| r.payload).collect();

        self.dispose_grid_helpers(grid)?;
        for payload in &payloads {
            self.release_payload(*payload);
        }

        let (column_tracker, row_tracker) = self.new_trackers(grid, &template)?;
        let state = self.grid_mut(grid)?;
        state.column_tracker = column_tracker;
        state.row_tracker = row_tracker;
        state.column_lines.clear();
        state.row_lines.clear();
        for record in &mut state.records {
            record.cell = None;
        }

        for index in 0..payloads.len() {
            self.place_record(grid, index)?;
        }
        self.propagate_stale(grid);
        debug!(grid = %grid, items = payloads.len(), "grid rebuilt");
        Ok(())
    }

    /// Feed the record at `index` into both trackers.
    fn place_record(&mut self, grid: ContainerId, index: usize) -> Result<()> {
        let state = self.grid(grid)?;
        let template = state.template;
        let record = *state.records.get(index).ok_or(LayoutError::IndexOutOfRange {
            container: grid,
            index,
            len: state.records.len(),
        })?;
        let (row, column) = template.position_of(index);

        let proportions = record.options.proportions;
        let alignments = record.options.alignments;
        let borders = record.options.borders;
        let expand_h = alignments.horizontal == Alignment::Expand || proportions.horizontal > 0.0;
        let expand_v = alignments.vertical == Alignment::Expand || proportions.vertical > 0.0;

        // Column side: the item is only referenced, to measure the column.
        let column_box = self.grid_line(grid, Axis::Horizontal, column)?;
        self.push_cell(
            column_box,
            None,
            record.payload,
            CellOptions::new()
                .alignments(Alignment::Min, Alignment::Min)
                .borders(borders),
            false,
        )?;

        // Row side: row -> outer (fills the row height) -> inner -> item.
        let row_box = self.grid_line(grid, Axis::Vertical, row)?;
        let outer = self.new_helper(grid, Axis::Vertical, 0);
        self.push_cell(row_box, None, Payload::Container(outer), CellOptions::new(), true)?;

        let inner = self.new_helper(grid, Axis::Horizontal, 0);
        let inner_h = if expand_h {
            Alignment::Expand
        } else {
            alignments.horizontal
        };
        self.push_cell(
            outer,
            None,
            Payload::Container(inner),
            CellOptions::new()
                .proportions(0.0, 1.0)
                .alignments(inner_h, Alignment::Expand),
            true,
        )?;

        let item_v = if expand_v {
            Alignment::Expand
        } else {
            alignments.vertical
        };
        let cell = self.push_cell(
            inner,
            None,
            record.payload,
            CellOptions::new()
                .proportions(if expand_h { 1.0 } else { 0.0 }, 0.0)
                .alignments(Alignment::Expand, item_v)
                .borders(borders),
            true,
        )?;

        if let Some(record) = self.grid_mut(grid)?.records.get_mut(index) {
            record.cell = Some(CellRef::new(inner, cell));
        }
        self.sync_track_proportions(grid)
    }

    /// Column (`Axis::Horizontal`) or row (`Axis::Vertical`) container number
    /// `line`, created when it does not exist yet.
    fn grid_line(&mut self, grid: ContainerId, tracker_axis: Axis, line: usize) -> Result<ContainerId> {
        let state = self.grid(grid)?;
        let template = state.template;
        let (tracker, lines) = match tracker_axis {
            Axis::Horizontal => (state.column_tracker, &state.column_lines),
            Axis::Vertical => (state.row_tracker, &state.row_lines),
        };
        if let Some(&existing) = lines.get(line) {
            return Ok(existing);
        }

        // Columns stack items vertically, rows horizontally.
        let (line_axis, gap) = match tracker_axis {
            Axis::Horizontal => (Axis::Vertical, template.row_gap),
            Axis::Vertical => (Axis::Horizontal, template.column_gap),
        };
        let line_box = self.new_helper(grid, line_axis, gap);
        self.push_cell(tracker, None, Payload::Container(line_box), CellOptions::new(), true)?;

        let state = self.grid_mut(grid)?;
        match tracker_axis {
            Axis::Horizontal => state.column_lines.push(line_box),
            Axis::Vertical => state.row_lines.push(line_box),
        }
        Ok(line_box)
    }

    /// Give every column and row its growth proportion: the largest among its
    /// items, or the explicit value when one is set.
    fn sync_track_proportions(&mut self, grid: ContainerId) -> Result<()> {
        let state = self.grid(grid)?;
        let template = state.template;
        let mut columns = vec![0.0f32; state.column_lines.len()];
        let mut rows = vec![0.0f32; state.row_lines.len()];

        for (index, record) in state.records.iter().enumerate() {
            let (row, column) = template.position_of(index);
            if let Some(p) = columns.get_mut(column) {
                *p = p.max(record.options.proportions.horizontal);
            }
            if let Some(p) = rows.get_mut(row) {
                *p = p.max(record.options.proportions.vertical);
            }
        }
        for (&column, &p) in &state.column_proportions {
            if let Some(slot) = columns.get_mut(column) {
                *slot = p;
            }
        }
        for (&row, &p) in &state.row_proportions {
            if let Some(slot) = rows.get_mut(row) {
                *slot = p;
            }
        }

        let (column_tracker, row_tracker) = (state.column_tracker, state.row_tracker);
        for (cell, p) in self.linear_mut(column_tracker)?.cells.iter_mut().zip(columns) {
            cell.options.proportions.horizontal = p;
        }
        for (cell, p) in self.linear_mut(row_tracker)?.cells.iter_mut().zip(rows) {
            cell.options.proportions.vertical = p;
        }
        Ok(())
    }

    // =========================================================================
    // Layout passes
    // =========================================================================

    pub(crate) fn grid_min_size(&mut self, grid: ContainerId) -> Result<Size> {
        let state = self.grid(grid)?;
        let (column_tracker, row_tracker) = (state.column_tracker, state.row_tracker);
        let column_lines = state.column_lines.clone();

        // Column items are not bound to their cells, so nothing marks this side stale.
        for id in column_lines.into_iter().chain([column_tracker]) {
            self.container_mut(id)?.stale = true;
        }
        let width = self.update_min_size(column_tracker)?.width;
        let height = self.update_min_size(row_tracker)?.height;
        Ok(Size::new(width, height))
    }

    pub(crate) fn grid_set_size(&mut self, grid: ContainerId, total: Size) -> Result<Size> {
        self.sync_track_proportions(grid)?;
        let state = self.grid(grid)?;
        let (column_tracker, row_tracker) = (state.column_tracker, state.row_tracker);
        let row_lines = state.row_lines.clone();

        self.set_size(column_tracker, total)?;
        let widths: Vec<i32> = self
            .linear(column_tracker)?
            .cells
            .iter()
            .map(|c| c.size.width)
            .collect();

        for row in row_lines {
            let outers: Vec<ContainerId> = self
                .linear(row)?
                .cells
                .iter()
                .filter_map(|c| match c.payload {
                    Payload::Container(outer) => Some(outer),
                    _ => None,
                })
                .collect();
            for (outer, &width) in outers.into_iter().zip(&widths) {
                let default = Size::new(width, 0);
                let container = self.container_mut(outer)?;
                if container.default_size != default {
                    container.default_size = default;
                    self.propagate_stale_until(outer, Some(grid));
                }
            }
        }

        self.set_size(row_tracker, total)
    }

    // =========================================================================
    // Proportion overrides
    // =========================================================================

    /// Fix the growth proportion of a row, replacing the inferred one.
    pub fn set_row_proportion(&mut self, grid: ContainerId, row: usize, proportion: f32) -> Result<()> {
        if !is_valid_weight(proportion) {
            return Err(LayoutError::InvalidProportion(proportion));
        }
        self.grid_mut(grid)?.row_proportions.insert(row, proportion);
        self.propagate_stale(grid);
        Ok(())
    }

    /// Whether a row has an explicit proportion.
    pub fn has_row_proportion(&self, grid: ContainerId, row: usize) -> Result<bool> {
        Ok(self.grid(grid)?.row_proportions.contains_key(&row))
    }

    /// Explicit proportion of a row, if any.
    pub fn row_proportion(&self, grid: ContainerId, row: usize) -> Result<Option<f32>> {
        Ok(self.grid(grid)?.row_proportions.get(&row).copied())
    }

    /// Go back to the inferred proportion for a row.
    pub fn clear_row_proportion(&mut self, grid: ContainerId, row: usize) -> Result<()> {
        self.grid_mut(grid)?.row_proportions.remove(&row);
        self.propagate_stale(grid);
        Ok(())
    }

    /// Fix the growth proportion of a column, replacing the inferred one.
    pub fn set_column_proportion(
        &mut self,
        grid: ContainerId,
        column: usize,
        proportion: f32,
    ) -> Result<()> {
        if !is_valid_weight(proportion) {
            return Err(LayoutError::InvalidProportion(proportion));
        }
        self.grid_mut(grid)?
            .column_proportions
            .insert(column, proportion);
        self.propagate_stale(grid);
        Ok(())
    }

    /// Whether a column has an explicit proportion.
    pub fn has_column_proportion(&self, grid: ContainerId, column: usize) -> Result<bool> {
        Ok(self.grid(grid)?.column_proportions.contains_key(&column))
    }

    /// Explicit proportion of a column, if any.
    pub fn column_proportion(&self, grid: ContainerId, column: usize) -> Result<Option<f32>> {
        Ok(self.grid(grid)?.column_proportions.get(&column).copied())
    }

    /// Go back to the inferred proportion for a column.
    pub fn clear_column_proportion(&mut self, grid: ContainerId, column: usize) -> Result<()> {
        self.grid_mut(grid)?.column_proportions.remove(&column);
        self.propagate_stale(grid);
        Ok(())
    }

    /// Drop every explicit row and column proportion.
    pub fn clear_proportions(&mut self, grid: ContainerId) -> Result<()> {
        let state = self.grid_mut(grid)?;
        state.row_proportions.clear();
        state.column_proportions.clear();
        self.propagate_stale(grid);
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of items.
    pub fn grid_len(&self, grid: ContainerId) -> Result<usize> {
        Ok(self.grid(grid)?.records.len())
    }

    /// Number of rows currently in use.
    pub fn grid_rows(&self, grid: ContainerId) -> Result<usize> {
        Ok(self.grid(grid)?.row_lines.len())
    }

    /// Number of columns currently in use.
    pub fn grid_columns(&self, grid: ContainerId) -> Result<usize> {
        Ok(self.grid(grid)?.column_lines.len())
    }

    /// Dimensions and gaps of a grid.
    pub fn grid_template(&self, grid: ContainerId) -> Result<GridTemplate> {
        Ok(self.grid(grid)?.template)
    }

    /// Records of every item, in flat order.
    pub fn grid_records(&self, grid: ContainerId) -> Result<&[GridRecord]> {
        Ok(&self.grid(grid)?.records)
    }

    /// `(row, column)` of the item at flat `index`.
    pub fn grid_position_of(&self, grid: ContainerId, index: usize) -> Result<(usize, usize)> {
        Ok(self.grid(grid)?.template.position_of(index))
    }

    /// Item at `(row, column)`, if that slot is filled.
    pub fn grid_item_at(&self, grid: ContainerId, row: usize, column: usize) -> Result<Option<Payload>> {
        let state = self.grid(grid)?;
        let template = state.template;
        let index = match template.auto_flow() {
            GridAutoFlow::Row if column < template.columns => row
                .checked_mul(template.columns)
                .and_then(|start| start.checked_add(column)),
            GridAutoFlow::Column if row < template.rows => column
                .checked_mul(template.rows)
                .and_then(|start| start.checked_add(row)),
            _ => None,
        };
        Ok(index.and_then(|i| state.records.get(i)).map(|r| r.payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sizer_core::Point;

    fn spacer(w: i32, h: i32) -> Payload {
        Payload::Spacer(Size::new(w, h))
    }

    #[test]
    fn test_template_validation() {
        assert!(GridTemplate::columns(3).validate().is_ok());
        assert!(GridTemplate::rows(2).validate().is_ok());
        assert_eq!(
            GridTemplate::default().validate(),
            Err(LayoutError::InvalidGrid {
                rows: 0,
                columns: 0
            })
        );
        let both = GridTemplate {
            rows: 2,
            columns: 2,
            ..GridTemplate::default()
        };
        assert!(both.validate().is_err());
    }

    #[test]
    fn test_position_of_row_flow() {
        let t = GridTemplate::columns(3);
        assert_eq!(t.auto_flow(), GridAutoFlow::Row);
        assert_eq!(t.position_of(0), (0, 0));
        assert_eq!(t.position_of(2), (0, 2));
        assert_eq!(t.position_of(3), (1, 0));
        assert_eq!(t.position_of(7), (2, 1));
    }

    #[test]
    fn test_position_of_column_flow() {
        let t = GridTemplate::rows(2);
        assert_eq!(t.auto_flow(), GridAutoFlow::Column);
        assert_eq!(t.position_of(0), (0, 0));
        assert_eq!(t.position_of(1), (1, 0));
        assert_eq!(t.position_of(2), (0, 1));
        assert_eq!(t.position_of(5), (1, 2));
    }

    #[test]
    fn test_new_grid_rejects_bad_template() {
        let mut tree = LayoutTree::new();
        assert!(matches!(
            tree.new_grid(GridTemplate::default()),
            Err(LayoutError::InvalidGrid { .. })
        ));
    }

    #[test]
    fn test_fourth_item_opens_second_row() {
        let mut tree = LayoutTree::new();
        let grid = tree.new_grid(GridTemplate::columns(3)).unwrap();
        for _ in 0..3 {
            tree.grid_add(grid, spacer(10, 10), CellOptions::new()).unwrap();
        }
        assert_eq!(tree.grid_rows(grid).unwrap(), 1);
        assert_eq!(tree.grid_columns(grid).unwrap(), 3);
        tree.grid_add(grid, spacer(10, 10), CellOptions::new()).unwrap();
        assert_eq!(tree.grid_rows(grid).unwrap(), 2);
        assert_eq!(tree.grid_columns(grid).unwrap(), 3);
        assert_eq!(tree.grid_position_of(grid, 3).unwrap(), (1, 0));
    }

    #[test]
    fn test_grid_min_size_uses_column_widths_and_row_heights() {
        let mut tree = LayoutTree::new();
        let grid = tree
            .new_grid(GridTemplate::columns(2).with_column_gap(4).with_row_gap(6))
            .unwrap();
        tree.grid_add(grid, spacer(10, 5), CellOptions::new()).unwrap();
        tree.grid_add(grid, spacer(20, 8), CellOptions::new()).unwrap();
        tree.grid_add(grid, spacer(30, 3), CellOptions::new()).unwrap();

        // Columns: max(10, 30) + 4 + 20. Rows: max(5, 8) + 6 + 3.
        assert_eq!(tree.update_min_size(grid).unwrap(), Size::new(54, 17));
    }

    #[test]
    fn test_grid_operations_on_linear_container() {
        let mut tree = LayoutTree::new();
        let row = tree.new_container(Axis::Horizontal);
        assert_eq!(
            tree.grid_add(row, spacer(1, 1), CellOptions::new()),
            Err(LayoutError::NotAGrid(row))
        );
        let grid = tree.new_grid(GridTemplate::columns(1)).unwrap();
        assert_eq!(
            tree.add(grid, spacer(1, 1), CellOptions::new()),
            Err(LayoutError::IsAGrid(grid))
        );
    }

    #[test]
    fn test_helpers_are_protected() {
        let mut tree = LayoutTree::new();
        let grid = tree.new_grid(GridTemplate::columns(1)).unwrap();
        tree.grid_add(grid, spacer(1, 1), CellOptions::new()).unwrap();
        let helper = tree.grid_records(grid).unwrap()[0].cell().unwrap().container;
        assert_eq!(
            tree.add(helper, spacer(1, 1), CellOptions::new()),
            Err(LayoutError::GridInternal {
                container: helper,
                grid
            })
        );
        assert!(matches!(
            tree.destroy_container(helper),
            Err(LayoutError::GridInternal { .. })
        ));
    }

    #[test]
    fn test_column_widths_become_outer_defaults() {
        let mut tree = LayoutTree::new();
        let grid = tree.new_grid(GridTemplate::columns(2)).unwrap();
        tree.grid_add(grid, spacer(10, 10), CellOptions::new()).unwrap();
        tree.grid_add(grid, spacer(10, 10), CellOptions::new().proportions(1.0, 0.0))
            .unwrap();
        tree.grid_add(grid, spacer(40, 10), CellOptions::new()).unwrap();

        tree.set_size(grid, Size::new(100, 20)).unwrap();
        let state = tree.grid(grid).unwrap();
        let widths: Vec<i32> = tree
            .linear(state.column_tracker)
            .unwrap()
            .cells
            .iter()
            .map(|c| c.size.width)
            .collect();
        assert_eq!(widths, vec![40, 60]);

        let row = state.row_lines[1];
        let outer = match tree.linear(row).unwrap().cells[0].payload {
            Payload::Container(outer) => outer,
            other => panic!("unexpected payload {other:?}"),
        };
        assert_eq!(tree.container(outer).unwrap().default_size(), Size::new(40, 0));
        assert!(!tree.is_stale(grid).unwrap());
    }

    #[test]
    fn test_override_replaces_inferred_proportion() {
        let mut tree = LayoutTree::new();
        let grid = tree.new_grid(GridTemplate::columns(2)).unwrap();
        tree.grid_add(grid, spacer(0, 0), CellOptions::new().proportions(3.0, 0.0))
            .unwrap();
        tree.grid_add(grid, spacer(0, 0), CellOptions::new().proportions(1.0, 0.0))
            .unwrap();

        // A smaller override must win over the larger inferred value.
        tree.set_column_proportion(grid, 0, 1.0).unwrap();
        assert!(tree.has_column_proportion(grid, 0).unwrap());
        tree.set_size(grid, Size::new(100, 10)).unwrap();
        let tracker = tree.grid(grid).unwrap().column_tracker;
        let widths: Vec<i32> = tree
            .linear(tracker)
            .unwrap()
            .cells
            .iter()
            .map(|c| c.size.width)
            .collect();
        assert_eq!(widths, vec![50, 50]);

        tree.clear_column_proportion(grid, 0).unwrap();
        assert_eq!(tree.column_proportion(grid, 0).unwrap(), None);
        tree.set_size(grid, Size::new(100, 10)).unwrap();
        let tracker = tree.grid(grid).unwrap().column_tracker;
        let widths: Vec<i32> = tree
            .linear(tracker)
            .unwrap()
            .cells
            .iter()
            .map(|c| c.size.width)
            .collect();
        assert_eq!(widths, vec![75, 25]);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut tree = LayoutTree::new();
        let grid = tree.new_grid(GridTemplate::rows(1)).unwrap();
        assert_eq!(
            tree.set_row_proportion(grid, 0, -1.0),
            Err(LayoutError::InvalidProportion(-1.0))
        );
        assert!(tree.set_row_proportion(grid, 0, f32::NAN).is_err());
        assert!(!tree.has_row_proportion(grid, 0).unwrap());
    }

    #[test]
    fn test_insert_in_middle_rebuilds() {
        let mut tree = LayoutTree::new();
        let grid = tree.new_grid(GridTemplate::columns(2)).unwrap();
        tree.grid_add(grid, spacer(1, 1), CellOptions::new()).unwrap();
        tree.grid_add(grid, spacer(2, 2), CellOptions::new()).unwrap();
        let before = tree.grid(grid).unwrap().helpers.clone();

        tree.grid_insert(grid, 0, spacer(3, 3), CellOptions::new()).unwrap();
        let state = tree.grid(grid).unwrap();
        assert_eq!(state.helpers.len(), before.len() + 3);
        assert!(before.iter().all(|id| state.helpers.contains(id)));
        assert!(state.spare.is_empty());
        assert_eq!(tree.grid_rows(grid).unwrap(), 2);
        assert_eq!(tree.grid_item_at(grid, 0, 0).unwrap(), Some(spacer(3, 3)));
        assert_eq!(tree.grid_item_at(grid, 1, 0).unwrap(), Some(spacer(2, 2)));
        assert_eq!(tree.grid_item_at(grid, 1, 1).unwrap(), None);
    }

    #[test]
    fn test_rebuilds_reuse_helper_slots() {
        let mut tree = LayoutTree::new();
        let grid = tree.new_grid(GridTemplate::columns(3)).unwrap();
        for _ in 0..9 {
            tree.grid_add(grid, spacer(5, 5), CellOptions::new()).unwrap();
        }
        tree.grid_insert(grid, 0, spacer(1, 1), CellOptions::new()).unwrap();
        tree.grid_remove_at(grid, 0, false).unwrap();
        let slots = tree.containers.len();

        for _ in 0..200 {
            tree.grid_insert(grid, 0, spacer(1, 1), CellOptions::new()).unwrap();
            tree.grid_remove_at(grid, 0, false).unwrap();
        }
        assert_eq!(tree.containers.len(), slots);
        let live = tree.containers.iter().flatten().count();
        // Grid, two trackers, three columns, three rows and two helpers per item.
        assert_eq!(live, 1 + 2 + 3 + 3 + 2 * 9);
        assert_eq!(tree.grid(grid).unwrap().helpers.len(), live - 1);
    }

    #[test]
    fn test_destroyed_grid_releases_helpers() {
        let mut tree = LayoutTree::new();
        let grid = tree.new_grid(GridTemplate::columns(2)).unwrap();
        for _ in 0..3 {
            tree.grid_add(grid, spacer(5, 5), CellOptions::new()).unwrap();
        }
        tree.grid_remove_at(grid, 0, false).unwrap();
        tree.destroy_container(grid).unwrap();
        assert_eq!(tree.containers.iter().flatten().count(), 0);
    }

    #[test]
    fn test_item_at_out_of_range_is_none() {
        let mut tree = LayoutTree::new();
        let rows = tree.new_grid(GridTemplate::columns(3)).unwrap();
        let columns = tree.new_grid(GridTemplate::rows(3)).unwrap();
        tree.grid_add(rows, spacer(1, 1), CellOptions::new()).unwrap();
        tree.grid_add(columns, spacer(1, 1), CellOptions::new()).unwrap();

        assert_eq!(tree.grid_item_at(rows, usize::MAX, 1).unwrap(), None);
        assert_eq!(tree.grid_item_at(rows, usize::MAX / 3, 2).unwrap(), None);
        assert_eq!(tree.grid_item_at(columns, 1, usize::MAX).unwrap(), None);
        assert_eq!(tree.grid_item_at(rows, 0, 0).unwrap(), Some(spacer(1, 1)));
        assert_eq!(tree.grid_item_at(columns, 0, 0).unwrap(), Some(spacer(1, 1)));
    }

    #[test]
    fn test_remove_cell_by_id() {
        let mut tree = LayoutTree::new();
        let grid = tree.new_grid(GridTemplate::columns(2)).unwrap();
        tree.grid_add(grid, spacer(1, 1), CellOptions::new()).unwrap();
        tree.grid_add(grid, spacer(2, 2), CellOptions::new()).unwrap();
        let cell = tree.grid_records(grid).unwrap()[0].cell().unwrap().cell;
        tree.grid_remove_cell(grid, cell, false).unwrap();
        assert_eq!(tree.grid_len(grid).unwrap(), 1);
        assert_eq!(tree.grid_item_at(grid, 0, 0).unwrap(), Some(spacer(2, 2)));
        assert!(matches!(
            tree.grid_remove_cell(grid, cell, false),
            Err(LayoutError::CellNotFound { .. })
        ));
    }

    #[test]
    fn test_nested_grid_positions() {
        let mut tree = LayoutTree::new();
        let root = tree.new_container(Axis::Vertical);
        tree.add(root, spacer(0, 25), CellOptions::new()).unwrap();
        let grid = tree.new_grid(GridTemplate::columns(2).with_gap(5)).unwrap();
        tree.add(root, grid, CellOptions::new()).unwrap();
        for _ in 0..4 {
            tree.grid_add(grid, spacer(10, 10), CellOptions::new()).unwrap();
        }

        tree.set_size(root, Size::new(25, 50)).unwrap();
        tree.calculate_positions(root, Point::ORIGIN).unwrap();
        assert_eq!(tree.container(grid).unwrap().position(), Point::new(0, 25));
        assert_eq!(tree.container(grid).unwrap().size(), Size::new(25, 25));
        let rows = tree.grid(grid).unwrap().row_lines.clone();
        assert_eq!(tree.container(rows[1]).unwrap().position(), Point::new(0, 40));
    }
}
