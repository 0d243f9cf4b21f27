//! The layout arena.
//!
//! A [`LayoutTree`] owns every container and every registered managed object.
//! Cells refer to their payloads by id and payloads point back at the cell or
//! container holding them, so the tree can walk upward when a minimum size
//! goes stale and downward when distributing space.
//!
//! Layout runs in three passes, driven from a root container:
//! 1. [`LayoutTree::update_min_size`] recomputes stale minimums leaf to root.
//! 2. [`LayoutTree::set_size`] distributes space root to leaf.
//! 3. [`LayoutTree::calculate_positions`] places payloads root to leaf.

use std::collections::BTreeMap;
use std::fmt;

use sizer_core::{Axis, Borders, ManagedObject, Point, Rect, Size};
use tracing::{debug, error, trace};

use crate::cell::{Cell, CellOptions, Payload};
use crate::container::{CellRef, Container, ContainerKind, LinearState, Owner};
use crate::distribute::{distribute, Track};
use crate::error::{LayoutError, Result};
use crate::grid::GridState;
use crate::id::{CellId, ContainerId, ObjectId};
use crate::snapshot::LayoutSnapshot;

pub(crate) struct ObjectSlot {
    pub(crate) object: Box<dyn ManagedObject>,
    pub(crate) host: Option<CellRef>,
    pub(crate) child: Option<ContainerId>,
    pub(crate) position: Point,
}

/// Arena of containers and managed objects.
#[derive(Default)]
pub struct LayoutTree {
    pub(crate) containers: Vec<Option<Container>>,
    pub(crate) objects: Vec<Option<ObjectSlot>>,
    next_cell: u64,
}

impl fmt::Debug for LayoutTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutTree")
            .field("containers", &self.containers.iter().flatten().count())
            .field("objects", &self.objects.iter().flatten().count())
            .field("next_cell", &self.next_cell)
            .finish()
    }
}

impl LayoutTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Arena access
    // =========================================================================

    /// Create an empty linear container.
    pub fn new_container(&mut self, axis: Axis) -> ContainerId {
        self.alloc(|id| Container::linear(id, axis, 0))
    }

    pub(crate) fn alloc(&mut self, make: impl FnOnce(ContainerId) -> Container) -> ContainerId {
        let id = ContainerId(self.containers.len());
        self.containers.push(Some(make(id)));
        id
    }

    /// Look up a container.
    pub fn container(&self, id: ContainerId) -> Result<&Container> {
        self.containers
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(LayoutError::UnknownContainer(id))
    }

    pub(crate) fn container_mut(&mut self, id: ContainerId) -> Result<&mut Container> {
        self.containers
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(LayoutError::UnknownContainer(id))
    }

    /// Whether `id` names a live container.
    #[must_use]
    pub fn contains_container(&self, id: ContainerId) -> bool {
        self.container(id).is_ok()
    }

    pub(crate) fn linear(&self, id: ContainerId) -> Result<&LinearState> {
        self.container(id)?
            .linear_state()
            .ok_or(LayoutError::IsAGrid(id))
    }

    pub(crate) fn linear_mut(&mut self, id: ContainerId) -> Result<&mut LinearState> {
        self.container_mut(id)?
            .linear_state_mut()
            .ok_or(LayoutError::IsAGrid(id))
    }

    pub(crate) fn grid(&self, id: ContainerId) -> Result<&GridState> {
        self.container(id)?
            .grid_state()
            .ok_or(LayoutError::NotAGrid(id))
    }

    pub(crate) fn grid_mut(&mut self, id: ContainerId) -> Result<&mut GridState> {
        self.container_mut(id)?
            .grid_state_mut()
            .ok_or(LayoutError::NotAGrid(id))
    }

    /// Register a managed object so cells can refer to it.
    pub fn register(&mut self, object: impl ManagedObject + 'static) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(Some(ObjectSlot {
            object: Box::new(object),
            host: None,
            child: None,
            position: Point::ORIGIN,
        }));
        id
    }

    pub(crate) fn object_slot(&self, id: ObjectId) -> Result<&ObjectSlot> {
        self.objects
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(LayoutError::UnknownObject(id))
    }

    pub(crate) fn object_slot_mut(&mut self, id: ObjectId) -> Result<&mut ObjectSlot> {
        self.objects
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(LayoutError::UnknownObject(id))
    }

    /// Borrow a registered object.
    pub fn object(&self, id: ObjectId) -> Result<&dyn ManagedObject> {
        Ok(self.object_slot(id)?.object.as_ref())
    }

    /// Mutably borrow a registered object.
    ///
    /// Call [`LayoutTree::invalidate_object`] afterwards if its minimum changed.
    pub fn object_mut(&mut self, id: ObjectId) -> Result<&mut dyn ManagedObject> {
        Ok(self.object_slot_mut(id)?.object.as_mut())
    }

    /// Whether `id` names a registered object.
    #[must_use]
    pub fn contains_object(&self, id: ObjectId) -> bool {
        self.object_slot(id).is_ok()
    }

    /// Position assigned to the object by the last position pass.
    pub fn object_position(&self, id: ObjectId) -> Result<Point> {
        Ok(self.object_slot(id)?.position)
    }

    /// Cell currently hosting the object.
    pub fn object_host(&self, id: ObjectId) -> Result<Option<CellRef>> {
        Ok(self.object_slot(id)?.host)
    }

    /// Container governing the object's child layout.
    pub fn child_container(&self, id: ObjectId) -> Result<Option<ContainerId>> {
        Ok(self.object_slot(id)?.child)
    }

    /// Attach (or with `None`, detach) the container laying out the object's
    /// children. Returns the previous child container, now without an owner.
    pub fn set_child_container(
        &mut self,
        object: ObjectId,
        container: Option<ContainerId>,
    ) -> Result<Option<ContainerId>> {
        let host = self.object_slot(object)?.host;

        if let Some(child) = container {
            self.check_free_container(child)?;
            if let Some(host) = host {
                if host.container == child || self.is_ancestor(child, host.container) {
                    return Err(LayoutError::Cycle {
                        parent: host.container,
                        child,
                    });
                }
            }
        }

        let slot = self.object_slot_mut(object)?;
        let previous = std::mem::replace(&mut slot.child, container);
        if let Some(prev) = previous {
            if let Ok(c) = self.container_mut(prev) {
                c.owner = None;
            }
        }
        if let Some(child) = container {
            self.container_mut(child)?.owner = Some(Owner::Object(object));
        }
        if let Some(host) = host {
            self.propagate_stale(host.container);
        }
        Ok(previous)
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Set the gap between consecutive cells.
    pub fn set_gap(&mut self, id: ContainerId, gap: i32) -> Result<()> {
        self.check_structural(id)?;
        self.linear_mut(id)?.gap = gap;
        self.propagate_stale(id);
        Ok(())
    }

    /// Append a cell.
    pub fn add(
        &mut self,
        container: ContainerId,
        payload: impl Into<Payload>,
        options: CellOptions,
    ) -> Result<CellId> {
        let len = self.container(container)?.cells().len();
        self.insert(container, len, payload, options)
    }

    /// Insert a cell at `index`.
    pub fn insert(
        &mut self,
        container: ContainerId,
        index: usize,
        payload: impl Into<Payload>,
        options: CellOptions,
    ) -> Result<CellId> {
        let payload = payload.into();
        self.check_structural(container)?;
        options.validate()?;

        let len = self.linear(container)?.cells.len();
        if index > len {
            return Err(LayoutError::IndexOutOfRange {
                container,
                index,
                len,
            });
        }
        self.check_payload(container, payload)?;
        self.push_cell(container, Some(index), payload, options, true)
    }

    /// Insert a cell without validation. `bind` records the back-reference
    /// from the payload to the new cell.
    pub(crate) fn push_cell(
        &mut self,
        container: ContainerId,
        index: Option<usize>,
        payload: Payload,
        options: CellOptions,
        bind: bool,
    ) -> Result<CellId> {
        let id = CellId(self.next_cell);
        let state = self.linear_mut(container)?;
        let index = index.unwrap_or(state.cells.len()).min(state.cells.len());
        state.cells.insert(index, Cell::new(id, payload, options));
        self.next_cell += 1;

        if bind {
            self.bind_payload(payload, CellRef::new(container, id))?;
        }
        self.propagate_stale(container);
        trace!(container = %container, cell = %id, index, "cell inserted");
        Ok(id)
    }

    /// Remove a cell. With `destroy`, the payload is destroyed too unless the
    /// cell preserves it; otherwise the payload is only detached.
    pub fn remove_cell(&mut self, container: ContainerId, cell: CellId, destroy: bool) -> Result<()> {
        self.check_structural(container)?;
        let removed = self.take_cell(container, cell)?;
        self.dispose_payload(removed.payload, destroy && !removed.preserve_payload);
        Ok(())
    }

    /// Remove the cell hosting `object`, wherever it is.
    pub fn remove_object(&mut self, object: ObjectId, destroy: bool) -> Result<()> {
        let host = self
            .object_slot(object)?
            .host
            .ok_or(LayoutError::NotHosted(object))?;
        let grid = self.container(host.container)?.grid;
        match grid {
            Some(grid) => {
                let index = self.grid_record_index(grid, Payload::Object(object))?;
                self.grid_remove_at(grid, index, destroy)
            }
            None => self.remove_cell(host.container, host.cell, destroy),
        }
    }

    /// Remove a cell and hand it back. The payload is detached, not destroyed.
    pub fn detach_cell(&mut self, container: ContainerId, cell: CellId) -> Result<Cell> {
        self.check_structural(container)?;
        let removed = self.take_cell(container, cell)?;
        self.release_payload(removed.payload);
        Ok(removed)
    }

    /// Insert a previously detached cell, keeping its options and preserve
    /// flag. The cell receives a fresh id.
    pub fn insert_cell(&mut self, container: ContainerId, index: usize, cell: Cell) -> Result<CellId> {
        let id = self.insert(container, index, cell.payload, cell.options)?;
        if cell.preserve_payload {
            self.set_preserve_payload(container, id, true)?;
        }
        Ok(id)
    }

    fn take_cell(&mut self, container: ContainerId, cell: CellId) -> Result<Cell> {
        let index = self.cell_index(container, cell)?;
        let removed = self.linear_mut(container)?.cells.remove(index);
        self.propagate_stale(container);
        trace!(container = %container, cell = %cell, "cell removed");
        Ok(removed)
    }

    /// Look up a cell.
    pub fn cell(&self, container: ContainerId, cell: CellId) -> Result<&Cell> {
        let index = self.cell_index(container, cell)?;
        self.linear(container)?
            .cells
            .get(index)
            .ok_or(LayoutError::CellNotFound { container, cell })
    }

    /// Position of a cell within its container.
    pub fn cell_index(&self, container: ContainerId, cell: CellId) -> Result<usize> {
        self.linear(container)?;
        self.container(container)?
            .cell_index(cell)
            .ok_or(LayoutError::CellNotFound { container, cell })
    }

    /// Replace the proportions, alignments and borders of a cell.
    pub fn set_cell_options(
        &mut self,
        container: ContainerId,
        cell: CellId,
        options: CellOptions,
    ) -> Result<()> {
        self.check_structural(container)?;
        options.validate()?;
        let index = self.cell_index(container, cell)?;
        if let Some(target) = self.linear_mut(container)?.cells.get_mut(index) {
            target.options = options;
        }
        self.propagate_stale(container);
        Ok(())
    }

    /// Keep the cell's payload alive when the cell is destroyed.
    pub fn set_preserve_payload(
        &mut self,
        container: ContainerId,
        cell: CellId,
        preserve: bool,
    ) -> Result<()> {
        self.check_structural(container)?;
        let index = self.cell_index(container, cell)?;
        if let Some(target) = self.linear_mut(container)?.cells.get_mut(index) {
            target.preserve_payload = preserve;
        }
        Ok(())
    }

    /// Remove every cell (or every grid item). With `destroy`, payloads are
    /// destroyed unless preserved.
    pub fn clear(&mut self, container: ContainerId, destroy: bool) -> Result<()> {
        if self.container(container)?.is_grid() {
            return self.grid_clear(container, destroy);
        }
        self.check_structural(container)?;
        let cells = std::mem::take(&mut self.linear_mut(container)?.cells);
        for cell in cells {
            self.dispose_payload(cell.payload, destroy && !cell.preserve_payload);
        }
        self.propagate_stale(container);
        debug!(container = %container, destroy, "container cleared");
        Ok(())
    }

    /// Destroy a container and everything it holds (preserved payloads are
    /// detached instead). The container is first removed from its host.
    pub fn destroy_container(&mut self, id: ContainerId) -> Result<()> {
        let container = self.container(id)?;
        let (owner, grid) = (container.owner, container.grid);
        if let Some(grid) = grid {
            return Err(LayoutError::GridInternal {
                container: id,
                grid,
            });
        }
        match owner {
            Some(Owner::Container(parent)) => self.unhook(parent, Payload::Container(id))?,
            Some(Owner::Object(object)) => {
                let slot = self.object_slot_mut(object)?;
                slot.child = None;
                let host = slot.host;
                if let Some(host) = host {
                    self.propagate_stale(host.container);
                }
            }
            None => {}
        }
        self.dispose_container(id, true);
        debug!(container = %id, "container destroyed");
        Ok(())
    }

    /// Destroy an object, removing it from its host cell first.
    pub fn destroy_object(&mut self, id: ObjectId) -> Result<()> {
        if let Some(host) = self.object_slot(id)?.host {
            self.unhook(host.container, Payload::Object(id))?;
        }
        self.dispose_payload(Payload::Object(id), true);
        debug!(object = %id, "object destroyed");
        Ok(())
    }

    /// Remove `payload` from the container holding it without disposing it.
    fn unhook(&mut self, parent: ContainerId, payload: Payload) -> Result<()> {
        let grid = self.container(parent)?.grid;
        if let Some(grid) = grid {
            let index = self.grid_record_index(grid, payload)?;
            self.grid_take_record(grid, index)?;
            return Ok(());
        }
        let cell = self
            .linear(parent)?
            .cells
            .iter()
            .find(|c| c.payload == payload)
            .map(|c| c.id);
        if let Some(cell) = cell {
            let removed = self.take_cell(parent, cell)?;
            self.release_payload(removed.payload);
        }
        Ok(())
    }

    // =========================================================================
    // Ownership bookkeeping
    // =========================================================================

    pub(crate) fn check_structural(&self, id: ContainerId) -> Result<()> {
        let container = self.container(id)?;
        if let Some(grid) = container.grid {
            return Err(LayoutError::GridInternal {
                container: id,
                grid,
            });
        }
        if container.is_grid() {
            return Err(LayoutError::IsAGrid(id));
        }
        Ok(())
    }

    fn check_free_container(&self, id: ContainerId) -> Result<()> {
        let container = self.container(id)?;
        if let Some(grid) = container.grid {
            return Err(LayoutError::GridInternal {
                container: id,
                grid,
            });
        }
        if container.owner.is_some() {
            return Err(LayoutError::AlreadyOwned(id));
        }
        Ok(())
    }

    /// Validate a payload about to be placed in `parent`.
    pub(crate) fn check_payload(&self, parent: ContainerId, payload: Payload) -> Result<()> {
        match payload {
            Payload::Spacer(_) => Ok(()),
            Payload::Object(object) => match self.object_slot(object)?.host {
                Some(_) => Err(LayoutError::AlreadyHosted(object)),
                None => Ok(()),
            },
            Payload::Container(child) => {
                self.check_free_container(child)?;
                if child == parent || self.is_ancestor(child, parent) {
                    return Err(LayoutError::Cycle { parent, child });
                }
                Ok(())
            }
        }
    }

    /// Container above `id`: its owning container, or the container hosting
    /// the object it belongs to.
    pub(crate) fn parent_of(&self, id: ContainerId) -> Option<ContainerId> {
        match self.container(id).ok()?.owner? {
            Owner::Container(parent) => Some(parent),
            Owner::Object(object) => self.object_slot(object).ok()?.host.map(|h| h.container),
        }
    }

    fn is_ancestor(&self, candidate: ContainerId, of: ContainerId) -> bool {
        let mut next = self.parent_of(of);
        while let Some(id) = next {
            if id == candidate {
                return true;
            }
            next = self.parent_of(id);
        }
        false
    }

    pub(crate) fn bind_payload(&mut self, payload: Payload, at: CellRef) -> Result<()> {
        match payload {
            Payload::Spacer(_) => {}
            Payload::Object(object) => self.object_slot_mut(object)?.host = Some(at),
            Payload::Container(child) => {
                self.container_mut(child)?.owner = Some(Owner::Container(at.container));
            }
        }
        Ok(())
    }

    pub(crate) fn release_payload(&mut self, payload: Payload) {
        match payload {
            Payload::Spacer(_) => {}
            Payload::Object(object) => {
                if let Ok(slot) = self.object_slot_mut(object) {
                    slot.host = None;
                }
            }
            Payload::Container(child) => {
                if let Ok(c) = self.container_mut(child) {
                    c.owner = None;
                }
            }
        }
    }

    /// Destroy a payload, or only release its back-reference.
    pub(crate) fn dispose_payload(&mut self, payload: Payload, destroy: bool) {
        if !destroy {
            self.release_payload(payload);
            return;
        }
        match payload {
            Payload::Spacer(_) => {}
            Payload::Object(object) => {
                let Some(mut slot) = self.objects.get_mut(object.0).and_then(Option::take) else {
                    return;
                };
                if let Some(child) = slot.child {
                    self.dispose_container(child, true);
                }
                slot.object.destroy();
            }
            Payload::Container(child) => self.dispose_container(child, true),
        }
    }

    /// Drop a container from the arena, disposing of its payloads.
    pub(crate) fn dispose_container(&mut self, id: ContainerId, destroy: bool) {
        let Some(container) = self.containers.get_mut(id.0).and_then(Option::take) else {
            return;
        };
        match container.kind {
            ContainerKind::Linear(state) => {
                for cell in state.cells {
                    self.dispose_payload(cell.payload, destroy && !cell.preserve_payload);
                }
            }
            ContainerKind::Grid(grid) => {
                self.release_slots(&grid.helpers);
                for record in grid.records {
                    self.dispose_payload(record.payload, destroy && !record.preserve_payload);
                }
            }
        }
    }

    // =========================================================================
    // Staleness
    // =========================================================================

    /// Mark a container's minimum stale, along with every ancestor up to the
    /// first one already stale.
    pub fn mark_stale(&mut self, id: ContainerId) -> Result<()> {
        self.container(id)?;
        self.propagate_stale(id);
        Ok(())
    }

    /// Report that an object's intrinsic minimum changed.
    pub fn invalidate_object(&mut self, id: ObjectId) -> Result<()> {
        if let Some(host) = self.object_slot(id)?.host {
            self.propagate_stale(host.container);
        }
        Ok(())
    }

    /// Whether the cached minimum of a container is out of date.
    pub fn is_stale(&self, id: ContainerId) -> Result<bool> {
        Ok(self.container(id)?.stale)
    }

    pub(crate) fn propagate_stale(&mut self, start: ContainerId) {
        self.propagate_stale_until(start, None);
    }

    /// Like `propagate_stale`, but never marks `boundary` or anything above it.
    pub(crate) fn propagate_stale_until(&mut self, start: ContainerId, boundary: Option<ContainerId>) {
        let Ok(container) = self.container_mut(start) else {
            return;
        };
        container.stale = true;

        let mut next = self.parent_of(start);
        while let Some(id) = next {
            if Some(id) == boundary {
                break;
            }
            match self.container_mut(id) {
                Ok(c) if !c.stale => c.stale = true,
                _ => break,
            }
            next = self.parent_of(id);
        }
    }

    /// Set the explicit minimum floor of a container.
    pub fn set_default_size(&mut self, id: ContainerId, size: Size) -> Result<()> {
        let container = self.container_mut(id)?;
        if let Some(grid) = container.grid {
            return Err(LayoutError::GridInternal {
                container: id,
                grid,
            });
        }
        container.default_size = size;
        self.propagate_stale(id);
        Ok(())
    }

    /// Overwrite the cached minimum, ignoring content and default size.
    ///
    /// The forced value holds until the container next goes stale.
    pub fn force_min_size(&mut self, id: ContainerId, size: Size) -> Result<()> {
        let container = self.container_mut(id)?;
        container.min_size = size;
        container.stale = false;
        if let Some(parent) = self.parent_of(id) {
            self.propagate_stale(parent);
        }
        Ok(())
    }

    // =========================================================================
    // Minimum size pass
    // =========================================================================

    /// Bring the minimum size of a container up to date and return it.
    pub fn update_min_size(&mut self, id: ContainerId) -> Result<Size> {
        let container = self.container(id)?;
        if !container.stale {
            return Ok(container.min_size);
        }

        let content = if container.is_grid() {
            self.grid_min_size(id)?
        } else {
            self.linear_min_size(id)?
        };

        let container = self.container_mut(id)?;
        let min = content.max(container.default_size);
        container.min_size = min;
        container.stale = false;
        container.size = container.size.max(min);
        trace!(container = %id, width = min.width, height = min.height, "min size updated");
        Ok(min)
    }

    fn linear_min_size(&mut self, id: ContainerId) -> Result<Size> {
        let state = self.linear(id)?;
        let axis = state.axis;
        let gaps = state.gap * state.cells.len().saturating_sub(1) as i32;
        let parts: Vec<(Payload, Borders)> = state
            .cells
            .iter()
            .map(|c| (c.payload, c.options.borders))
            .collect();

        let mut growth = gaps;
        let mut cross = 0;
        for (index, (payload, borders)) in parts.into_iter().enumerate() {
            let min = borders.outer(self.payload_min_size(payload)?);
            if let Some(cell) = self.linear_mut(id)?.cells.get_mut(index) {
                cell.min_size = min;
            }
            growth += min.along(axis);
            cross = cross.max(min.along(axis.cross()));
        }
        Ok(Size::from_axes(axis, growth, cross))
    }

    fn payload_min_size(&mut self, payload: Payload) -> Result<Size> {
        match payload {
            Payload::Spacer(size) => Ok(size),
            Payload::Container(child) => self.update_min_size(child),
            Payload::Object(object) => {
                let slot = self.object_slot(object)?;
                let (own, child) = (slot.object.min_size(), slot.child);
                match child {
                    Some(child) => Ok(own.max(self.update_min_size(child)?)),
                    None => Ok(own),
                }
            }
        }
    }

    // =========================================================================
    // Distribution pass
    // =========================================================================

    /// Distribute `size` over a container, clamped up to its minimum.
    /// Returns the size the container took.
    pub fn set_size(&mut self, id: ContainerId, size: Size) -> Result<Size> {
        let min = self.update_min_size(id)?;
        let clamped = size.max(min);
        if clamped != size {
            debug!(
                container = %id,
                requested_width = size.width,
                requested_height = size.height,
                width = clamped.width,
                height = clamped.height,
                "requested size below minimum, clamped"
            );
        }

        let taken = if self.container(id)?.is_grid() {
            self.grid_set_size(id, clamped)?
        } else {
            self.linear_set_size(id, clamped)?;
            clamped
        };
        self.container_mut(id)?.size = taken;
        Ok(taken)
    }

    fn linear_set_size(&mut self, id: ContainerId, total: Size) -> Result<()> {
        let state = self.linear(id)?;
        let axis = state.axis;
        let tracks: Vec<Track> = state
            .cells
            .iter()
            .map(|c| Track::new(c.min_size.along(axis), c.options.proportions.along(axis)))
            .collect();

        let Some(lengths) = distribute(&tracks, total.along(axis), state.gap) else {
            error!(container = %id, "flexible cells have a zero proportion sum");
            return Err(LayoutError::ZeroProportionSum(id));
        };

        let cross = total.along(axis.cross());
        for (index, length) in lengths.into_iter().enumerate() {
            self.place_cell(id, index, axis, Size::from_axes(axis, length, cross))?;
        }
        trace!(container = %id, width = total.width, height = total.height, "size distributed");
        Ok(())
    }

    fn place_cell(&mut self, id: ContainerId, index: usize, axis: Axis, size: Size) -> Result<()> {
        let Some(cell) = self.linear(id)?.cells.get(index) else {
            return Ok(());
        };
        let payload = cell.payload;
        let request = cell.payload_request(axis, size);

        let taken = match payload {
            Payload::Spacer(_) => request,
            Payload::Container(child) => self.set_size(child, request)?,
            Payload::Object(object) => self.resize_object(object, request)?,
        };

        if let Some(cell) = self.linear_mut(id)?.cells.get_mut(index) {
            cell.finish_placement(axis, size, taken);
        }
        Ok(())
    }

    fn resize_object(&mut self, id: ObjectId, request: Size) -> Result<Size> {
        let slot = self.object_slot_mut(id)?;
        let taken = slot.object.set_size(request);
        if taken != request {
            debug!(
                object = %id,
                width = taken.width,
                height = taken.height,
                "object took a larger size than requested"
            );
        }
        let child = slot.child;
        if let Some(child) = child {
            self.set_size(child, taken)?;
        }
        Ok(taken)
    }

    // =========================================================================
    // Position pass
    // =========================================================================

    /// Place every payload below a container, starting at `origin`.
    pub fn calculate_positions(&mut self, id: ContainerId, origin: Point) -> Result<()> {
        let container = self.container_mut(id)?;
        container.position = origin;
        let rows = container.grid_state().map(|grid| grid.row_tracker);
        if let Some(rows) = rows {
            return self.calculate_positions(rows, origin);
        }

        let state = self.linear(id)?;
        let (axis, gap) = (state.axis, state.gap);
        let placements: Vec<(Payload, Point, i32)> = state
            .cells
            .iter()
            .map(|c| (c.payload, c.payload_offset, c.size.along(axis)))
            .collect();

        let mut cursor = origin;
        for (payload, offset, length) in placements {
            let at = cursor + offset;
            match payload {
                Payload::Spacer(_) => {}
                Payload::Object(object) => self.position_object(object, at)?,
                Payload::Container(child) => self.calculate_positions(child, at)?,
            }
            cursor = cursor.offset_along(axis, length + gap);
        }
        Ok(())
    }

    fn position_object(&mut self, id: ObjectId, at: Point) -> Result<()> {
        let slot = self.object_slot_mut(id)?;
        slot.position = at;
        slot.object.set_position(at);
        let child = slot.child;
        if let Some(child) = child {
            self.calculate_positions(child, Point::ORIGIN)?;
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Managed objects below a container in layout order. With
    /// `include_children`, objects in child layouts follow their parent.
    pub fn objects(&self, id: ContainerId, include_children: bool) -> Result<Vec<ObjectId>> {
        let mut out = Vec::new();
        self.collect_objects(id, include_children, &mut out)?;
        Ok(out)
    }

    fn collect_objects(
        &self,
        id: ContainerId,
        include_children: bool,
        out: &mut Vec<ObjectId>,
    ) -> Result<()> {
        let payloads: Vec<Payload> = match &self.container(id)?.kind {
            ContainerKind::Linear(state) => state.cells.iter().map(|c| c.payload).collect(),
            ContainerKind::Grid(grid) => grid.records.iter().map(|r| r.payload).collect(),
        };
        for payload in payloads {
            match payload {
                Payload::Spacer(_) => {}
                Payload::Object(object) => {
                    out.push(object);
                    if include_children {
                        if let Some(child) = self.object_slot(object)?.child {
                            self.collect_objects(child, true, out)?;
                        }
                    }
                }
                Payload::Container(child) => self.collect_objects(child, include_children, out)?,
            }
        }
        Ok(())
    }

    /// Geometry of a container and every object below it.
    ///
    /// Objects inside a child layout are reported in their parent object's
    /// coordinate space.
    pub fn snapshot(&self, id: ContainerId) -> Result<LayoutSnapshot> {
        let container = self.container(id)?;
        let bounds = Rect::from_origin_size(container.position, container.size);
        let mut objects = BTreeMap::new();
        for object in self.objects(id, true)? {
            let slot = self.object_slot(object)?;
            objects.insert(
                object,
                Rect::from_origin_size(slot.position, slot.object.size()),
            );
        }
        Ok(LayoutSnapshot { bounds, objects })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sizer_core::Alignment;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        sizes: Vec<Size>,
        positions: Vec<Point>,
        destroyed: bool,
    }

    struct Fixed {
        min: Size,
        size: Size,
        log: Rc<RefCell<Log>>,
    }

    impl ManagedObject for Fixed {
        fn min_size(&self) -> Size {
            self.min
        }

        fn size(&self) -> Size {
            self.size
        }

        fn set_size(&mut self, size: Size) -> Size {
            self.size = size;
            self.log.borrow_mut().sizes.push(size);
            size
        }

        fn set_position(&mut self, position: Point) {
            self.log.borrow_mut().positions.push(position);
        }

        fn destroy(&mut self) {
            self.log.borrow_mut().destroyed = true;
        }
    }

    fn object(tree: &mut LayoutTree, w: i32, h: i32) -> (ObjectId, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let id = tree.register(Fixed {
            min: Size::new(w, h),
            size: Size::ZERO,
            log: Rc::clone(&log),
        });
        (id, log)
    }

    fn flex_h() -> CellOptions {
        CellOptions::new().proportions(1.0, 0.0)
    }

    // =========================================================================
    // Minimum size
    // =========================================================================

    #[test]
    fn test_min_size_sums_growth_axis_with_gaps() {
        let mut tree = LayoutTree::new();
        let row = tree.new_container(Axis::Horizontal);
        tree.set_gap(row, 5).unwrap();
        tree.add(row, Size::new(10, 20), CellOptions::new()).unwrap();
        tree.add(row, Size::new(30, 5), CellOptions::new()).unwrap();
        tree.add(row, Size::new(1, 1), CellOptions::new().border(2)).unwrap();

        assert_eq!(tree.update_min_size(row).unwrap(), Size::new(55, 20));
    }

    #[test]
    fn test_min_size_floored_by_default() {
        let mut tree = LayoutTree::new();
        let col = tree.new_container(Axis::Vertical);
        tree.add(col, Size::new(10, 10), CellOptions::new()).unwrap();
        tree.set_default_size(col, Size::new(40, 5)).unwrap();
        assert_eq!(tree.update_min_size(col).unwrap(), Size::new(40, 10));
    }

    #[test]
    fn test_update_min_size_is_idempotent() {
        let mut tree = LayoutTree::new();
        let row = tree.new_container(Axis::Horizontal);
        let (obj, _) = object(&mut tree, 10, 10);
        tree.add(row, obj, CellOptions::new()).unwrap();
        assert!(tree.is_stale(row).unwrap());
        let first = tree.update_min_size(row).unwrap();
        assert!(!tree.is_stale(row).unwrap());
        assert_eq!(tree.update_min_size(row).unwrap(), first);
    }

    #[test]
    fn test_object_with_child_uses_larger_minimum() {
        let mut tree = LayoutTree::new();
        let root = tree.new_container(Axis::Horizontal);
        let (panel, _) = object(&mut tree, 20, 20);
        let inner = tree.new_container(Axis::Vertical);
        tree.add(inner, Size::new(50, 10), CellOptions::new()).unwrap();
        tree.set_child_container(panel, Some(inner)).unwrap();
        tree.add(root, panel, CellOptions::new()).unwrap();

        assert_eq!(tree.update_min_size(root).unwrap(), Size::new(50, 20));
    }

    // =========================================================================
    // Staleness
    // =========================================================================

    #[test]
    fn test_staleness_propagates_to_root() {
        let mut tree = LayoutTree::new();
        let root = tree.new_container(Axis::Vertical);
        let mid = tree.new_container(Axis::Horizontal);
        let leaf = tree.new_container(Axis::Vertical);
        tree.add(root, mid, CellOptions::new()).unwrap();
        tree.add(mid, leaf, CellOptions::new()).unwrap();
        tree.update_min_size(root).unwrap();

        tree.add(leaf, Size::new(3, 3), CellOptions::new()).unwrap();
        assert!(tree.is_stale(leaf).unwrap());
        assert!(tree.is_stale(mid).unwrap());
        assert!(tree.is_stale(root).unwrap());
    }

    #[test]
    fn test_staleness_stops_at_stale_ancestor() {
        let mut tree = LayoutTree::new();
        let root = tree.new_container(Axis::Vertical);
        let mid = tree.new_container(Axis::Horizontal);
        let leaf = tree.new_container(Axis::Vertical);
        tree.add(root, mid, CellOptions::new()).unwrap();
        tree.add(mid, leaf, CellOptions::new()).unwrap();
        tree.update_min_size(root).unwrap();

        // A stale middle container shields the root.
        tree.container_mut(mid).unwrap().stale = true;
        tree.propagate_stale(leaf);
        assert!(tree.is_stale(leaf).unwrap());
        assert!(!tree.is_stale(root).unwrap());
    }

    #[test]
    fn test_staleness_crosses_object_child_layouts() {
        let mut tree = LayoutTree::new();
        let root = tree.new_container(Axis::Vertical);
        let (panel, _) = object(&mut tree, 10, 10);
        let inner = tree.new_container(Axis::Horizontal);
        tree.set_child_container(panel, Some(inner)).unwrap();
        tree.add(root, panel, CellOptions::new()).unwrap();
        tree.update_min_size(root).unwrap();

        tree.add(inner, Size::new(1, 1), CellOptions::new()).unwrap();
        assert!(tree.is_stale(root).unwrap());
    }

    #[test]
    fn test_invalidate_object_marks_host() {
        let mut tree = LayoutTree::new();
        let root = tree.new_container(Axis::Vertical);
        let (obj, _) = object(&mut tree, 10, 10);
        tree.add(root, obj, CellOptions::new()).unwrap();
        tree.update_min_size(root).unwrap();
        tree.invalidate_object(obj).unwrap();
        assert!(tree.is_stale(root).unwrap());
    }

    #[test]
    fn test_force_min_size_overrides_until_stale() {
        let mut tree = LayoutTree::new();
        let root = tree.new_container(Axis::Vertical);
        tree.add(root, Size::new(10, 10), CellOptions::new()).unwrap();
        tree.force_min_size(root, Size::new(5, 5)).unwrap();
        assert_eq!(tree.update_min_size(root).unwrap(), Size::new(5, 5));
        tree.mark_stale(root).unwrap();
        assert_eq!(tree.update_min_size(root).unwrap(), Size::new(10, 10));
    }

    // =========================================================================
    // Distribution and positions
    // =========================================================================

    #[test]
    fn test_equal_split_and_positions() {
        let mut tree = LayoutTree::new();
        let row = tree.new_container(Axis::Horizontal);
        let mut logs = Vec::new();
        for _ in 0..3 {
            let (obj, log) = object(&mut tree, 50, 20);
            tree.add(row, obj, flex_h()).unwrap();
            logs.push(log);
        }
        assert_eq!(tree.set_size(row, Size::new(300, 40)).unwrap(), Size::new(300, 40));
        tree.calculate_positions(row, Point::ORIGIN).unwrap();

        for (i, log) in logs.iter().enumerate() {
            let log = log.borrow();
            assert_eq!(log.sizes.last(), Some(&Size::new(100, 40)));
            assert_eq!(log.positions.last(), Some(&Point::new(100 * i as i32, 0)));
        }
    }

    #[test]
    fn test_set_size_clamps_to_minimum() {
        let mut tree = LayoutTree::new();
        let row = tree.new_container(Axis::Horizontal);
        for _ in 0..3 {
            let (obj, _) = object(&mut tree, 50, 20);
            tree.add(row, obj, flex_h()).unwrap();
        }
        assert_eq!(tree.set_size(row, Size::new(120, 10)).unwrap(), Size::new(150, 20));
        assert_eq!(tree.container(row).unwrap().size(), Size::new(150, 20));
    }

    #[test]
    fn test_cross_alignment_offsets() {
        let mut tree = LayoutTree::new();
        let row = tree.new_container(Axis::Horizontal);
        let (top, top_log) = object(&mut tree, 10, 10);
        let (mid, mid_log) = object(&mut tree, 10, 10);
        let (bottom, bottom_log) = object(&mut tree, 10, 10);
        tree.add(row, top, CellOptions::new().alignments(Alignment::Min, Alignment::Min))
            .unwrap();
        tree.add(row, mid, CellOptions::new().alignments(Alignment::Min, Alignment::Center))
            .unwrap();
        tree.add(row, bottom, CellOptions::new().alignments(Alignment::Min, Alignment::Max))
            .unwrap();
        tree.set_size(row, Size::new(30, 41)).unwrap();
        tree.calculate_positions(row, Point::new(5, 5)).unwrap();

        assert_eq!(top_log.borrow().positions.last(), Some(&Point::new(5, 5)));
        assert_eq!(mid_log.borrow().positions.last(), Some(&Point::new(15, 20)));
        assert_eq!(bottom_log.borrow().positions.last(), Some(&Point::new(25, 36)));
        assert_eq!(bottom_log.borrow().sizes.last(), Some(&Size::new(10, 10)));
    }

    #[test]
    fn test_gap_advances_cursor() {
        let mut tree = LayoutTree::new();
        let col = tree.new_container(Axis::Vertical);
        tree.set_gap(col, 7).unwrap();
        let (a, _) = object(&mut tree, 10, 10);
        let (b, b_log) = object(&mut tree, 10, 10);
        tree.add(col, a, CellOptions::new()).unwrap();
        tree.add(col, b, CellOptions::new()).unwrap();
        tree.set_size(col, Size::new(10, 27)).unwrap();
        tree.calculate_positions(col, Point::ORIGIN).unwrap();
        assert_eq!(b_log.borrow().positions.last(), Some(&Point::new(0, 17)));
    }

    #[test]
    fn test_child_layout_uses_local_coordinates() {
        let mut tree = LayoutTree::new();
        let root = tree.new_container(Axis::Horizontal);
        tree.add(root, Size::new(40, 0), CellOptions::new()).unwrap();
        let (panel, _) = object(&mut tree, 10, 10);
        let inner = tree.new_container(Axis::Vertical);
        let (button, button_log) = object(&mut tree, 10, 10);
        tree.add(inner, Size::new(0, 15), CellOptions::new()).unwrap();
        tree.add(inner, button, CellOptions::new()).unwrap();
        tree.set_child_container(panel, Some(inner)).unwrap();
        tree.add(root, panel, flex_h()).unwrap();

        tree.set_size(root, Size::new(100, 50)).unwrap();
        tree.calculate_positions(root, Point::ORIGIN).unwrap();

        assert_eq!(tree.object_position(panel).unwrap(), Point::new(40, 0));
        assert_eq!(button_log.borrow().positions.last(), Some(&Point::new(0, 15)));
        assert_eq!(tree.container(inner).unwrap().size(), Size::new(60, 50));
    }

    // =========================================================================
    // Structural errors and lifecycle
    // =========================================================================

    #[test]
    fn test_invalid_proportion_rejected() {
        let mut tree = LayoutTree::new();
        let row = tree.new_container(Axis::Horizontal);
        let err = tree
            .add(row, Size::ZERO, CellOptions::new().proportions(-1.0, 0.0))
            .unwrap_err();
        assert_eq!(err, LayoutError::InvalidProportion(-1.0));
        assert!(tree.container(row).unwrap().cells().is_empty());
    }

    #[test]
    fn test_cycle_rejected() {
        let mut tree = LayoutTree::new();
        let outer = tree.new_container(Axis::Horizontal);
        let inner = tree.new_container(Axis::Vertical);
        tree.add(outer, inner, CellOptions::new()).unwrap();

        assert_eq!(
            tree.add(outer, outer, CellOptions::new()),
            Err(LayoutError::Cycle {
                parent: outer,
                child: outer
            })
        );
        // `outer` is detached, so the only failure mode left is the cycle.
        assert_eq!(
            tree.add(inner, outer, CellOptions::new()),
            Err(LayoutError::Cycle {
                parent: inner,
                child: outer
            })
        );
    }

    #[test]
    fn test_double_placement_rejected() {
        let mut tree = LayoutTree::new();
        let a = tree.new_container(Axis::Horizontal);
        let b = tree.new_container(Axis::Horizontal);
        let inner = tree.new_container(Axis::Vertical);
        let (obj, _) = object(&mut tree, 1, 1);
        tree.add(a, inner, CellOptions::new()).unwrap();
        tree.add(a, obj, CellOptions::new()).unwrap();
        assert_eq!(
            tree.add(b, inner, CellOptions::new()),
            Err(LayoutError::AlreadyOwned(inner))
        );
        assert_eq!(
            tree.add(b, obj, CellOptions::new()),
            Err(LayoutError::AlreadyHosted(obj))
        );
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut tree = LayoutTree::new();
        let row = tree.new_container(Axis::Horizontal);
        assert_eq!(
            tree.insert(row, 1, Size::ZERO, CellOptions::new()),
            Err(LayoutError::IndexOutOfRange {
                container: row,
                index: 1,
                len: 0
            })
        );
    }

    #[test]
    fn test_insert_at_index_orders_cells() {
        let mut tree = LayoutTree::new();
        let row = tree.new_container(Axis::Horizontal);
        let a = tree.add(row, Size::new(1, 1), CellOptions::new()).unwrap();
        let b = tree.add(row, Size::new(2, 2), CellOptions::new()).unwrap();
        let c = tree.insert(row, 1, Size::new(3, 3), CellOptions::new()).unwrap();
        assert_eq!(tree.cell_index(row, a).unwrap(), 0);
        assert_eq!(tree.cell_index(row, c).unwrap(), 1);
        assert_eq!(tree.cell_index(row, b).unwrap(), 2);
    }

    #[test]
    fn test_remove_missing_cell() {
        let mut tree = LayoutTree::new();
        let row = tree.new_container(Axis::Horizontal);
        let cell = tree.add(row, Size::ZERO, CellOptions::new()).unwrap();
        tree.remove_cell(row, cell, false).unwrap();
        assert_eq!(
            tree.remove_cell(row, cell, false),
            Err(LayoutError::CellNotFound {
                container: row,
                cell
            })
        );
    }

    #[test]
    fn test_remove_with_destroy_honors_preserve() {
        let mut tree = LayoutTree::new();
        let row = tree.new_container(Axis::Horizontal);
        let (kept, kept_log) = object(&mut tree, 1, 1);
        let (gone, gone_log) = object(&mut tree, 1, 1);
        let kept_cell = tree.add(row, kept, CellOptions::new()).unwrap();
        let gone_cell = tree.add(row, gone, CellOptions::new()).unwrap();
        tree.set_preserve_payload(row, kept_cell, true).unwrap();

        tree.remove_cell(row, kept_cell, true).unwrap();
        tree.remove_cell(row, gone_cell, true).unwrap();

        assert!(!kept_log.borrow().destroyed);
        assert!(tree.contains_object(kept));
        assert_eq!(tree.object_host(kept).unwrap(), None);
        assert!(gone_log.borrow().destroyed);
        assert!(!tree.contains_object(gone));
    }

    #[test]
    fn test_detach_and_reinsert_cell() {
        let mut tree = LayoutTree::new();
        let a = tree.new_container(Axis::Horizontal);
        let b = tree.new_container(Axis::Vertical);
        let (obj, _) = object(&mut tree, 4, 4);
        let cell = tree
            .add(a, obj, CellOptions::new().proportions(2.0, 0.0))
            .unwrap();
        tree.set_preserve_payload(a, cell, true).unwrap();

        let detached = tree.detach_cell(a, cell).unwrap();
        assert_eq!(tree.object_host(obj).unwrap(), None);

        let new_cell = tree.insert_cell(b, 0, detached).unwrap();
        let moved = tree.cell(b, new_cell).unwrap();
        assert_eq!(moved.options().proportions.horizontal, 2.0);
        assert!(moved.preserves_payload());
        assert_eq!(
            tree.object_host(obj).unwrap(),
            Some(CellRef::new(b, new_cell))
        );
    }

    #[test]
    fn test_clear_destroys_nested_content() {
        let mut tree = LayoutTree::new();
        let root = tree.new_container(Axis::Vertical);
        let nested = tree.new_container(Axis::Horizontal);
        let (obj, log) = object(&mut tree, 1, 1);
        tree.add(nested, obj, CellOptions::new()).unwrap();
        tree.add(root, nested, CellOptions::new()).unwrap();

        tree.clear(root, true).unwrap();
        assert!(tree.container(root).unwrap().cells().is_empty());
        assert!(!tree.contains_container(nested));
        assert!(log.borrow().destroyed);
    }

    #[test]
    fn test_destroy_container_unhooks_from_parent() {
        let mut tree = LayoutTree::new();
        let root = tree.new_container(Axis::Vertical);
        let nested = tree.new_container(Axis::Horizontal);
        tree.add(root, nested, CellOptions::new()).unwrap();
        tree.update_min_size(root).unwrap();

        tree.destroy_container(nested).unwrap();
        assert!(tree.container(root).unwrap().cells().is_empty());
        assert!(tree.is_stale(root).unwrap());
        assert_eq!(
            tree.update_min_size(nested),
            Err(LayoutError::UnknownContainer(nested))
        );
    }

    #[test]
    fn test_destroy_object_removes_cell() {
        let mut tree = LayoutTree::new();
        let root = tree.new_container(Axis::Vertical);
        let (obj, log) = object(&mut tree, 1, 1);
        tree.add(root, obj, CellOptions::new()).unwrap();
        tree.destroy_object(obj).unwrap();
        assert!(tree.container(root).unwrap().cells().is_empty());
        assert!(log.borrow().destroyed);
        assert!(tree.object(obj).is_err());
    }

    #[test]
    fn test_remove_object_requires_host() {
        let mut tree = LayoutTree::new();
        let (obj, _) = object(&mut tree, 1, 1);
        assert_eq!(tree.remove_object(obj, false), Err(LayoutError::NotHosted(obj)));
    }

    #[test]
    fn test_objects_enumeration_order() {
        let mut tree = LayoutTree::new();
        let root = tree.new_container(Axis::Vertical);
        let (a, _) = object(&mut tree, 1, 1);
        let (panel, _) = object(&mut tree, 1, 1);
        let (child, _) = object(&mut tree, 1, 1);
        let (b, _) = object(&mut tree, 1, 1);
        let inner = tree.new_container(Axis::Horizontal);
        tree.add(inner, child, CellOptions::new()).unwrap();
        tree.set_child_container(panel, Some(inner)).unwrap();
        let nested = tree.new_container(Axis::Horizontal);
        tree.add(nested, b, CellOptions::new()).unwrap();

        tree.add(root, a, CellOptions::new()).unwrap();
        tree.add(root, panel, CellOptions::new()).unwrap();
        tree.add(root, nested, CellOptions::new()).unwrap();

        assert_eq!(tree.objects(root, true).unwrap(), vec![a, panel, child, b]);
        assert_eq!(tree.objects(root, false).unwrap(), vec![a, panel, b]);
    }

    #[test]
    fn test_child_container_cycle_rejected() {
        let mut tree = LayoutTree::new();
        let root = tree.new_container(Axis::Vertical);
        let (panel, _) = object(&mut tree, 1, 1);
        tree.add(root, panel, CellOptions::new()).unwrap();
        assert_eq!(
            tree.set_child_container(panel, Some(root)),
            Err(LayoutError::Cycle {
                parent: root,
                child: root
            })
        );
    }
}
