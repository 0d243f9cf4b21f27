//! Layout driver.

use sizer_core::{Axis, Point, Size};
use tracing::debug;

use crate::error::Result;
use crate::id::ContainerId;
use crate::snapshot::LayoutSnapshot;
use crate::tree::LayoutTree;

/// Owns a tree and its root container, and runs the three layout passes.
#[derive(Debug)]
pub struct LayoutEngine {
    tree: LayoutTree,
    root: ContainerId,
    area: Option<Size>,
}

impl LayoutEngine {
    /// Create an engine with an empty tree and a linear root container.
    #[must_use]
    pub fn new(axis: Axis) -> Self {
        let mut tree = LayoutTree::new();
        let root = tree.new_container(axis);
        Self {
            tree,
            root,
            area: None,
        }
    }

    /// Drive an existing tree from `root`.
    pub fn with_tree(tree: LayoutTree, root: ContainerId) -> Result<Self> {
        tree.container(root)?;
        Ok(Self {
            tree,
            root,
            area: None,
        })
    }

    /// The tree.
    #[must_use]
    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    /// The tree, for structural changes. Changes mark the root stale, so the
    /// next [`LayoutEngine::resize`] lays out again.
    pub fn tree_mut(&mut self) -> &mut LayoutTree {
        &mut self.tree
    }

    /// Root container.
    #[must_use]
    pub const fn root(&self) -> ContainerId {
        self.root
    }

    /// Area of the last layout, after clamping.
    #[must_use]
    pub const fn area(&self) -> Option<Size> {
        self.area
    }

    /// Minimum size of the root.
    pub fn min_size(&mut self) -> Result<Size> {
        self.tree.update_min_size(self.root)
    }

    /// Run every pass over `area` and return the size the root took.
    pub fn layout(&mut self, area: Size) -> Result<Size> {
        self.tree.update_min_size(self.root)?;
        let size = self.tree.set_size(self.root, area)?;
        self.tree.calculate_positions(self.root, Point::ORIGIN)?;
        self.area = Some(size);
        debug!(root = %self.root, width = size.width, height = size.height, "layout complete");
        Ok(size)
    }

    /// Lay out again for a new area. Returns `None` when neither the clamped
    /// area nor the tree changed since the last layout.
    pub fn resize(&mut self, area: Size) -> Result<Option<Size>> {
        let stale = self.tree.is_stale(self.root)?;
        let clamped = area.max(self.tree.update_min_size(self.root)?);
        if !stale && self.area == Some(clamped) {
            return Ok(None);
        }
        self.layout(clamped).map(Some)
    }

    /// Geometry of the whole tree.
    pub fn snapshot(&self) -> Result<LayoutSnapshot> {
        self.tree.snapshot(self.root)
    }
}
