//! Arena-local identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a container inside a [`LayoutTree`](crate::LayoutTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId(pub(crate) usize);

/// Identifier of a managed object registered in a [`LayoutTree`](crate::LayoutTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub(crate) usize);

/// Identifier of a cell; unique within one tree for the tree's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub(crate) u64);

impl ContainerId {
    /// Position of the container in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl ObjectId {
    /// Position of the object in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl CellId {
    /// Raw sequence number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container#{}", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell#{}", self.0)
    }
}
