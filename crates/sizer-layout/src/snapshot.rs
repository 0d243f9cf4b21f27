//! Serializable geometry of a laid-out tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sizer_core::Rect;

use crate::id::ObjectId;

/// Bounds of a container and of every managed object below it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    /// Position and size of the container
    pub bounds: Rect,
    /// Position and size of each object
    pub objects: BTreeMap<ObjectId, Rect>,
}

impl LayoutSnapshot {
    /// Bounds of one object.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<Rect> {
        self.objects.get(&id).copied()
    }

    /// Number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no object was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
