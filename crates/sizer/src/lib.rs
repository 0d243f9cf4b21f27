//! Sizer: a constraint-based box and grid layout engine.
//!
//! Cells with minimum sizes are stacked in linear containers or placed in
//! grids; surplus space is shared out by proportion and every payload is
//! positioned inside its cell according to its alignment and borders.
//!
//! ```
//! use sizer::prelude::*;
//!
//! let mut engine = LayoutEngine::new(Axis::Horizontal);
//! let root = engine.root();
//! for _ in 0..3 {
//!     engine
//!         .tree_mut()
//!         .add(root, Size::new(50, 20), CellOptions::new().proportions(1.0, 0.0))
//!         .unwrap();
//! }
//! assert_eq!(engine.layout(Size::new(300, 40)).unwrap(), Size::new(300, 40));
//! let widths: Vec<i32> = engine
//!     .tree()
//!     .container(root)
//!     .unwrap()
//!     .cells()
//!     .iter()
//!     .map(|c| c.size().width)
//!     .collect();
//! assert_eq!(widths, vec![100, 100, 100]);
//! ```

pub use sizer_core::*;
pub use sizer_layout as layout;
pub use sizer_yaml as yaml;

/// The types most layouts need.
pub mod prelude {
    pub use sizer_core::{
        Alignment, Alignments, Axis, Borders, ManagedObject, Point, Proportions, Rect, Size,
    };
    pub use sizer_layout::{
        CellId, CellOptions, ContainerId, GridTemplate, LayoutEngine, LayoutError, LayoutSnapshot,
        LayoutTree, ObjectId, Payload,
    };
    pub use sizer_yaml::{Manifest, ManifestError};
}
