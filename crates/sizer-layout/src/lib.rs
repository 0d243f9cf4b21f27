#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
//! Constraint-based box and grid layout.
//!
//! A [`LayoutTree`] arranges rectangular cells inside linear containers that
//! stack along one axis, and inside grid containers built on top of them.
//! Every cell has a minimum size; surplus space is shared out by proportion.
//!
//! - **Containers** stack cells horizontally or vertically with a fixed gap.
//! - **Cells** hold a spacer, a nested container or a registered
//!   [`ManagedObject`](sizer_core::ManagedObject), with per-axis proportions,
//!   alignments and borders.
//! - **Grids** place items row-major or column-major with one fixed dimension.
//! - **Minimum sizes** are cached and recomputed only when marked stale.
//!
//! [`LayoutEngine`] drives the three passes (minimum size, distribution,
//! positions) over a root container.

mod cell;
mod container;
mod distribute;
mod engine;
mod error;
mod grid;
mod id;
mod snapshot;
mod tree;

pub use cell::{Cell, CellOptions, Payload};
pub use container::{CellRef, Container, Owner};
pub use engine::LayoutEngine;
pub use error::{LayoutError, Result};
pub use grid::{GridAutoFlow, GridRecord, GridTemplate};
pub use id::{CellId, ContainerId, ObjectId};
pub use snapshot::LayoutSnapshot;
pub use tree::LayoutTree;
