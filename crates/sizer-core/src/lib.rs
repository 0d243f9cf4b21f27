//! Core types and traits for the Sizer layout engine.
//!
//! This crate provides the value types shared by every layer:
//! - Geometric primitives in pixels: [`Point`], [`Size`], [`Rect`], [`Borders`]
//! - Axes and cross-axis placement: [`Axis`], [`Alignment`], [`Alignments`]
//! - Growth weights: [`Proportions`]
//! - The payload contract: [`ManagedObject`]

mod align;
mod geometry;
mod object;
mod proportion;

pub use align::{Alignment, Alignments, Axis, ParseTagError, TagKind};
pub use geometry::{Borders, Point, Rect, Size};
pub use object::ManagedObject;
pub use proportion::{is_valid_weight, Proportions};
