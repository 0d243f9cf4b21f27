#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::new_without_default)]
//! Test doubles for the sizer layout engine.
//!
//! - [`TestObject`]: a managed object with a fixed minimum that accepts any
//!   size, or in stubborn mode insists on its minimum
//! - [`Probe`]: a managed object that records every call into a shared
//!   [`ProbeLog`] the test keeps a handle to
//! - Geometry assertions with caller-located failure messages

mod assert;
mod object;

pub use assert::{assert_contains, assert_disjoint, assert_size_at_least, assert_total};
pub use object::{Probe, ProbeLog, TestObject};
