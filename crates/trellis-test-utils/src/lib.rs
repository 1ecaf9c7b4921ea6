//! Test fixtures for Trellis development.
//!
//! Small, deterministic stores used across the workspace's tests:
//! a ramp-filled integer array and a populated 2×1×1 rectilinear
//! grid.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{bounds_array, grid_2x1x1, ramp_store};
