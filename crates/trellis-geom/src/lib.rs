//! Rectilinear grid geometry for the Trellis data store.
//!
//! A grid geometry is a store object whose payload carries a
//! cell-count vector and weak (id-based) references to three
//! strictly-increasing bound arrays, one per axis. All operations
//! here re-resolve those ids through the owning
//! [`DataStructure`](trellis_store::DataStructure) per call and cache
//! derived quantities (per-cell volumes) as child arrays of the
//! geometry, invalidated and recomputed on demand.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod rect_grid;

pub use error::{Axis, GeomError};
