//! Ownership-graph data store and typed array storage for Trellis.
//!
//! # Architecture
//!
//! ```text
//! DataStructure (arena, id → DataObject, sole mutation authority)
//! ├── DataObject (id, name, parent link, named child set)
//! │   └── NodePayload
//! │       ├── Group                      (pure container)
//! │       ├── Array → ArrayNode          (shared handle)
//! │       │            └── ErasedStore   (closed kind-tagged variant)
//! │       │                 └── TypedStore<T> (contiguous shaped buffer)
//! │       └── RectGrid                   (geometry state: ids + dims)
//! ```
//!
//! Objects reference each other only by [`ObjectId`]
//! (re-exported from `trellis-core`); the arena is the single owner.
//! Removal tombstones ids permanently, so every weak reference
//! degrades to an absent lookup instead of dangling.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod erased;
pub mod error;
pub mod object;
pub mod structure;
pub mod typed;

pub use erased::{ErasedStore, SharedStore, StoreElement};
pub use error::StoreError;
pub use object::{ArrayNode, DataObject, NodePayload, RectGrid};
pub use structure::DataStructure;
pub use typed::TypedStore;

pub use trellis_core::ObjectId;
