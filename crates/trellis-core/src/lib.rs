//! Core types and traits for the Trellis dataset pipeline engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental vocabulary used throughout the Trellis workspace:
//! object identifiers, element kinds, shapes, data paths, diagnostics,
//! and the cooperative cancellation token.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cancel;
pub mod diagnostic;
pub mod element;
pub mod id;
pub mod path;

pub use cancel::CancelToken;
pub use diagnostic::Diagnostic;
pub use element::{shape_element_count, Element, ElementKind, NumericElement, Shape};
pub use id::ObjectId;
pub use path::DataPath;
