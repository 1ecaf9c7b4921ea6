//! Binary group persistence for Trellis data structures.
//!
//! Serializes the subtree rooted at one store object into any `Write`
//! sink and reconstructs an equivalent subtree from any `Read`
//! source. Ids are reassigned on reload; names, element kinds,
//! shapes, element data, geometry cell counts, and geometry
//! references round-trip exactly.
//!
//! # Format
//!
//! ```text
//! [MAGIC "TRLS"] [VERSION u8] [node]
//! node  := name, payload tag, payload, child count, node × count
//! array := kind tag, tuple shape, component shape, raw elements
//! grid  := dims × 3, four optional child-name references
//! ```
//!
//! All integers are little-endian; strings are length-prefixed. The
//! codec is deliberately dependency-free.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use error::ArchiveError;
pub use reader::read_group;
pub use writer::write_group;

/// Magic bytes at the start of every archived group.
pub const MAGIC: &[u8; 4] = b"TRLS";

/// Current format version.
pub const FORMAT_VERSION: u8 = 1;

/// Payload tag for group nodes.
pub const TAG_GROUP: u8 = 0;
/// Payload tag for array nodes.
pub const TAG_ARRAY: u8 = 1;
/// Payload tag for rectilinear grid geometry nodes.
pub const TAG_RECT_GRID: u8 = 2;
