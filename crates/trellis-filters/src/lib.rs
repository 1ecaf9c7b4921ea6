//! Reference filter implementations for the Trellis pipeline engine.
//!
//! Each filter is a stateless [`Filter`](trellis_filter::Filter)
//! implementation demonstrating one corner of the two-phase
//! protocol:
//!
//! - [`ScalarArithmetic`] — plans a created output array and
//!   dispatches a per-element computation over the input's runtime
//!   element kind.
//! - [`ConstantFill`] — mutates an existing array in place with no
//!   structural actions.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod constant_fill;
pub mod scalar_arithmetic;

pub use constant_fill::ConstantFill;
pub use scalar_arithmetic::{Operator, ScalarArithmetic};
