//! Trellis: a pipeline engine for transforming hierarchical
//! scientific datasets.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Trellis sub-crates. For most users, adding `trellis` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use trellis::prelude::*;
//! use trellis::filters::{scalar_arithmetic, ScalarArithmetic};
//! use smallvec::smallvec;
//!
//! // A store with one int32 ramp array.
//! let mut structure = DataStructure::new();
//! let input = structure
//!     .create_array(None, "counts", ElementKind::Int32, smallvec![10], smallvec![1])
//!     .unwrap();
//! {
//!     let mut guard = structure.write_typed::<i32>(input).unwrap();
//!     for i in 0..10 {
//!         guard.set(i, i as i32);
//!     }
//! }
//!
//! // Add 1 to every element, into a new array.
//! let mut args = Arguments::new();
//! args.insert(scalar_arithmetic::K_OPERATOR, ParamValue::Choice(0));
//! args.insert(scalar_arithmetic::K_VALUE, ParamValue::Int(1));
//! args.insert(
//!     scalar_arithmetic::K_INPUT_ARRAY,
//!     ParamValue::Path(DataPath::parse("counts")),
//! );
//! args.insert(
//!     scalar_arithmetic::K_OUTPUT_ARRAY,
//!     ParamValue::Path(DataPath::parse("shifted")),
//! );
//!
//! let filter = ScalarArithmetic;
//! let plan = filter.plan(&structure, &args);
//! assert!(plan.valid);
//! let outcome = filter.commit(&mut structure, &args, &CancelToken::new());
//! assert_eq!(outcome.status, CommitStatus::Succeeded);
//!
//! let output = structure.resolve_path(&DataPath::parse("shifted")).unwrap();
//! assert_eq!(
//!     structure.read_typed::<i32>(output).unwrap().as_slice(),
//!     &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
//! );
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `trellis-core` | Ids, element kinds, paths, diagnostics, cancellation |
//! | [`store`] | `trellis-store` | `DataStructure` arena, typed and erased array storage |
//! | [`geom`] | `trellis-geom` | Rectilinear grid geometry and derived arrays |
//! | [`filter`] | `trellis-filter` | Parameter schemas, actions, the two-phase protocol |
//! | [`filters`] | `trellis-filters` | Reference filters (scalar arithmetic, constant fill) |
//! | [`archive`] | `trellis-archive` | Binary group persistence |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core ids, element kinds, paths, and diagnostics (`trellis-core`).
pub use trellis_core as types;

/// The data store arena and array storage (`trellis-store`).
///
/// [`store::DataStructure`] owns every object; arrays are accessed
/// through typed read/write guards.
pub use trellis_store as store;

/// Rectilinear grid geometry (`trellis-geom`).
///
/// Grid state lives in the store; the [`geom::rect_grid`] module
/// operates on it by id.
pub use trellis_geom as geom;

/// The two-phase filter protocol (`trellis-filter`).
///
/// The [`filter::Filter`] trait is the main extension point for
/// user-defined transformations.
pub use trellis_filter as filter;

/// Reference filter implementations (`trellis-filters`).
pub use trellis_filters as filters;

/// Binary group persistence (`trellis-archive`).
///
/// [`archive::write_group`] and [`archive::read_group`] round-trip a
/// subtree through any byte stream.
pub use trellis_archive as archive;

/// Common imports for typical Trellis usage.
///
/// ```rust
/// use trellis::prelude::*;
/// ```
pub mod prelude {
    // Core vocabulary
    pub use trellis_core::{
        CancelToken, DataPath, Diagnostic, Element, ElementKind, NumericElement, ObjectId, Shape,
    };

    // Store
    pub use trellis_store::{
        DataObject, DataStructure, ErasedStore, NodePayload, StoreElement, StoreError, TypedStore,
    };

    // Geometry
    pub use trellis_geom::{Axis, GeomError};

    // Filter protocol
    pub use trellis_filter::{
        Action, Arguments, CommitOutcome, CommitStatus, Filter, ParamKind, ParamSpec, ParamValue,
        ParameterSchema, PlanOutcome,
    };

    // Persistence
    pub use trellis_archive::{read_group, write_group, ArchiveError};
}
