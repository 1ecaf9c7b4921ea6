//! Error types for store mutation and typed access.

use std::error::Error;
use std::fmt;

use trellis_core::{ElementKind, ObjectId};

/// Errors from structural mutation or typed access on a
/// `DataStructure`.
///
/// Absence of an object during plain lookup is reported as `None`
/// from the accessor, not an error; `StoreError` covers operations
/// that were asked to do something and could not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// A sibling with the requested name already exists under the
    /// target parent.
    NameCollision {
        /// The parent the insertion targeted, `None` for the root set.
        parent: Option<ObjectId>,
        /// The colliding name.
        name: String,
    },
    /// The referenced id does not resolve to a live object (never
    /// issued, or tombstoned by removal).
    AbsentObject {
        /// The unresolvable id.
        id: ObjectId,
    },
    /// The designated parent id does not resolve to a live object.
    AbsentParent {
        /// The unresolvable parent id.
        id: ObjectId,
    },
    /// The object exists but is not an array.
    NotAnArray {
        /// The object's id.
        id: ObjectId,
    },
    /// The array exists but stores a different element kind than the
    /// one requested.
    KindMismatch {
        /// The array's id.
        id: ObjectId,
        /// The kind the caller asked for.
        expected: ElementKind,
        /// The kind actually stored.
        actual: ElementKind,
    },
    /// A tuple or component shape was empty or contained a zero
    /// extent.
    ZeroSizedShape {
        /// Name of the array whose creation was rejected.
        name: String,
    },
    /// The operation is not defined for this object's payload kind
    /// (e.g. deep duplication of a grid geometry).
    UnsupportedOperation {
        /// Short name of the rejected operation.
        operation: &'static str,
        /// The target object's id.
        id: ObjectId,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameCollision { parent, name } => match parent {
                Some(parent) => {
                    write!(f, "name '{name}' already exists under object {parent}")
                }
                None => write!(f, "top-level name '{name}' already exists"),
            },
            Self::AbsentObject { id } => write!(f, "object {id} does not resolve"),
            Self::AbsentParent { id } => write!(f, "parent object {id} does not resolve"),
            Self::NotAnArray { id } => write!(f, "object {id} is not an array"),
            Self::KindMismatch {
                id,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "array {id} stores element kind {actual}, not {expected}"
                )
            }
            Self::ZeroSizedShape { name } => {
                write!(f, "array '{name}' would have a zero-sized shape")
            }
            Self::UnsupportedOperation { operation, id } => {
                write!(f, "operation '{operation}' is not supported by object {id}")
            }
        }
    }
}

impl Error for StoreError {}
