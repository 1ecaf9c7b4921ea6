//! The opaque [`ObjectId`] identifier.

use std::fmt;

/// Identifies one object inside a `DataStructure`.
///
/// Ids are issued by the owning `DataStructure` from a monotonic
/// counter starting at 1, and are stable for the object's lifetime.
/// Once an object is removed its id is tombstoned: it never resolves
/// again and is never reused for a later object. Id 0 is never issued.
///
/// Every non-owning reference between objects (a geometry referencing
/// its bound arrays, a filter referencing an input path) is stored as
/// an `ObjectId` and re-resolved through the `DataStructure` on each
/// access, so deletion while referenced degrades to "absent" rather
/// than a dangling pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ObjectId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
