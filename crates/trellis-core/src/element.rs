//! Element kinds, shapes, and the per-kind dispatch traits.
//!
//! Trellis arrays are type-erased at the storage layer and recovered
//! through a closed set of element kinds. Generic numeric algorithms
//! are written once over [`Element`] (or [`NumericElement`]) and
//! instantiated per kind by an explicit match over [`ElementKind`] at
//! the dispatch boundary.

use smallvec::SmallVec;
use std::fmt;

/// A tuple or component shape.
///
/// Uses `SmallVec<[usize; 4]>` to avoid heap allocation for the
/// common 1-D to 4-D cases; higher ranks spill to the heap
/// transparently.
pub type Shape = SmallVec<[usize; 4]>;

/// Number of elements described by a shape: the product of its
/// extents. An empty shape describes zero elements.
pub fn shape_element_count(shape: &[usize]) -> usize {
    if shape.is_empty() {
        return 0;
    }
    shape.iter().product()
}

/// Runtime tag identifying the element kind of a type-erased array.
///
/// The set is closed: every array in a `DataStructure` holds exactly
/// one of these kinds, and kind-dispatched algorithms match
/// exhaustively over it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 8-bit integer.
    UInt8,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Unsigned 64-bit integer.
    UInt64,
    /// 32-bit IEEE-754 float.
    Float32,
    /// 64-bit IEEE-754 float.
    Float64,
    /// Boolean flag.
    Boolean,
}

impl ElementKind {
    /// Every kind, in canonical order.
    pub const ALL: [ElementKind; 11] = [
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::UInt8,
        Self::UInt16,
        Self::UInt32,
        Self::UInt64,
        Self::Float32,
        Self::Float64,
        Self::Boolean,
    ];

    /// The kinds arithmetic filters accept: everything but `Boolean`.
    pub const NUMERIC: [ElementKind; 10] = [
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::UInt8,
        Self::UInt16,
        Self::UInt32,
        Self::UInt64,
        Self::Float32,
        Self::Float64,
    ];

    /// Whether this kind participates in numeric computation.
    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Boolean)
    }

    /// Canonical lower-case name, used in diagnostics and persistence.
    pub fn name(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A concrete element scalar with a runtime kind tag.
///
/// `Default` is required to be the kind's zero value; freshly created
/// arrays read back as all zeros.
pub trait Element: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// The runtime tag for this scalar type.
    const KIND: ElementKind;
}

impl Element for i8 {
    const KIND: ElementKind = ElementKind::Int8;
}
impl Element for i16 {
    const KIND: ElementKind = ElementKind::Int16;
}
impl Element for i32 {
    const KIND: ElementKind = ElementKind::Int32;
}
impl Element for i64 {
    const KIND: ElementKind = ElementKind::Int64;
}
impl Element for u8 {
    const KIND: ElementKind = ElementKind::UInt8;
}
impl Element for u16 {
    const KIND: ElementKind = ElementKind::UInt16;
}
impl Element for u32 {
    const KIND: ElementKind = ElementKind::UInt32;
}
impl Element for u64 {
    const KIND: ElementKind = ElementKind::UInt64;
}
impl Element for f32 {
    const KIND: ElementKind = ElementKind::Float32;
}
impl Element for f64 {
    const KIND: ElementKind = ElementKind::Float64;
}
impl Element for bool {
    const KIND: ElementKind = ElementKind::Boolean;
}

/// Scalar arithmetic for the ten numeric kinds.
///
/// Integer kinds wrap on overflow and truncate toward zero on
/// division; float kinds use plain IEEE-754 operations. The scalar
/// operand of a filter arrives as `i64` and is converted with
/// [`NumericElement::from_i64`], which is lossy in the same way an
/// `as` cast is.
///
/// Division by a zero scalar is a planning-time error; callers must
/// reject it before any per-element loop runs.
pub trait NumericElement: Element {
    /// Lossy conversion from the filter's scalar operand.
    fn from_i64(v: i64) -> Self;
    /// `self + rhs`, wrapping for integer kinds.
    fn wrapping_add(self, rhs: Self) -> Self;
    /// `self - rhs`, wrapping for integer kinds.
    fn wrapping_sub(self, rhs: Self) -> Self;
    /// `self * rhs`, wrapping for integer kinds.
    fn wrapping_mul(self, rhs: Self) -> Self;
    /// `self / rhs`, truncating for integer kinds. `rhs` must be
    /// non-zero for integer kinds.
    fn wrapping_div(self, rhs: Self) -> Self;
}

impl NumericElement for i8 {
    fn from_i64(v: i64) -> Self {
        v as i8
    }
    fn wrapping_add(self, rhs: Self) -> Self {
        i8::wrapping_add(self, rhs)
    }
    fn wrapping_sub(self, rhs: Self) -> Self {
        i8::wrapping_sub(self, rhs)
    }
    fn wrapping_mul(self, rhs: Self) -> Self {
        i8::wrapping_mul(self, rhs)
    }
    fn wrapping_div(self, rhs: Self) -> Self {
        i8::wrapping_div(self, rhs)
    }
}

impl NumericElement for i16 {
    fn from_i64(v: i64) -> Self {
        v as i16
    }
    fn wrapping_add(self, rhs: Self) -> Self {
        i16::wrapping_add(self, rhs)
    }
    fn wrapping_sub(self, rhs: Self) -> Self {
        i16::wrapping_sub(self, rhs)
    }
    fn wrapping_mul(self, rhs: Self) -> Self {
        i16::wrapping_mul(self, rhs)
    }
    fn wrapping_div(self, rhs: Self) -> Self {
        i16::wrapping_div(self, rhs)
    }
}

impl NumericElement for i32 {
    fn from_i64(v: i64) -> Self {
        v as i32
    }
    fn wrapping_add(self, rhs: Self) -> Self {
        i32::wrapping_add(self, rhs)
    }
    fn wrapping_sub(self, rhs: Self) -> Self {
        i32::wrapping_sub(self, rhs)
    }
    fn wrapping_mul(self, rhs: Self) -> Self {
        i32::wrapping_mul(self, rhs)
    }
    fn wrapping_div(self, rhs: Self) -> Self {
        i32::wrapping_div(self, rhs)
    }
}

impl NumericElement for i64 {
    fn from_i64(v: i64) -> Self {
        v
    }
    fn wrapping_add(self, rhs: Self) -> Self {
        i64::wrapping_add(self, rhs)
    }
    fn wrapping_sub(self, rhs: Self) -> Self {
        i64::wrapping_sub(self, rhs)
    }
    fn wrapping_mul(self, rhs: Self) -> Self {
        i64::wrapping_mul(self, rhs)
    }
    fn wrapping_div(self, rhs: Self) -> Self {
        i64::wrapping_div(self, rhs)
    }
}

impl NumericElement for u8 {
    fn from_i64(v: i64) -> Self {
        v as u8
    }
    fn wrapping_add(self, rhs: Self) -> Self {
        u8::wrapping_add(self, rhs)
    }
    fn wrapping_sub(self, rhs: Self) -> Self {
        u8::wrapping_sub(self, rhs)
    }
    fn wrapping_mul(self, rhs: Self) -> Self {
        u8::wrapping_mul(self, rhs)
    }
    fn wrapping_div(self, rhs: Self) -> Self {
        u8::wrapping_div(self, rhs)
    }
}

impl NumericElement for u16 {
    fn from_i64(v: i64) -> Self {
        v as u16
    }
    fn wrapping_add(self, rhs: Self) -> Self {
        u16::wrapping_add(self, rhs)
    }
    fn wrapping_sub(self, rhs: Self) -> Self {
        u16::wrapping_sub(self, rhs)
    }
    fn wrapping_mul(self, rhs: Self) -> Self {
        u16::wrapping_mul(self, rhs)
    }
    fn wrapping_div(self, rhs: Self) -> Self {
        u16::wrapping_div(self, rhs)
    }
}

impl NumericElement for u32 {
    fn from_i64(v: i64) -> Self {
        v as u32
    }
    fn wrapping_add(self, rhs: Self) -> Self {
        u32::wrapping_add(self, rhs)
    }
    fn wrapping_sub(self, rhs: Self) -> Self {
        u32::wrapping_sub(self, rhs)
    }
    fn wrapping_mul(self, rhs: Self) -> Self {
        u32::wrapping_mul(self, rhs)
    }
    fn wrapping_div(self, rhs: Self) -> Self {
        u32::wrapping_div(self, rhs)
    }
}

impl NumericElement for u64 {
    fn from_i64(v: i64) -> Self {
        v as u64
    }
    fn wrapping_add(self, rhs: Self) -> Self {
        u64::wrapping_add(self, rhs)
    }
    fn wrapping_sub(self, rhs: Self) -> Self {
        u64::wrapping_sub(self, rhs)
    }
    fn wrapping_mul(self, rhs: Self) -> Self {
        u64::wrapping_mul(self, rhs)
    }
    fn wrapping_div(self, rhs: Self) -> Self {
        u64::wrapping_div(self, rhs)
    }
}

impl NumericElement for f32 {
    fn from_i64(v: i64) -> Self {
        v as f32
    }
    fn wrapping_add(self, rhs: Self) -> Self {
        self + rhs
    }
    fn wrapping_sub(self, rhs: Self) -> Self {
        self - rhs
    }
    fn wrapping_mul(self, rhs: Self) -> Self {
        self * rhs
    }
    fn wrapping_div(self, rhs: Self) -> Self {
        self / rhs
    }
}

impl NumericElement for f64 {
    fn from_i64(v: i64) -> Self {
        v as f64
    }
    fn wrapping_add(self, rhs: Self) -> Self {
        self + rhs
    }
    fn wrapping_sub(self, rhs: Self) -> Self {
        self - rhs
    }
    fn wrapping_mul(self, rhs: Self) -> Self {
        self * rhs
    }
    fn wrapping_div(self, rhs: Self) -> Self {
        self / rhs
    }
}
