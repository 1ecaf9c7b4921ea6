//! [`ErasedStore`]: the closed type-erased variant over all element
//! kinds, and the [`StoreElement`] projection trait.
//!
//! Generic array-management code handles `ErasedStore` values;
//! numeric algorithms are written once over a type parameter and
//! recovered through [`StoreElement::project`]. The variant set is
//! closed — dispatch is an exhaustive match over [`ElementKind`],
//! not open-ended downcasting.

use std::sync::Arc;

use parking_lot::RwLock;
use trellis_core::{Element, ElementKind, Shape};

use crate::typed::TypedStore;

/// Shared handle to one backing store.
///
/// Shallow array duplicates clone the `Arc`, so mutation through
/// either handle is visible through both. The lock expresses that
/// aliasing safely; it is not a license for concurrent structural
/// mutation, which callers must still serialize.
pub type SharedStore = Arc<RwLock<ErasedStore>>;

/// A type-erased array store: exactly one [`TypedStore`]
/// instantiation, tagged by kind.
#[derive(Clone, Debug, PartialEq)]
pub enum ErasedStore {
    /// `int8` elements.
    Int8(TypedStore<i8>),
    /// `int16` elements.
    Int16(TypedStore<i16>),
    /// `int32` elements.
    Int32(TypedStore<i32>),
    /// `int64` elements.
    Int64(TypedStore<i64>),
    /// `uint8` elements.
    UInt8(TypedStore<u8>),
    /// `uint16` elements.
    UInt16(TypedStore<u16>),
    /// `uint32` elements.
    UInt32(TypedStore<u32>),
    /// `uint64` elements.
    UInt64(TypedStore<u64>),
    /// `float32` elements.
    Float32(TypedStore<f32>),
    /// `float64` elements.
    Float64(TypedStore<f64>),
    /// `boolean` elements.
    Boolean(TypedStore<bool>),
}

impl ErasedStore {
    /// Allocate a zero-initialized store of the given kind and shapes.
    pub fn zeroed(kind: ElementKind, tuple_shape: Shape, component_shape: Shape) -> Self {
        match kind {
            ElementKind::Int8 => Self::Int8(TypedStore::zeroed(tuple_shape, component_shape)),
            ElementKind::Int16 => Self::Int16(TypedStore::zeroed(tuple_shape, component_shape)),
            ElementKind::Int32 => Self::Int32(TypedStore::zeroed(tuple_shape, component_shape)),
            ElementKind::Int64 => Self::Int64(TypedStore::zeroed(tuple_shape, component_shape)),
            ElementKind::UInt8 => Self::UInt8(TypedStore::zeroed(tuple_shape, component_shape)),
            ElementKind::UInt16 => {
                Self::UInt16(TypedStore::zeroed(tuple_shape, component_shape))
            }
            ElementKind::UInt32 => {
                Self::UInt32(TypedStore::zeroed(tuple_shape, component_shape))
            }
            ElementKind::UInt64 => {
                Self::UInt64(TypedStore::zeroed(tuple_shape, component_shape))
            }
            ElementKind::Float32 => {
                Self::Float32(TypedStore::zeroed(tuple_shape, component_shape))
            }
            ElementKind::Float64 => {
                Self::Float64(TypedStore::zeroed(tuple_shape, component_shape))
            }
            ElementKind::Boolean => {
                Self::Boolean(TypedStore::zeroed(tuple_shape, component_shape))
            }
        }
    }

    /// The runtime kind tag.
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Int8(_) => ElementKind::Int8,
            Self::Int16(_) => ElementKind::Int16,
            Self::Int32(_) => ElementKind::Int32,
            Self::Int64(_) => ElementKind::Int64,
            Self::UInt8(_) => ElementKind::UInt8,
            Self::UInt16(_) => ElementKind::UInt16,
            Self::UInt32(_) => ElementKind::UInt32,
            Self::UInt64(_) => ElementKind::UInt64,
            Self::Float32(_) => ElementKind::Float32,
            Self::Float64(_) => ElementKind::Float64,
            Self::Boolean(_) => ElementKind::Boolean,
        }
    }

    /// The tuple shape.
    pub fn tuple_shape(&self) -> &Shape {
        match self {
            Self::Int8(s) => s.tuple_shape(),
            Self::Int16(s) => s.tuple_shape(),
            Self::Int32(s) => s.tuple_shape(),
            Self::Int64(s) => s.tuple_shape(),
            Self::UInt8(s) => s.tuple_shape(),
            Self::UInt16(s) => s.tuple_shape(),
            Self::UInt32(s) => s.tuple_shape(),
            Self::UInt64(s) => s.tuple_shape(),
            Self::Float32(s) => s.tuple_shape(),
            Self::Float64(s) => s.tuple_shape(),
            Self::Boolean(s) => s.tuple_shape(),
        }
    }

    /// The component shape.
    pub fn component_shape(&self) -> &Shape {
        match self {
            Self::Int8(s) => s.component_shape(),
            Self::Int16(s) => s.component_shape(),
            Self::Int32(s) => s.component_shape(),
            Self::Int64(s) => s.component_shape(),
            Self::UInt8(s) => s.component_shape(),
            Self::UInt16(s) => s.component_shape(),
            Self::UInt32(s) => s.component_shape(),
            Self::UInt64(s) => s.component_shape(),
            Self::Float32(s) => s.component_shape(),
            Self::Float64(s) => s.component_shape(),
            Self::Boolean(s) => s.component_shape(),
        }
    }

    /// Total element count.
    pub fn len(&self) -> usize {
        match self {
            Self::Int8(s) => s.len(),
            Self::Int16(s) => s.len(),
            Self::Int32(s) => s.len(),
            Self::Int64(s) => s.len(),
            Self::UInt8(s) => s.len(),
            Self::UInt16(s) => s.len(),
            Self::UInt32(s) => s.len(),
            Self::UInt64(s) => s.len(),
            Self::Float32(s) => s.len(),
            Self::Float64(s) => s.len(),
            Self::Boolean(s) => s.len(),
        }
    }

    /// Whether the store holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Project to the concrete store for `T`, `None` on kind mismatch.
    pub fn typed<T: StoreElement>(&self) -> Option<&TypedStore<T>> {
        T::project(self)
    }

    /// Mutable projection to the concrete store for `T`.
    pub fn typed_mut<T: StoreElement>(&mut self) -> Option<&mut TypedStore<T>> {
        T::project_mut(self)
    }

    /// Wrap this store in a fresh shared handle.
    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }
}

/// Projection from the erased store to one concrete element kind.
///
/// Each scalar projects only its own variant, so generic code written
/// over `T: StoreElement` can recover a `TypedStore<T>` without any
/// dynamic casting.
pub trait StoreElement: Element {
    /// Shared projection, `None` if the store holds another kind.
    fn project(store: &ErasedStore) -> Option<&TypedStore<Self>>;
    /// Mutable projection, `None` if the store holds another kind.
    fn project_mut(store: &mut ErasedStore) -> Option<&mut TypedStore<Self>>;
    /// Wrap a concrete store into the erased variant.
    fn erase(store: TypedStore<Self>) -> ErasedStore;
}

impl StoreElement for i8 {
    fn project(store: &ErasedStore) -> Option<&TypedStore<Self>> {
        match store {
            ErasedStore::Int8(s) => Some(s),
            _ => None,
        }
    }
    fn project_mut(store: &mut ErasedStore) -> Option<&mut TypedStore<Self>> {
        match store {
            ErasedStore::Int8(s) => Some(s),
            _ => None,
        }
    }
    fn erase(store: TypedStore<Self>) -> ErasedStore {
        ErasedStore::Int8(store)
    }
}

impl StoreElement for i16 {
    fn project(store: &ErasedStore) -> Option<&TypedStore<Self>> {
        match store {
            ErasedStore::Int16(s) => Some(s),
            _ => None,
        }
    }
    fn project_mut(store: &mut ErasedStore) -> Option<&mut TypedStore<Self>> {
        match store {
            ErasedStore::Int16(s) => Some(s),
            _ => None,
        }
    }
    fn erase(store: TypedStore<Self>) -> ErasedStore {
        ErasedStore::Int16(store)
    }
}

impl StoreElement for i32 {
    fn project(store: &ErasedStore) -> Option<&TypedStore<Self>> {
        match store {
            ErasedStore::Int32(s) => Some(s),
            _ => None,
        }
    }
    fn project_mut(store: &mut ErasedStore) -> Option<&mut TypedStore<Self>> {
        match store {
            ErasedStore::Int32(s) => Some(s),
            _ => None,
        }
    }
    fn erase(store: TypedStore<Self>) -> ErasedStore {
        ErasedStore::Int32(store)
    }
}

impl StoreElement for i64 {
    fn project(store: &ErasedStore) -> Option<&TypedStore<Self>> {
        match store {
            ErasedStore::Int64(s) => Some(s),
            _ => None,
        }
    }
    fn project_mut(store: &mut ErasedStore) -> Option<&mut TypedStore<Self>> {
        match store {
            ErasedStore::Int64(s) => Some(s),
            _ => None,
        }
    }
    fn erase(store: TypedStore<Self>) -> ErasedStore {
        ErasedStore::Int64(store)
    }
}

impl StoreElement for u8 {
    fn project(store: &ErasedStore) -> Option<&TypedStore<Self>> {
        match store {
            ErasedStore::UInt8(s) => Some(s),
            _ => None,
        }
    }
    fn project_mut(store: &mut ErasedStore) -> Option<&mut TypedStore<Self>> {
        match store {
            ErasedStore::UInt8(s) => Some(s),
            _ => None,
        }
    }
    fn erase(store: TypedStore<Self>) -> ErasedStore {
        ErasedStore::UInt8(store)
    }
}

impl StoreElement for u16 {
    fn project(store: &ErasedStore) -> Option<&TypedStore<Self>> {
        match store {
            ErasedStore::UInt16(s) => Some(s),
            _ => None,
        }
    }
    fn project_mut(store: &mut ErasedStore) -> Option<&mut TypedStore<Self>> {
        match store {
            ErasedStore::UInt16(s) => Some(s),
            _ => None,
        }
    }
    fn erase(store: TypedStore<Self>) -> ErasedStore {
        ErasedStore::UInt16(store)
    }
}

impl StoreElement for u32 {
    fn project(store: &ErasedStore) -> Option<&TypedStore<Self>> {
        match store {
            ErasedStore::UInt32(s) => Some(s),
            _ => None,
        }
    }
    fn project_mut(store: &mut ErasedStore) -> Option<&mut TypedStore<Self>> {
        match store {
            ErasedStore::UInt32(s) => Some(s),
            _ => None,
        }
    }
    fn erase(store: TypedStore<Self>) -> ErasedStore {
        ErasedStore::UInt32(store)
    }
}

impl StoreElement for u64 {
    fn project(store: &ErasedStore) -> Option<&TypedStore<Self>> {
        match store {
            ErasedStore::UInt64(s) => Some(s),
            _ => None,
        }
    }
    fn project_mut(store: &mut ErasedStore) -> Option<&mut TypedStore<Self>> {
        match store {
            ErasedStore::UInt64(s) => Some(s),
            _ => None,
        }
    }
    fn erase(store: TypedStore<Self>) -> ErasedStore {
        ErasedStore::UInt64(store)
    }
}

impl StoreElement for f32 {
    fn project(store: &ErasedStore) -> Option<&TypedStore<Self>> {
        match store {
            ErasedStore::Float32(s) => Some(s),
            _ => None,
        }
    }
    fn project_mut(store: &mut ErasedStore) -> Option<&mut TypedStore<Self>> {
        match store {
            ErasedStore::Float32(s) => Some(s),
            _ => None,
        }
    }
    fn erase(store: TypedStore<Self>) -> ErasedStore {
        ErasedStore::Float32(store)
    }
}

impl StoreElement for f64 {
    fn project(store: &ErasedStore) -> Option<&TypedStore<Self>> {
        match store {
            ErasedStore::Float64(s) => Some(s),
            _ => None,
        }
    }
    fn project_mut(store: &mut ErasedStore) -> Option<&mut TypedStore<Self>> {
        match store {
            ErasedStore::Float64(s) => Some(s),
            _ => None,
        }
    }
    fn erase(store: TypedStore<Self>) -> ErasedStore {
        ErasedStore::Float64(store)
    }
}

impl StoreElement for bool {
    fn project(store: &ErasedStore) -> Option<&TypedStore<Self>> {
        match store {
            ErasedStore::Boolean(s) => Some(s),
            _ => None,
        }
    }
    fn project_mut(store: &mut ErasedStore) -> Option<&mut TypedStore<Self>> {
        match store {
            ErasedStore::Boolean(s) => Some(s),
            _ => None,
        }
    }
    fn erase(store: TypedStore<Self>) -> ErasedStore {
        ErasedStore::Boolean(store)
    }
}
