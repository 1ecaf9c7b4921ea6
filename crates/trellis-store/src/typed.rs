//! [`TypedStore`]: a contiguous, shaped buffer of one element kind.

use trellis_core::{shape_element_count, Element, ElementKind, Shape};

/// A contiguous zero-initialized buffer of one scalar kind, carrying
/// a tuple shape and a component shape.
///
/// The element count is always
/// `product(tuple_shape) * product(component_shape)` and always equals
/// the backing buffer's length; the shapes are fixed at construction.
/// Access is flat: linear index `tuple * num_components + component`.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedStore<T: Element> {
    tuple_shape: Shape,
    component_shape: Shape,
    data: Vec<T>,
}

impl<T: Element> TypedStore<T> {
    /// Allocate a zero-initialized store for the given shapes.
    ///
    /// Callers must reject empty or zero-extent shapes before
    /// construction; a zero-sized store is never valid inside a
    /// `DataStructure`.
    pub fn zeroed(tuple_shape: Shape, component_shape: Shape) -> Self {
        let len = shape_element_count(&tuple_shape) * shape_element_count(&component_shape);
        Self {
            tuple_shape,
            component_shape,
            data: vec![T::default(); len],
        }
    }

    /// Build a store from existing values. The value count must equal
    /// the shape product.
    pub fn from_vec(tuple_shape: Shape, component_shape: Shape, data: Vec<T>) -> Option<Self> {
        let expected =
            shape_element_count(&tuple_shape) * shape_element_count(&component_shape);
        if data.len() != expected {
            return None;
        }
        Some(Self {
            tuple_shape,
            component_shape,
            data,
        })
    }

    /// The runtime kind tag of `T`.
    pub fn kind(&self) -> ElementKind {
        T::KIND
    }

    /// The tuple shape.
    pub fn tuple_shape(&self) -> &Shape {
        &self.tuple_shape
    }

    /// The component shape.
    pub fn component_shape(&self) -> &Shape {
        &self.component_shape
    }

    /// Number of tuples: the tuple-shape product.
    pub fn num_tuples(&self) -> usize {
        shape_element_count(&self.tuple_shape)
    }

    /// Components per tuple: the component-shape product.
    pub fn num_components(&self) -> usize {
        shape_element_count(&self.component_shape)
    }

    /// Total element count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the store holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The element at a linear index, `None` out of range.
    pub fn get(&self, index: usize) -> Option<T> {
        self.data.get(index).copied()
    }

    /// Overwrite the element at a linear index. Returns `false` out
    /// of range.
    pub fn set(&mut self, index: usize, value: T) -> bool {
        match self.data.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// The whole buffer as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The whole buffer as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}
