//! [`DataObject`] nodes and their payloads.

use indexmap::IndexMap;
use trellis_core::{ElementKind, ObjectId, Shape};

use crate::erased::{ErasedStore, SharedStore};

/// The payload carried by a [`DataObject`].
///
/// The set is closed at this layer: groups (pure containers), arrays,
/// and rectilinear grid geometries. Geometry *operations* live in
/// `trellis-geom`; only the state a geometry persists inside the
/// store — referenced ids and the cell-count vector — lives here.
#[derive(Clone, Debug)]
pub enum NodePayload {
    /// A pure container with no data of its own.
    Group,
    /// A typed numeric array.
    Array(ArrayNode),
    /// A rectilinear grid geometry.
    RectGrid(RectGrid),
}

impl NodePayload {
    /// Short payload-kind name for diagnostics and persistence tags.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Array(_) => "array",
            Self::RectGrid(_) => "rect_grid",
        }
    }
}

/// An array node: ownership of one shared backing store.
///
/// The handle is the unit of aliasing: a shallow duplicate clones the
/// handle (both objects observe each other's writes), a deep
/// duplicate clones the store behind a fresh handle.
#[derive(Clone, Debug)]
pub struct ArrayNode {
    store: SharedStore,
}

impl ArrayNode {
    /// Wrap a store in a fresh handle.
    pub fn new(store: ErasedStore) -> Self {
        Self {
            store: store.into_shared(),
        }
    }

    /// Build a node that aliases an existing handle.
    pub fn from_shared(store: SharedStore) -> Self {
        Self { store }
    }

    /// The shared handle.
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// The element kind of the backing store.
    pub fn kind(&self) -> ElementKind {
        self.store.read().kind()
    }

    /// The backing store's tuple shape.
    pub fn tuple_shape(&self) -> Shape {
        self.store.read().tuple_shape().clone()
    }

    /// The backing store's component shape.
    pub fn component_shape(&self) -> Shape {
        self.store.read().component_shape().clone()
    }

    /// Total element count.
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    /// Whether the backing store holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A node aliasing the same backing store.
    pub fn shallow_clone(&self) -> Self {
        Self {
            store: SharedStore::clone(&self.store),
        }
    }

    /// A node with its own copy of the backing store.
    pub fn deep_clone(&self) -> Self {
        Self::new(self.store.read().clone())
    }
}

/// State of a rectilinear grid geometry.
///
/// Bounds and cached derived arrays are referenced by id, never held
/// directly; every consumer re-resolves through the owning
/// `DataStructure`, so removing a referenced array degrades to an
/// absent lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RectGrid {
    dims: [usize; 3],
    x_bounds: Option<ObjectId>,
    y_bounds: Option<ObjectId>,
    z_bounds: Option<ObjectId>,
    element_sizes: Option<ObjectId>,
}

impl RectGrid {
    /// An empty geometry: zero cells, no referenced arrays.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cell-count vector `(x, y, z)`.
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Replace the cell-count vector.
    pub fn set_dims(&mut self, dims: [usize; 3]) {
        self.dims = dims;
    }

    /// Total cell count: the product of the cell-count vector.
    pub fn num_cells(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    /// Ids of the x/y/z bound arrays, where set.
    pub fn bounds(&self) -> [Option<ObjectId>; 3] {
        [self.x_bounds, self.y_bounds, self.z_bounds]
    }

    /// Set or clear the three bound-array references.
    pub fn set_bounds(
        &mut self,
        x: Option<ObjectId>,
        y: Option<ObjectId>,
        z: Option<ObjectId>,
    ) {
        self.x_bounds = x;
        self.y_bounds = y;
        self.z_bounds = z;
    }

    /// Id of the x-axis bound array.
    pub fn x_bounds_id(&self) -> Option<ObjectId> {
        self.x_bounds
    }

    /// Id of the y-axis bound array.
    pub fn y_bounds_id(&self) -> Option<ObjectId> {
        self.y_bounds
    }

    /// Id of the z-axis bound array.
    pub fn z_bounds_id(&self) -> Option<ObjectId> {
        self.z_bounds
    }

    /// Id of the cached element-sizes array, if computed.
    pub fn element_sizes_id(&self) -> Option<ObjectId> {
        self.element_sizes
    }

    /// Set or clear the cached element-sizes reference.
    pub fn set_element_sizes_id(&mut self, id: Option<ObjectId>) {
        self.element_sizes = id;
    }

    /// Zero the cell counts and clear every referenced id.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One node in the store's ownership graph.
///
/// Containment links are symmetric: a child records its parent id and
/// the parent records the child id under the child's name. All link
/// maintenance goes through the owning `DataStructure`.
#[derive(Clone, Debug)]
pub struct DataObject {
    id: ObjectId,
    name: String,
    parent: Option<ObjectId>,
    children: IndexMap<String, ObjectId>,
    payload: NodePayload,
}

impl DataObject {
    pub(crate) fn new(
        id: ObjectId,
        name: String,
        parent: Option<ObjectId>,
        payload: NodePayload,
    ) -> Self {
        Self {
            id,
            name,
            parent,
            children: IndexMap::new(),
            payload,
        }
    }

    /// The object's id.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The object's name, unique among its siblings.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// The owning parent's id, `None` for top-level objects.
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// Child ids keyed by child name, in insertion order.
    pub fn children(&self) -> &IndexMap<String, ObjectId> {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut IndexMap<String, ObjectId> {
        &mut self.children
    }

    /// Look up a direct child by name.
    pub fn child(&self, name: &str) -> Option<ObjectId> {
        self.children.get(name).copied()
    }

    /// The node's payload.
    pub fn payload(&self) -> &NodePayload {
        &self.payload
    }

    /// Mutable access to the node's payload.
    pub fn payload_mut(&mut self) -> &mut NodePayload {
        &mut self.payload
    }

    /// The array payload, `None` for other payload kinds.
    pub fn as_array(&self) -> Option<&ArrayNode> {
        match &self.payload {
            NodePayload::Array(node) => Some(node),
            _ => None,
        }
    }

    /// The grid-geometry payload, `None` for other payload kinds.
    pub fn as_rect_grid(&self) -> Option<&RectGrid> {
        match &self.payload {
            NodePayload::RectGrid(grid) => Some(grid),
            _ => None,
        }
    }

    /// Mutable grid-geometry payload, `None` for other payload kinds.
    pub fn as_rect_grid_mut(&mut self) -> Option<&mut RectGrid> {
        match &mut self.payload {
            NodePayload::RectGrid(grid) => Some(grid),
            _ => None,
        }
    }

    /// Whether the payload is a pure group.
    pub fn is_group(&self) -> bool {
        matches!(self.payload, NodePayload::Group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn shallow_clone_aliases_deep_clone_does_not() {
        let node = ArrayNode::new(ErasedStore::zeroed(
            ElementKind::Int32,
            smallvec![4],
            smallvec![1],
        ));
        let shallow = node.shallow_clone();
        let deep = node.deep_clone();

        node.store().write().typed_mut::<i32>().unwrap().set(0, 9);
        assert_eq!(
            shallow.store().read().typed::<i32>().unwrap().get(0),
            Some(9)
        );
        assert_eq!(deep.store().read().typed::<i32>().unwrap().get(0), Some(0));
    }

    #[test]
    fn rect_grid_reset_clears_everything() {
        let mut grid = RectGrid::new();
        grid.set_dims([2, 3, 4]);
        grid.set_bounds(Some(ObjectId(1)), Some(ObjectId(2)), Some(ObjectId(3)));
        grid.set_element_sizes_id(Some(ObjectId(4)));
        assert_eq!(grid.num_cells(), 24);

        grid.reset();
        assert_eq!(grid.dims(), [0, 0, 0]);
        assert_eq!(grid.bounds(), [None, None, None]);
        assert_eq!(grid.element_sizes_id(), None);
    }
}
