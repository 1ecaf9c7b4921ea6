//! [`DataStructure`]: the arena owning every data object.

use indexmap::IndexMap;
use parking_lot::{
    MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLockReadGuard, RwLockWriteGuard,
};
use trellis_core::{shape_element_count, DataPath, ElementKind, ObjectId, Shape};

use crate::erased::{ErasedStore, SharedStore, StoreElement};
use crate::error::StoreError;
use crate::object::{ArrayNode, DataObject, NodePayload, RectGrid};
use crate::typed::TypedStore;

/// The object arena: sole owner of every [`DataObject`] and sole
/// authority for structural mutation.
///
/// Ids are issued from a monotonic counter and never reused; removing
/// an object tombstones its id permanently. Lookup by id or path
/// returns `Option` — absence is a normal, checkable condition for
/// every weak reference in the system.
///
/// The arena performs no internal locking of the object graph.
/// Callers must serialize structural mutations against one instance;
/// the per-array store locks only exist to express aliased shallow
/// duplicates safely.
#[derive(Debug)]
pub struct DataStructure {
    objects: IndexMap<ObjectId, DataObject>,
    top_level: IndexMap<String, ObjectId>,
    next_id: u64,
}

impl Default for DataStructure {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStructure {
    /// An empty store. The first issued id is 1.
    pub fn new() -> Self {
        Self {
            objects: IndexMap::new(),
            top_level: IndexMap::new(),
            next_id: 1,
        }
    }

    fn issue_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store owns no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether `id` resolves to a live object.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Every live id, in creation order.
    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.keys().copied()
    }

    /// Top-level object ids keyed by name, in insertion order.
    pub fn top_level(&self) -> &IndexMap<String, ObjectId> {
        &self.top_level
    }

    /// Resolve an id to its live object.
    pub fn get(&self, id: ObjectId) -> Option<&DataObject> {
        self.objects.get(&id)
    }

    /// Resolve an id to its live object, mutably.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut DataObject> {
        self.objects.get_mut(&id)
    }

    // ── Creation ───────────────────────────────────────────────

    fn sibling_set(&self, parent: Option<ObjectId>) -> Result<&IndexMap<String, ObjectId>, StoreError> {
        match parent {
            None => Ok(&self.top_level),
            Some(parent_id) => self
                .objects
                .get(&parent_id)
                .map(DataObject::children)
                .ok_or(StoreError::AbsentParent { id: parent_id }),
        }
    }

    fn insert_object(
        &mut self,
        parent: Option<ObjectId>,
        name: String,
        payload: NodePayload,
    ) -> Result<ObjectId, StoreError> {
        if self.sibling_set(parent)?.contains_key(&name) {
            return Err(StoreError::NameCollision { parent, name });
        }
        let id = self.issue_id();
        self.objects
            .insert(id, DataObject::new(id, name.clone(), parent, payload));
        match parent {
            None => {
                self.top_level.insert(name, id);
            }
            Some(parent_id) => {
                // Liveness was checked by sibling_set above.
                self.objects
                    .get_mut(&parent_id)
                    .expect("parent checked live")
                    .children_mut()
                    .insert(name, id);
            }
        }
        Ok(id)
    }

    /// Create an empty group under `parent` (or at the top level).
    pub fn create_group(
        &mut self,
        parent: Option<ObjectId>,
        name: impl Into<String>,
    ) -> Result<ObjectId, StoreError> {
        self.insert_object(parent, name.into(), NodePayload::Group)
    }

    /// Create a zero-initialized array of the given kind and shapes.
    ///
    /// Fails with [`StoreError::NameCollision`] if `name` already
    /// exists under `parent`, and with [`StoreError::ZeroSizedShape`]
    /// if either shape is empty or contains a zero extent.
    pub fn create_array(
        &mut self,
        parent: Option<ObjectId>,
        name: impl Into<String>,
        kind: ElementKind,
        tuple_shape: Shape,
        component_shape: Shape,
    ) -> Result<ObjectId, StoreError> {
        let name = name.into();
        if shape_element_count(&tuple_shape) == 0 || shape_element_count(&component_shape) == 0 {
            return Err(StoreError::ZeroSizedShape { name });
        }
        let store = ErasedStore::zeroed(kind, tuple_shape, component_shape);
        self.insert_object(parent, name, NodePayload::Array(ArrayNode::new(store)))
    }

    /// Create an array node around an existing store (used by
    /// persistence and by computed-array installation).
    pub fn create_array_from(
        &mut self,
        parent: Option<ObjectId>,
        name: impl Into<String>,
        store: ErasedStore,
    ) -> Result<ObjectId, StoreError> {
        let name = name.into();
        if store.is_empty() {
            return Err(StoreError::ZeroSizedShape { name });
        }
        self.insert_object(parent, name, NodePayload::Array(ArrayNode::new(store)))
    }

    /// Create an empty rectilinear grid geometry.
    pub fn create_rect_grid(
        &mut self,
        parent: Option<ObjectId>,
        name: impl Into<String>,
    ) -> Result<ObjectId, StoreError> {
        self.insert_object(parent, name.into(), NodePayload::RectGrid(RectGrid::new()))
    }

    // ── Array access ───────────────────────────────────────────

    /// The array node for `id`, `None` if absent or not an array.
    pub fn get_array(&self, id: ObjectId) -> Option<&ArrayNode> {
        self.objects.get(&id)?.as_array()
    }

    fn array_node(&self, id: ObjectId) -> Result<&ArrayNode, StoreError> {
        let obj = self
            .objects
            .get(&id)
            .ok_or(StoreError::AbsentObject { id })?;
        obj.as_array().ok_or(StoreError::NotAnArray { id })
    }

    /// A clone of the shared store handle for `id`.
    pub fn array_store(&self, id: ObjectId) -> Option<SharedStore> {
        Some(SharedStore::clone(self.get_array(id)?.store()))
    }

    /// Read-lock the erased store for `id`.
    pub fn read_array(
        &self,
        id: ObjectId,
    ) -> Result<RwLockReadGuard<'_, ErasedStore>, StoreError> {
        Ok(self.array_node(id)?.store().read())
    }

    /// Write-lock the erased store for `id`.
    pub fn write_array(
        &self,
        id: ObjectId,
    ) -> Result<RwLockWriteGuard<'_, ErasedStore>, StoreError> {
        Ok(self.array_node(id)?.store().write())
    }

    /// Read-lock the store for `id` projected to element type `T`.
    ///
    /// Fails with [`StoreError::KindMismatch`] when the stored kind
    /// differs from `T::KIND`.
    pub fn read_typed<T: StoreElement>(
        &self,
        id: ObjectId,
    ) -> Result<MappedRwLockReadGuard<'_, TypedStore<T>>, StoreError> {
        let guard = self.read_array(id)?;
        let actual = guard.kind();
        RwLockReadGuard::try_map(guard, ErasedStore::typed::<T>).map_err(|_| {
            StoreError::KindMismatch {
                id,
                expected: T::KIND,
                actual,
            }
        })
    }

    /// Write-lock the store for `id` projected to element type `T`.
    pub fn write_typed<T: StoreElement>(
        &self,
        id: ObjectId,
    ) -> Result<MappedRwLockWriteGuard<'_, TypedStore<T>>, StoreError> {
        let guard = self.write_array(id)?;
        let actual = guard.kind();
        RwLockWriteGuard::try_map(guard, ErasedStore::typed_mut::<T>).map_err(|_| {
            StoreError::KindMismatch {
                id,
                expected: T::KIND,
                actual,
            }
        })
    }

    // ── Paths ──────────────────────────────────────────────────

    /// Resolve a path to a live object id, walking children by name
    /// from the top-level set. The empty path never resolves.
    pub fn resolve_path(&self, path: &DataPath) -> Option<ObjectId> {
        let mut segments = path.segments().iter();
        let mut current = *self.top_level.get(segments.next()?)?;
        for segment in segments {
            current = self.objects.get(&current)?.child(segment)?;
        }
        Some(current)
    }

    /// Reconstruct the full path of a live object.
    pub fn path_of(&self, id: ObjectId) -> Option<DataPath> {
        let mut segments = Vec::new();
        let mut current = self.objects.get(&id)?;
        loop {
            segments.push(current.name().to_owned());
            match current.parent() {
                Some(parent) => current = self.objects.get(&parent)?,
                None => break,
            }
        }
        segments.reverse();
        Some(DataPath::new(segments))
    }

    // ── Removal and renaming ───────────────────────────────────

    /// Remove an object and the entire subtree it owns.
    ///
    /// Every id in the subtree is tombstoned: subsequent `get` calls
    /// return `None` forever. Weak references held elsewhere (geometry
    /// bound ids, recorded paths) degrade to absent lookups.
    pub fn remove(&mut self, id: ObjectId) -> Result<(), StoreError> {
        let obj = self
            .objects
            .get(&id)
            .ok_or(StoreError::AbsentObject { id })?;
        let parent = obj.parent();
        let name = obj.name().to_owned();

        let mut doomed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(obj) = self.objects.get(&current) {
                stack.extend(obj.children().values().copied());
                doomed.push(current);
            }
        }
        for dead in doomed {
            self.objects.shift_remove(&dead);
        }

        match parent {
            None => {
                self.top_level.shift_remove(&name);
            }
            Some(parent_id) => {
                if let Some(parent_obj) = self.objects.get_mut(&parent_id) {
                    parent_obj.children_mut().shift_remove(&name);
                }
            }
        }
        Ok(())
    }

    /// Rename a live object, preserving its id and subtree.
    pub fn rename(&mut self, id: ObjectId, new_name: impl Into<String>) -> Result<(), StoreError> {
        let new_name = new_name.into();
        let obj = self
            .objects
            .get(&id)
            .ok_or(StoreError::AbsentObject { id })?;
        let parent = obj.parent();
        let old_name = obj.name().to_owned();
        if old_name == new_name {
            return Ok(());
        }
        if self.sibling_set(parent)?.contains_key(&new_name) {
            return Err(StoreError::NameCollision {
                parent,
                name: new_name,
            });
        }

        match parent {
            None => {
                self.top_level.shift_remove(&old_name);
                self.top_level.insert(new_name.clone(), id);
            }
            Some(parent_id) => {
                let parent_obj = self
                    .objects
                    .get_mut(&parent_id)
                    .expect("parent checked live");
                parent_obj.children_mut().shift_remove(&old_name);
                parent_obj.children_mut().insert(new_name.clone(), id);
            }
        }
        self.objects
            .get_mut(&id)
            .expect("object checked live")
            .set_name(new_name);
        Ok(())
    }

    // ── Duplication ────────────────────────────────────────────

    /// Duplicate an object under the same parent, sharing backing
    /// storage.
    ///
    /// Arrays alias the source's store — mutation through either
    /// object is visible through both. Geometries copy their
    /// referenced ids. Groups duplicate as fresh empty groups; their
    /// children are not duplicated.
    pub fn shallow_duplicate(
        &mut self,
        id: ObjectId,
        new_name: impl Into<String>,
    ) -> Result<ObjectId, StoreError> {
        let obj = self
            .objects
            .get(&id)
            .ok_or(StoreError::AbsentObject { id })?;
        let parent = obj.parent();
        let payload = match obj.payload() {
            NodePayload::Group => NodePayload::Group,
            NodePayload::Array(node) => NodePayload::Array(node.shallow_clone()),
            NodePayload::RectGrid(grid) => NodePayload::RectGrid(grid.clone()),
        };
        self.insert_object(parent, new_name.into(), payload)
    }

    /// Duplicate an object under the same parent, copying backing
    /// storage; for groups the owned subtree is copied recursively.
    ///
    /// Deep duplication of a grid geometry is
    /// [`StoreError::UnsupportedOperation`]; the check covers the
    /// whole subtree before anything is created, so a failed call
    /// installs nothing.
    pub fn deep_duplicate(
        &mut self,
        id: ObjectId,
        new_name: impl Into<String>,
    ) -> Result<ObjectId, StoreError> {
        let obj = self
            .objects
            .get(&id)
            .ok_or(StoreError::AbsentObject { id })?;
        let parent = obj.parent();
        self.ensure_deep_copyable(id)?;
        self.duplicate_subtree(id, parent, new_name.into())
    }

    fn ensure_deep_copyable(&self, root: ObjectId) -> Result<(), StoreError> {
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let obj = self
                .objects
                .get(&current)
                .ok_or(StoreError::AbsentObject { id: current })?;
            if matches!(obj.payload(), NodePayload::RectGrid(_)) {
                return Err(StoreError::UnsupportedOperation {
                    operation: "deep duplicate",
                    id: current,
                });
            }
            stack.extend(obj.children().values().copied());
        }
        Ok(())
    }

    fn duplicate_subtree(
        &mut self,
        src: ObjectId,
        parent: Option<ObjectId>,
        name: String,
    ) -> Result<ObjectId, StoreError> {
        let obj = self
            .objects
            .get(&src)
            .ok_or(StoreError::AbsentObject { id: src })?;
        let payload = match obj.payload() {
            NodePayload::Group => NodePayload::Group,
            NodePayload::Array(node) => NodePayload::Array(node.deep_clone()),
            NodePayload::RectGrid(_) => {
                return Err(StoreError::UnsupportedOperation {
                    operation: "deep duplicate",
                    id: src,
                })
            }
        };
        let children: Vec<(String, ObjectId)> = obj
            .children()
            .iter()
            .map(|(child_name, &child_id)| (child_name.clone(), child_id))
            .collect();

        let new_id = self.insert_object(parent, name, payload)?;
        for (child_name, child_id) in children {
            self.duplicate_subtree(child_id, Some(new_id), child_name)?;
        }
        Ok(new_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use smallvec::smallvec;
    use trellis_core::Element;

    fn ramp_array(store: &mut DataStructure, name: &str, len: usize) -> ObjectId {
        let id = store
            .create_array(None, name, ElementKind::Int32, smallvec![len], smallvec![1])
            .unwrap();
        {
            let mut guard = store.write_typed::<i32>(id).unwrap();
            for i in 0..len {
                guard.set(i, i as i32);
            }
        }
        id
    }

    #[test]
    fn ids_are_monotonic_and_start_at_one() {
        let mut store = DataStructure::new();
        let a = store.create_group(None, "a").unwrap();
        let b = store.create_group(None, "b").unwrap();
        assert_eq!(a, ObjectId(1));
        assert_eq!(b, ObjectId(2));
    }

    #[test]
    fn created_array_reads_back_zeroed() {
        let mut store = DataStructure::new();
        let id = store
            .create_array(None, "data", ElementKind::Float64, smallvec![5], smallvec![2])
            .unwrap();
        let guard = store.read_typed::<f64>(id).unwrap();
        assert_eq!(guard.len(), 10);
        assert!(guard.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn name_collision_under_same_parent_rejected() {
        let mut store = DataStructure::new();
        let group = store.create_group(None, "g").unwrap();
        store.create_group(Some(group), "child").unwrap();
        let err = store
            .create_array(
                Some(group),
                "child",
                ElementKind::Int8,
                smallvec![1],
                smallvec![1],
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::NameCollision { .. }));

        // The same name under a different parent is fine.
        store.create_group(None, "child").unwrap();
    }

    #[test]
    fn zero_sized_shape_rejected() {
        let mut store = DataStructure::new();
        let err = store
            .create_array(None, "bad", ElementKind::Int32, smallvec![0], smallvec![1])
            .unwrap_err();
        assert!(matches!(err, StoreError::ZeroSizedShape { .. }));
        let err = store
            .create_array(None, "bad", ElementKind::Int32, smallvec![], smallvec![1])
            .unwrap_err();
        assert!(matches!(err, StoreError::ZeroSizedShape { .. }));
    }

    #[test]
    fn kind_mismatch_reports_both_kinds() {
        let mut store = DataStructure::new();
        let id = store
            .create_array(None, "data", ElementKind::Int32, smallvec![3], smallvec![1])
            .unwrap();
        let err = store.read_typed::<f32>(id).unwrap_err();
        assert_eq!(
            err,
            StoreError::KindMismatch {
                id,
                expected: ElementKind::Float32,
                actual: ElementKind::Int32,
            }
        );
    }

    #[test]
    fn remove_tombstones_id_and_cascades() {
        let mut store = DataStructure::new();
        let group = store.create_group(None, "g").unwrap();
        let inner = store.create_group(Some(group), "inner").unwrap();
        let leaf = store
            .create_array(
                Some(inner),
                "leaf",
                ElementKind::UInt8,
                smallvec![2],
                smallvec![1],
            )
            .unwrap();

        store.remove(group).unwrap();
        assert!(store.get(group).is_none());
        assert!(store.get(inner).is_none());
        assert!(store.get(leaf).is_none());
        assert!(store.is_empty());

        // Tombstoned for good: removal again fails, the id is never reissued.
        assert!(matches!(
            store.remove(group),
            Err(StoreError::AbsentObject { .. })
        ));
        let next = store.create_group(None, "next").unwrap();
        assert!(next > leaf);
    }

    #[test]
    fn remove_detaches_from_parent() {
        let mut store = DataStructure::new();
        let group = store.create_group(None, "g").unwrap();
        let child = store.create_group(Some(group), "child").unwrap();
        store.remove(child).unwrap();
        assert!(store.get(group).unwrap().children().is_empty());
    }

    #[test]
    fn resolve_path_walks_children() {
        let mut store = DataStructure::new();
        let group = store.create_group(None, "g").unwrap();
        let id = ramp_array(&mut store, "top", 4);
        let nested = store
            .create_array(
                Some(group),
                "nested",
                ElementKind::Int32,
                smallvec![2],
                smallvec![1],
            )
            .unwrap();

        assert_eq!(store.resolve_path(&DataPath::parse("top")), Some(id));
        assert_eq!(store.resolve_path(&DataPath::parse("g/nested")), Some(nested));
        assert_eq!(store.resolve_path(&DataPath::parse("g/missing")), None);
        assert_eq!(store.resolve_path(&DataPath::default()), None);

        assert_eq!(store.path_of(nested), Some(DataPath::parse("g/nested")));
    }

    #[test]
    fn rename_updates_sibling_set() {
        let mut store = DataStructure::new();
        let group = store.create_group(None, "g").unwrap();
        let child = store.create_group(Some(group), "old").unwrap();
        store.rename(child, "new").unwrap();
        assert_eq!(store.resolve_path(&DataPath::parse("g/new")), Some(child));
        assert_eq!(store.resolve_path(&DataPath::parse("g/old")), None);

        let other = store.create_group(Some(group), "other").unwrap();
        assert!(matches!(
            store.rename(other, "new"),
            Err(StoreError::NameCollision { .. })
        ));
    }

    #[test]
    fn shallow_duplicate_aliases_backing_store() {
        let mut store = DataStructure::new();
        let src = ramp_array(&mut store, "src", 4);
        let dup = store.shallow_duplicate(src, "dup").unwrap();

        store.write_typed::<i32>(src).unwrap().set(0, 77);
        assert_eq!(store.read_typed::<i32>(dup).unwrap().get(0), Some(77));
    }

    #[test]
    fn deep_duplicate_copies_backing_store() {
        let mut store = DataStructure::new();
        let src = ramp_array(&mut store, "src", 4);
        let dup = store.deep_duplicate(src, "dup").unwrap();

        store.write_typed::<i32>(src).unwrap().set(0, 77);
        assert_eq!(store.read_typed::<i32>(dup).unwrap().get(0), Some(0));
        assert_eq!(store.read_typed::<i32>(dup).unwrap().get(3), Some(3));
    }

    #[test]
    fn deep_duplicate_of_geometry_unsupported() {
        let mut store = DataStructure::new();
        let geom = store.create_rect_grid(None, "grid").unwrap();
        let before = store.len();
        let err = store.deep_duplicate(geom, "copy").unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedOperation { .. }));
        assert_eq!(store.len(), before);

        // A group containing a geometry is equally rejected, with
        // nothing partially installed.
        let group = store.create_group(None, "g").unwrap();
        store.create_rect_grid(Some(group), "inner").unwrap();
        let before = store.len();
        assert!(store.deep_duplicate(group, "g2").is_err());
        assert_eq!(store.len(), before);
    }

    #[test]
    fn deep_duplicate_of_group_copies_subtree() {
        let mut store = DataStructure::new();
        let group = store.create_group(None, "g").unwrap();
        let leaf = store
            .create_array(
                Some(group),
                "leaf",
                ElementKind::Int32,
                smallvec![2],
                smallvec![1],
            )
            .unwrap();
        store.write_typed::<i32>(leaf).unwrap().set(0, 5);

        let copy = store.deep_duplicate(group, "g2").unwrap();
        let copy_leaf = store.get(copy).unwrap().child("leaf").unwrap();
        assert_eq!(store.read_typed::<i32>(copy_leaf).unwrap().get(0), Some(5));

        store.write_typed::<i32>(leaf).unwrap().set(0, 6);
        assert_eq!(store.read_typed::<i32>(copy_leaf).unwrap().get(0), Some(5));
    }

    fn kind_strategy() -> impl Strategy<Value = ElementKind> {
        prop::sample::select(ElementKind::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn create_then_read_is_zeroed_for_every_kind(
            kind in kind_strategy(),
            tuple in prop::collection::vec(1usize..5, 1..4),
            comp in prop::collection::vec(1usize..4, 1..3),
        ) {
            let expected: usize =
                tuple.iter().product::<usize>() * comp.iter().product::<usize>();
            let mut store = DataStructure::new();
            let id = store
                .create_array(
                    None,
                    "data",
                    kind,
                    Shape::from_vec(tuple),
                    Shape::from_vec(comp),
                )
                .unwrap();
            let guard = store.read_array(id).unwrap();
            prop_assert_eq!(guard.kind(), kind);
            prop_assert_eq!(guard.len(), expected);
        }
    }

    #[test]
    fn zeroed_elements_are_kind_zero() {
        // Spot-check the default value per kind through the typed path.
        let mut store = DataStructure::new();
        let id = store
            .create_array(None, "b", ElementKind::Boolean, smallvec![3], smallvec![1])
            .unwrap();
        assert!(store
            .read_typed::<bool>(id)
            .unwrap()
            .as_slice()
            .iter()
            .all(|&v| v == bool::default()));
    }

    #[test]
    fn element_trait_kind_matches_store_kind() {
        let mut store = DataStructure::new();
        let id = store
            .create_array(None, "u", ElementKind::UInt16, smallvec![1], smallvec![1])
            .unwrap();
        assert_eq!(store.get_array(id).unwrap().kind(), <u16 as Element>::KIND);
    }
}
