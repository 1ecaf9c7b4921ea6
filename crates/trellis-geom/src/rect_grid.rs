//! Operations on rectilinear grid geometries.
//!
//! The geometry's state (cell counts plus ids of its bound arrays and
//! cached derived arrays) lives in the store as a
//! [`RectGrid`] payload; the functions here resolve that
//! state against the owning [`DataStructure`] on every call. Deleting
//! a referenced array between calls therefore degrades to an absent
//! lookup, never a dangling reference.
//!
//! Cells are half-open boxes: along each axis, cell `i` spans
//! `[bounds[i], bounds[i + 1])`. Flattened indices are row-major with
//! x fastest: `index = y_cells * x_cells * z + x_cells * y + x`.

use parking_lot::MappedRwLockReadGuard;
use smallvec::smallvec;
use trellis_core::{ElementKind, ObjectId};
use trellis_store::{DataObject, DataStructure, RectGrid, StoreElement, TypedStore};

use crate::error::{Axis, GeomError};

/// Name of the cached element-sizes array created under the geometry.
pub const ELEMENT_SIZES_NAME: &str = "Cell Sizes";

/// A read-locked view of one bound array.
pub type BoundsGuard<'a> = MappedRwLockReadGuard<'a, TypedStore<f32>>;

fn grid_ref(structure: &DataStructure, geom: ObjectId) -> Result<&RectGrid, GeomError> {
    structure
        .get(geom)
        .ok_or(GeomError::AbsentGeometry { id: geom })?
        .as_rect_grid()
        .ok_or(GeomError::NotAGeometry { id: geom })
}

fn grid_mut(structure: &mut DataStructure, geom: ObjectId) -> Result<&mut RectGrid, GeomError> {
    structure
        .get_mut(geom)
        .ok_or(GeomError::AbsentGeometry { id: geom })?
        .as_rect_grid_mut()
        .ok_or(GeomError::NotAGeometry { id: geom })
}

fn bounds_guard(
    structure: &DataStructure,
    id: Option<ObjectId>,
    axis: Axis,
) -> Result<BoundsGuard<'_>, GeomError> {
    let id = id.ok_or(GeomError::MissingBounds { axis })?;
    structure
        .read_typed::<f32>(id)
        .map_err(|_| GeomError::MissingBounds { axis })
}

// ── State accessors ────────────────────────────────────────────

/// The cell-count vector `(x, y, z)`.
pub fn dims(structure: &DataStructure, geom: ObjectId) -> Result<[usize; 3], GeomError> {
    Ok(grid_ref(structure, geom)?.dims())
}

/// Replace the cell-count vector.
pub fn set_dims(
    structure: &mut DataStructure,
    geom: ObjectId,
    dims: [usize; 3],
) -> Result<(), GeomError> {
    grid_mut(structure, geom)?.set_dims(dims);
    Ok(())
}

/// Total cell count.
pub fn num_cells(structure: &DataStructure, geom: ObjectId) -> Result<usize, GeomError> {
    Ok(grid_ref(structure, geom)?.num_cells())
}

/// Point (plane) count along each axis: one more than the cell count.
pub fn num_points(structure: &DataStructure, geom: ObjectId) -> Result<[usize; 3], GeomError> {
    let d = dims(structure, geom)?;
    Ok([d[0] + 1, d[1] + 1, d[2] + 1])
}

/// Set or clear the three bound-array references.
///
/// Each supplied id must resolve to a one-component float32 array;
/// `None` clears that axis.
pub fn set_bounds(
    structure: &mut DataStructure,
    geom: ObjectId,
    x: Option<ObjectId>,
    y: Option<ObjectId>,
    z: Option<ObjectId>,
) -> Result<(), GeomError> {
    grid_ref(structure, geom)?;
    for (axis, id) in [(Axis::X, x), (Axis::Y, y), (Axis::Z, z)] {
        if let Some(id) = id {
            let node = structure
                .get_array(id)
                .ok_or(GeomError::InvalidBounds { axis })?;
            let components: usize = node.component_shape().iter().product();
            if node.kind() != ElementKind::Float32 || components != 1 {
                return Err(GeomError::InvalidBounds { axis });
            }
        }
    }
    grid_mut(structure, geom)?.set_bounds(x, y, z);
    Ok(())
}

/// Read-locked x-axis bounds; `Ok(None)` when unset or no longer
/// resolving.
pub fn x_bounds(
    structure: &DataStructure,
    geom: ObjectId,
) -> Result<Option<BoundsGuard<'_>>, GeomError> {
    let grid = grid_ref(structure, geom)?;
    Ok(grid
        .x_bounds_id()
        .and_then(|id| structure.read_typed::<f32>(id).ok()))
}

/// Read-locked y-axis bounds; `Ok(None)` when unset or no longer
/// resolving.
pub fn y_bounds(
    structure: &DataStructure,
    geom: ObjectId,
) -> Result<Option<BoundsGuard<'_>>, GeomError> {
    let grid = grid_ref(structure, geom)?;
    Ok(grid
        .y_bounds_id()
        .and_then(|id| structure.read_typed::<f32>(id).ok()))
}

/// Read-locked z-axis bounds; `Ok(None)` when unset or no longer
/// resolving.
pub fn z_bounds(
    structure: &DataStructure,
    geom: ObjectId,
) -> Result<Option<BoundsGuard<'_>>, GeomError> {
    let grid = grid_ref(structure, geom)?;
    Ok(grid
        .z_bounds_id()
        .and_then(|id| structure.read_typed::<f32>(id).ok()))
}

/// Zero the cell counts and clear every referenced id. Referenced
/// arrays themselves are left in place.
pub fn reset(structure: &mut DataStructure, geom: ObjectId) -> Result<(), GeomError> {
    grid_mut(structure, geom)?.reset();
    Ok(())
}

// ── Derived element sizes ──────────────────────────────────────

/// Read-locked cached element sizes; `Ok(None)` until computed or
/// after invalidation.
pub fn element_sizes(
    structure: &DataStructure,
    geom: ObjectId,
) -> Result<Option<BoundsGuard<'_>>, GeomError> {
    let grid = grid_ref(structure, geom)?;
    Ok(grid
        .element_sizes_id()
        .and_then(|id| structure.read_typed::<f32>(id).ok()))
}

fn clear_size_cache(structure: &mut DataStructure, geom: ObjectId, cached: Option<ObjectId>) {
    if let Some(old) = cached {
        let _ = structure.remove(old);
    }
    if let Some(grid) = structure.get_mut(geom).and_then(DataObject::as_rect_grid_mut) {
        grid.set_element_sizes_id(None);
    }
}

/// Compute per-cell volumes `Δx·Δy·Δz` from adjacent bound
/// differences and cache them as a float32 child array of the
/// geometry.
///
/// Any non-positive spacing on any axis fails the whole operation
/// with [`GeomError::NonMonotonicBounds`]; the partial result is
/// discarded and the cached reference is left unset. The check runs
/// against the current bound contents, so callers must re-run this
/// after mutating bounds.
pub fn compute_element_sizes(
    structure: &mut DataStructure,
    geom: ObjectId,
) -> Result<ObjectId, GeomError> {
    let grid = grid_ref(structure, geom)?;
    let dims = grid.dims();
    let [bx, by, bz] = grid.bounds();
    let cached = grid.element_sizes_id();

    let computed = compute_sizes(structure, dims, bx, by, bz);
    match computed {
        Err(e) => {
            clear_size_cache(structure, geom, cached);
            Err(e)
        }
        Ok(sizes) => {
            clear_size_cache(structure, geom, cached);
            let store = TypedStore::from_vec(smallvec![sizes.len()], smallvec![1], sizes)
                .expect("size vector matches cell count");
            let id = structure.create_array_from(
                Some(geom),
                ELEMENT_SIZES_NAME,
                <f32 as StoreElement>::erase(store),
            )?;
            grid_mut(structure, geom)?.set_element_sizes_id(Some(id));
            Ok(id)
        }
    }
}

fn compute_sizes(
    structure: &DataStructure,
    dims: [usize; 3],
    bx: Option<ObjectId>,
    by: Option<ObjectId>,
    bz: Option<ObjectId>,
) -> Result<Vec<f32>, GeomError> {
    let cells = dims[0] * dims[1] * dims[2];
    if cells == 0 {
        return Err(GeomError::EmptyGrid);
    }

    let xb = bounds_guard(structure, bx, Axis::X)?;
    let yb = bounds_guard(structure, by, Axis::Y)?;
    let zb = bounds_guard(structure, bz, Axis::Z)?;
    for (axis, guard, axis_cells) in [
        (Axis::X, &xb, dims[0]),
        (Axis::Y, &yb, dims[1]),
        (Axis::Z, &zb, dims[2]),
    ] {
        if guard.len() < axis_cells + 1 {
            return Err(GeomError::BoundsTooShort {
                axis,
                needed: axis_cells + 1,
                actual: guard.len(),
            });
        }
    }

    let (xs, ys, zs) = (xb.as_slice(), yb.as_slice(), zb.as_slice());
    let mut sizes = vec![0.0f32; cells];
    for z in 0..dims[2] {
        let z_res = zs[z + 1] - zs[z];
        if z_res <= 0.0 {
            return Err(GeomError::NonMonotonicBounds { axis: Axis::Z, index: z });
        }
        for y in 0..dims[1] {
            let y_res = ys[y + 1] - ys[y];
            if y_res <= 0.0 {
                return Err(GeomError::NonMonotonicBounds { axis: Axis::Y, index: y });
            }
            for x in 0..dims[0] {
                let x_res = xs[x + 1] - xs[x];
                if x_res <= 0.0 {
                    return Err(GeomError::NonMonotonicBounds { axis: Axis::X, index: x });
                }
                sizes[dims[0] * dims[1] * z + dims[0] * y + x] = x_res * y_res * z_res;
            }
        }
    }
    Ok(sizes)
}

/// Remove the cached element-sizes array and clear the reference.
pub fn delete_element_sizes(
    structure: &mut DataStructure,
    geom: ObjectId,
) -> Result<(), GeomError> {
    let cached = grid_ref(structure, geom)?.element_sizes_id();
    clear_size_cache(structure, geom, cached);
    Ok(())
}

// ── Spatial indexing ───────────────────────────────────────────

/// Per-axis containing cell: the unique `i` with
/// `bounds[i] <= coord < bounds[i + 1]`, after rejecting coordinates
/// outside `[first, last)`.
fn axis_cell(bounds: &[f32], coord: f32) -> Option<usize> {
    let first = *bounds.first()?;
    let last = *bounds.last()?;
    if coord < first || coord >= last {
        return None;
    }
    bounds
        .windows(2)
        .position(|pair| coord >= pair[0] && coord < pair[1])
}

/// Find the cell containing a coordinate, `Ok(None)` when the
/// coordinate lies outside the grid on any axis.
///
/// Cell counts are derived from the bound arrays themselves
/// (`points - 1` per axis), so the result is consistent with whatever
/// bounds are currently installed.
pub fn locate(
    structure: &DataStructure,
    geom: ObjectId,
    x: f32,
    y: f32,
    z: f32,
) -> Result<Option<usize>, GeomError> {
    let grid = grid_ref(structure, geom)?;
    let [bx, by, bz] = grid.bounds();
    let xb = bounds_guard(structure, bx, Axis::X)?;
    let yb = bounds_guard(structure, by, Axis::Y)?;
    let zb = bounds_guard(structure, bz, Axis::Z)?;

    let (cx, cy, cz) = match (
        axis_cell(xb.as_slice(), x),
        axis_cell(yb.as_slice(), y),
        axis_cell(zb.as_slice(), z),
    ) {
        (Some(cx), Some(cy), Some(cz)) => (cx, cy, cz),
        _ => return Ok(None),
    };

    let x_cells = xb.len() - 1;
    let y_cells = yb.len() - 1;
    Ok(Some(y_cells * x_cells * cz + x_cells * cy + cx))
}

/// Split a flattened cell index into per-axis indices.
fn unflatten(dims: [usize; 3], index: usize) -> Result<[usize; 3], GeomError> {
    let cells = dims[0] * dims[1] * dims[2];
    if index >= cells {
        return Err(GeomError::CellOutOfRange {
            index,
            limit: cells,
        });
    }
    let column = index % dims[0];
    let row = (index / dims[0]) % dims[1];
    let plane = index / (dims[0] * dims[1]);
    Ok([column, row, plane])
}

fn bound_at(guard: &BoundsGuard<'_>, axis: Axis, index: usize) -> Result<f32, GeomError> {
    guard.get(index).ok_or(GeomError::BoundsTooShort {
        axis,
        needed: index + 1,
        actual: guard.len(),
    })
}

/// Lower-corner coordinates of per-axis point indices.
pub fn corner_at(
    structure: &DataStructure,
    geom: ObjectId,
    x: usize,
    y: usize,
    z: usize,
) -> Result<[f32; 3], GeomError> {
    let grid = grid_ref(structure, geom)?;
    let [bx, by, bz] = grid.bounds();
    let xb = bounds_guard(structure, bx, Axis::X)?;
    let yb = bounds_guard(structure, by, Axis::Y)?;
    let zb = bounds_guard(structure, bz, Axis::Z)?;
    Ok([
        bound_at(&xb, Axis::X, x)?,
        bound_at(&yb, Axis::Y, y)?,
        bound_at(&zb, Axis::Z, z)?,
    ])
}

/// Center coordinates of per-axis cell indices: the midpoint of each
/// axis's adjacent bound pair.
pub fn center_at(
    structure: &DataStructure,
    geom: ObjectId,
    x: usize,
    y: usize,
    z: usize,
) -> Result<[f32; 3], GeomError> {
    let grid = grid_ref(structure, geom)?;
    let [bx, by, bz] = grid.bounds();
    let xb = bounds_guard(structure, bx, Axis::X)?;
    let yb = bounds_guard(structure, by, Axis::Y)?;
    let zb = bounds_guard(structure, bz, Axis::Z)?;
    Ok([
        0.5 * (bound_at(&xb, Axis::X, x)? + bound_at(&xb, Axis::X, x + 1)?),
        0.5 * (bound_at(&yb, Axis::Y, y)? + bound_at(&yb, Axis::Y, y + 1)?),
        0.5 * (bound_at(&zb, Axis::Z, z)? + bound_at(&zb, Axis::Z, z + 1)?),
    ])
}

/// Lower-corner coordinates of a flattened cell index.
pub fn cell_corner(
    structure: &DataStructure,
    geom: ObjectId,
    index: usize,
) -> Result<[f32; 3], GeomError> {
    let dims = dims(structure, geom)?;
    let [x, y, z] = unflatten(dims, index)?;
    corner_at(structure, geom, x, y, z)
}

/// Center coordinates of a flattened cell index.
pub fn cell_center(
    structure: &DataStructure,
    geom: ObjectId,
    index: usize,
) -> Result<[f32; 3], GeomError> {
    let dims = dims(structure, geom)?;
    let [x, y, z] = unflatten(dims, index)?;
    center_at(structure, geom, x, y, z)
}

// ── Shape functions ────────────────────────────────────────────

/// The parametric center of a grid cell.
pub fn parametric_center() -> [f64; 3] {
    [0.5, 0.5, 0.5]
}

/// Derivatives of the trilinear shape functions at a parametric
/// coordinate: 8 r-derivatives, then 8 s-derivatives, then 8
/// t-derivatives.
pub fn shape_function_derivatives(p: [f64; 3]) -> [f64; 24] {
    let rm = 1.0 - p[0];
    let sm = 1.0 - p[1];
    let tm = 1.0 - p[2];

    [
        // r derivatives
        -sm * tm,
        sm * tm,
        -p[1] * tm,
        p[1] * tm,
        -sm * p[2],
        sm * p[2],
        -p[1] * p[2],
        p[1] * p[2],
        // s derivatives
        -rm * tm,
        -p[0] * tm,
        rm * tm,
        p[0] * tm,
        -rm * p[2],
        -p[0] * p[2],
        rm * p[2],
        p[0] * p[2],
        // t derivatives
        -rm * sm,
        -p[0] * sm,
        -rm * p[1],
        -p[0] * p[1],
        rm * sm,
        p[0] * sm,
        rm * p[1],
        p[0] * p[1],
    ]
}

// ── Unsupported derived quantities ─────────────────────────────

/// Element-neighbor lists are not defined for rectilinear grids.
pub fn find_element_neighbors(
    _structure: &mut DataStructure,
    _geom: ObjectId,
) -> Result<(), GeomError> {
    Err(GeomError::Unsupported {
        operation: "element neighbors",
    })
}

/// Element-containing-vertex lists are not defined for rectilinear
/// grids.
pub fn find_elements_containing_vertex(
    _structure: &mut DataStructure,
    _geom: ObjectId,
) -> Result<(), GeomError> {
    Err(GeomError::Unsupported {
        operation: "elements containing vertex",
    })
}

/// Centroid lists are not defined for rectilinear grids.
pub fn find_element_centroids(
    _structure: &mut DataStructure,
    _geom: ObjectId,
) -> Result<(), GeomError> {
    Err(GeomError::Unsupported {
        operation: "element centroids",
    })
}

/// Derivative fields are not defined for rectilinear grids.
pub fn find_derivatives(
    _structure: &mut DataStructure,
    _geom: ObjectId,
    _field: ObjectId,
) -> Result<(), GeomError> {
    Err(GeomError::Unsupported {
        operation: "derivatives",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use smallvec::smallvec;
    use trellis_store::StoreError;

    fn bounds_array(structure: &mut DataStructure, parent: ObjectId, name: &str, values: &[f32]) -> ObjectId {
        let id = structure
            .create_array(
                Some(parent),
                name,
                ElementKind::Float32,
                smallvec![values.len()],
                smallvec![1],
            )
            .unwrap();
        {
            let mut guard = structure.write_typed::<f32>(id).unwrap();
            for (i, &v) in values.iter().enumerate() {
                guard.set(i, v);
            }
        }
        id
    }

    /// 2×1×1 grid: x bounds [0, 1, 2], y bounds [0, 1], z bounds [0, 1].
    fn grid_2x1x1(structure: &mut DataStructure) -> ObjectId {
        let geom = structure.create_rect_grid(None, "grid").unwrap();
        let x = bounds_array(structure, geom, "xBounds", &[0.0, 1.0, 2.0]);
        let y = bounds_array(structure, geom, "yBounds", &[0.0, 1.0]);
        let z = bounds_array(structure, geom, "zBounds", &[0.0, 1.0]);
        set_bounds(structure, geom, Some(x), Some(y), Some(z)).unwrap();
        set_dims(structure, geom, [2, 1, 1]).unwrap();
        geom
    }

    #[test]
    fn locate_finds_containing_cells() {
        let mut structure = DataStructure::new();
        let geom = grid_2x1x1(&mut structure);

        assert_eq!(locate(&structure, geom, 0.5, 0.5, 0.5).unwrap(), Some(0));
        assert_eq!(locate(&structure, geom, 1.5, 0.5, 0.5).unwrap(), Some(1));
        assert_eq!(locate(&structure, geom, -1.0, 0.0, 0.0).unwrap(), None);
    }

    #[test]
    fn locate_is_half_open_per_axis() {
        let mut structure = DataStructure::new();
        let geom = grid_2x1x1(&mut structure);

        // Lower bounds are inclusive, upper bounds exclusive.
        assert_eq!(locate(&structure, geom, 0.0, 0.0, 0.0).unwrap(), Some(0));
        assert_eq!(locate(&structure, geom, 1.0, 0.0, 0.0).unwrap(), Some(1));
        assert_eq!(locate(&structure, geom, 2.0, 0.0, 0.0).unwrap(), None);
        assert_eq!(locate(&structure, geom, 0.5, 1.0, 0.5).unwrap(), None);
    }

    #[test]
    fn compute_element_sizes_yields_cell_volumes() {
        let mut structure = DataStructure::new();
        let geom = grid_2x1x1(&mut structure);

        let sizes_id = compute_element_sizes(&mut structure, geom).unwrap();
        let guard = structure.read_typed::<f32>(sizes_id).unwrap();
        assert_eq!(guard.as_slice(), &[1.0, 1.0]);
        drop(guard);

        // Cached as a child of the geometry, visible via the accessor.
        assert_eq!(
            structure.get(sizes_id).unwrap().parent(),
            Some(geom)
        );
        assert!(element_sizes(&structure, geom).unwrap().is_some());
    }

    #[test]
    fn non_monotonic_bounds_fail_and_leave_no_cache() {
        let mut structure = DataStructure::new();
        let geom = structure.create_rect_grid(None, "grid").unwrap();
        let x = bounds_array(&mut structure, geom, "xBounds", &[0.0, 1.0, 0.0]);
        let y = bounds_array(&mut structure, geom, "yBounds", &[0.0, 1.0]);
        let z = bounds_array(&mut structure, geom, "zBounds", &[0.0, 1.0]);
        set_bounds(&mut structure, geom, Some(x), Some(y), Some(z)).unwrap();
        set_dims(&mut structure, geom, [2, 1, 1]).unwrap();

        let err = compute_element_sizes(&mut structure, geom).unwrap_err();
        assert_eq!(
            err,
            GeomError::NonMonotonicBounds {
                axis: Axis::X,
                index: 1
            }
        );
        assert!(element_sizes(&structure, geom).unwrap().is_none());
        assert!(structure
            .get(geom)
            .unwrap()
            .child(ELEMENT_SIZES_NAME)
            .is_none());
    }

    #[test]
    fn recompute_after_bound_mutation_replaces_cache() {
        let mut structure = DataStructure::new();
        let geom = grid_2x1x1(&mut structure);
        let first = compute_element_sizes(&mut structure, geom).unwrap();

        // Stretch the second x cell, then recompute.
        let x_id = structure.get(geom).unwrap().child("xBounds").unwrap();
        structure.write_typed::<f32>(x_id).unwrap().set(2, 3.0);
        let second = compute_element_sizes(&mut structure, geom).unwrap();

        assert_ne!(first, second);
        assert!(structure.get(first).is_none());
        let guard = structure.read_typed::<f32>(second).unwrap();
        assert_eq!(guard.as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn delete_element_sizes_clears_cache() {
        let mut structure = DataStructure::new();
        let geom = grid_2x1x1(&mut structure);
        let sizes_id = compute_element_sizes(&mut structure, geom).unwrap();

        delete_element_sizes(&mut structure, geom).unwrap();
        assert!(structure.get(sizes_id).is_none());
        assert!(element_sizes(&structure, geom).unwrap().is_none());
    }

    #[test]
    fn removed_bounds_observed_as_absent() {
        let mut structure = DataStructure::new();
        let geom = grid_2x1x1(&mut structure);
        let x_id = structure.get(geom).unwrap().child("xBounds").unwrap();
        structure.remove(x_id).unwrap();

        assert!(x_bounds(&structure, geom).unwrap().is_none());
        assert!(y_bounds(&structure, geom).unwrap().is_some());
        assert_eq!(
            locate(&structure, geom, 0.5, 0.5, 0.5).unwrap_err(),
            GeomError::MissingBounds { axis: Axis::X }
        );
    }

    #[test]
    fn cell_center_and_corner_round_trip() {
        let mut structure = DataStructure::new();
        let geom = grid_2x1x1(&mut structure);

        assert_eq!(
            cell_center(&structure, geom, 0).unwrap(),
            [0.5, 0.5, 0.5]
        );
        assert_eq!(
            cell_center(&structure, geom, 1).unwrap(),
            [1.5, 0.5, 0.5]
        );
        assert_eq!(cell_corner(&structure, geom, 1).unwrap(), [1.0, 0.0, 0.0]);
        assert_eq!(corner_at(&structure, geom, 2, 1, 1).unwrap(), [2.0, 1.0, 1.0]);

        assert!(matches!(
            cell_center(&structure, geom, 2),
            Err(GeomError::CellOutOfRange { index: 2, limit: 2 })
        ));
    }

    #[test]
    fn locate_inverts_cell_center() {
        let mut structure = DataStructure::new();
        let geom = grid_2x1x1(&mut structure);
        for index in 0..num_cells(&structure, geom).unwrap() {
            let [cx, cy, cz] = cell_center(&structure, geom, index).unwrap();
            assert_eq!(locate(&structure, geom, cx, cy, cz).unwrap(), Some(index));
        }
    }

    #[test]
    fn set_bounds_rejects_non_float_arrays() {
        let mut structure = DataStructure::new();
        let geom = structure.create_rect_grid(None, "grid").unwrap();
        let bad = structure
            .create_array(
                Some(geom),
                "bad",
                ElementKind::Int32,
                smallvec![3],
                smallvec![1],
            )
            .unwrap();
        assert_eq!(
            set_bounds(&mut structure, geom, Some(bad), None, None).unwrap_err(),
            GeomError::InvalidBounds { axis: Axis::X }
        );
    }

    #[test]
    fn unsupported_queries_are_explicit() {
        let mut structure = DataStructure::new();
        let geom = grid_2x1x1(&mut structure);
        let field = structure
            .create_array(None, "f", ElementKind::Float64, smallvec![2], smallvec![1])
            .unwrap();

        assert!(matches!(
            find_element_neighbors(&mut structure, geom),
            Err(GeomError::Unsupported { .. })
        ));
        assert!(matches!(
            find_elements_containing_vertex(&mut structure, geom),
            Err(GeomError::Unsupported { .. })
        ));
        assert!(matches!(
            find_element_centroids(&mut structure, geom),
            Err(GeomError::Unsupported { .. })
        ));
        assert!(matches!(
            find_derivatives(&mut structure, geom, field),
            Err(GeomError::Unsupported { .. })
        ));
        assert!(matches!(
            structure.deep_duplicate(geom, "copy"),
            Err(StoreError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn reset_clears_state() {
        let mut structure = DataStructure::new();
        let geom = grid_2x1x1(&mut structure);
        reset(&mut structure, geom).unwrap();
        assert_eq!(dims(&structure, geom).unwrap(), [0, 0, 0]);
        assert!(x_bounds(&structure, geom).unwrap().is_none());
    }

    proptest! {
        #[test]
        fn locate_inverts_center_on_arbitrary_grids(
            xs in prop::collection::vec(0.1f32..2.0, 1..5),
            ys in prop::collection::vec(0.1f32..2.0, 1..4),
            zs in prop::collection::vec(0.1f32..2.0, 1..3),
        ) {
            fn cumulative(increments: &[f32]) -> Vec<f32> {
                let mut bounds = vec![0.0f32];
                for &step in increments {
                    bounds.push(bounds.last().copied().unwrap_or(0.0) + step);
                }
                bounds
            }

            let mut structure = DataStructure::new();
            let geom = structure.create_rect_grid(None, "grid").unwrap();
            let x = bounds_array(&mut structure, geom, "xBounds", &cumulative(&xs));
            let y = bounds_array(&mut structure, geom, "yBounds", &cumulative(&ys));
            let z = bounds_array(&mut structure, geom, "zBounds", &cumulative(&zs));
            set_bounds(&mut structure, geom, Some(x), Some(y), Some(z)).unwrap();
            set_dims(&mut structure, geom, [xs.len(), ys.len(), zs.len()]).unwrap();

            for index in 0..num_cells(&structure, geom).unwrap() {
                let [cx, cy, cz] = cell_center(&structure, geom, index).unwrap();
                prop_assert_eq!(
                    locate(&structure, geom, cx, cy, cz).unwrap(),
                    Some(index)
                );
            }
        }
    }

    #[test]
    fn shape_function_derivatives_at_parametric_center() {
        let table = shape_function_derivatives(parametric_center());
        assert_eq!(table[0], -0.25);
        assert_eq!(table[1], 0.25);
        assert_eq!(table[8], -0.25);
        assert_eq!(table[16], -0.25);
        // Derivatives of a partition of unity sum to zero per block.
        for block in table.chunks(8) {
            let sum: f64 = block.iter().sum();
            assert!(sum.abs() < 1e-12);
        }
    }
}
