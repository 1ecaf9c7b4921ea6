//! Store fixtures shared by workspace tests.

use smallvec::smallvec;
use trellis_core::{ElementKind, ObjectId};
use trellis_geom::rect_grid;
use trellis_store::DataStructure;

/// A store holding one top-level `int32` array named `input`, filled
/// with the ramp `0..len`.
pub fn ramp_store(len: usize) -> (DataStructure, ObjectId) {
    let mut structure = DataStructure::new();
    let id = structure
        .create_array(
            None,
            "input",
            ElementKind::Int32,
            smallvec![len],
            smallvec![1],
        )
        .expect("fresh store has no collisions");
    {
        let mut guard = structure.write_typed::<i32>(id).expect("created above");
        for i in 0..len {
            guard.set(i, i as i32);
        }
    }
    (structure, id)
}

/// A `float32` bound array under `parent` with the given values.
pub fn bounds_array(
    structure: &mut DataStructure,
    parent: ObjectId,
    name: &str,
    values: &[f32],
) -> ObjectId {
    let id = structure
        .create_array(
            Some(parent),
            name,
            ElementKind::Float32,
            smallvec![values.len()],
            smallvec![1],
        )
        .expect("fixture names do not collide");
    let mut guard = structure.write_typed::<f32>(id).expect("created above");
    for (i, &v) in values.iter().enumerate() {
        guard.set(i, v);
    }
    drop(guard);
    id
}

/// A store holding a top-level 2×1×1 rectilinear grid named `grid`
/// with bounds x = [0, 1, 2], y = [0, 1], z = [0, 1] owned as
/// children of the geometry.
pub fn grid_2x1x1() -> (DataStructure, ObjectId) {
    let mut structure = DataStructure::new();
    let geom = structure
        .create_rect_grid(None, "grid")
        .expect("fresh store has no collisions");
    let x = bounds_array(&mut structure, geom, "xBounds", &[0.0, 1.0, 2.0]);
    let y = bounds_array(&mut structure, geom, "yBounds", &[0.0, 1.0]);
    let z = bounds_array(&mut structure, geom, "zBounds", &[0.0, 1.0]);
    rect_grid::set_bounds(&mut structure, geom, Some(x), Some(y), Some(z))
        .expect("bounds are float32 arrays");
    rect_grid::set_dims(&mut structure, geom, [2, 1, 1]).expect("geometry exists");
    (structure, geom)
}
