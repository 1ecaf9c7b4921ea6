//! Group reconstruction.
//!
//! [`read_group`] decodes a full subtree into memory first and only
//! then installs it into the store, so a truncated or corrupt stream
//! installs nothing. Ids are freshly issued on installation; geometry
//! references are re-linked through the reconstructed child names.

use std::io::Read;

use trellis_core::{shape_element_count, ElementKind, ObjectId, Shape};
use trellis_store::{DataStructure, ErasedStore, StoreElement, TypedStore};

use crate::codec::{
    kind_from_tag, read_count, read_f32_le, read_f64_le, read_i16_le, read_i32_le, read_i64_le,
    read_i8, read_length_prefixed_str, read_u16_le, read_u32_le, read_u64_le, read_u8,
};
use crate::error::ArchiveError;
use crate::{FORMAT_VERSION, MAGIC, TAG_ARRAY, TAG_GROUP, TAG_RECT_GRID};

struct DecodedNode {
    name: String,
    payload: DecodedPayload,
    children: Vec<DecodedNode>,
}

enum DecodedPayload {
    Group,
    Array(ErasedStore),
    RectGrid {
        dims: [usize; 3],
        // Child names for x/y/z bounds and cached element sizes.
        refs: [Option<String>; 4],
    },
}

/// Reconstruct an archived subtree under `parent` (or at the top
/// level), returning the new root's id.
///
/// All-or-nothing: any decode or installation failure leaves the
/// store exactly as it was.
pub fn read_group(
    r: &mut dyn Read,
    structure: &mut DataStructure,
    parent: Option<ObjectId>,
) -> Result<ObjectId, ArchiveError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(ArchiveError::InvalidMagic);
    }
    let version = read_u8(r)?;
    if version != FORMAT_VERSION {
        return Err(ArchiveError::UnsupportedVersion { found: version });
    }

    let node = decode_node(r)?;
    install_root(structure, parent, node)
}

// ── Decoding ───────────────────────────────────────────────────

fn decode_node(r: &mut dyn Read) -> Result<DecodedNode, ArchiveError> {
    let name = read_length_prefixed_str(r)?;
    let tag = read_u8(r)?;
    let payload = match tag {
        TAG_GROUP => DecodedPayload::Group,
        TAG_ARRAY => DecodedPayload::Array(decode_array(r)?),
        TAG_RECT_GRID => decode_rect_grid(r)?,
        tag => return Err(ArchiveError::UnknownPayloadTag { tag }),
    };
    let child_count = read_u32_le(r)? as usize;
    let mut children = Vec::with_capacity(child_count);
    for _ in 0..child_count {
        children.push(decode_node(r)?);
    }
    Ok(DecodedNode {
        name,
        payload,
        children,
    })
}

fn decode_shape(r: &mut dyn Read) -> Result<Shape, ArchiveError> {
    let rank = read_u32_le(r)? as usize;
    let mut shape = Shape::with_capacity(rank);
    for _ in 0..rank {
        shape.push(read_count(r)?);
    }
    Ok(shape)
}

fn build_store<T: StoreElement>(
    tuple_shape: Shape,
    component_shape: Shape,
    data: Vec<T>,
) -> Result<ErasedStore, ArchiveError> {
    TypedStore::from_vec(tuple_shape, component_shape, data)
        .map(T::erase)
        .ok_or_else(|| ArchiveError::MalformedGroup {
            detail: "array data does not match its shapes".to_owned(),
        })
}

fn decode_array(r: &mut dyn Read) -> Result<ErasedStore, ArchiveError> {
    let kind = kind_from_tag(read_u8(r)?)?;
    let tuple_shape = decode_shape(r)?;
    let component_shape = decode_shape(r)?;
    let len = shape_element_count(&tuple_shape) * shape_element_count(&component_shape);

    match kind {
        ElementKind::Int8 => {
            let mut data = Vec::with_capacity(len);
            for _ in 0..len {
                data.push(read_i8(r)?);
            }
            build_store(tuple_shape, component_shape, data)
        }
        ElementKind::Int16 => {
            let mut data = Vec::with_capacity(len);
            for _ in 0..len {
                data.push(read_i16_le(r)?);
            }
            build_store(tuple_shape, component_shape, data)
        }
        ElementKind::Int32 => {
            let mut data = Vec::with_capacity(len);
            for _ in 0..len {
                data.push(read_i32_le(r)?);
            }
            build_store(tuple_shape, component_shape, data)
        }
        ElementKind::Int64 => {
            let mut data = Vec::with_capacity(len);
            for _ in 0..len {
                data.push(read_i64_le(r)?);
            }
            build_store(tuple_shape, component_shape, data)
        }
        ElementKind::UInt8 => {
            let mut data = Vec::with_capacity(len);
            for _ in 0..len {
                data.push(read_u8(r)?);
            }
            build_store(tuple_shape, component_shape, data)
        }
        ElementKind::UInt16 => {
            let mut data = Vec::with_capacity(len);
            for _ in 0..len {
                data.push(read_u16_le(r)?);
            }
            build_store(tuple_shape, component_shape, data)
        }
        ElementKind::UInt32 => {
            let mut data = Vec::with_capacity(len);
            for _ in 0..len {
                data.push(read_u32_le(r)?);
            }
            build_store(tuple_shape, component_shape, data)
        }
        ElementKind::UInt64 => {
            let mut data = Vec::with_capacity(len);
            for _ in 0..len {
                data.push(read_u64_le(r)?);
            }
            build_store(tuple_shape, component_shape, data)
        }
        ElementKind::Float32 => {
            let mut data = Vec::with_capacity(len);
            for _ in 0..len {
                data.push(read_f32_le(r)?);
            }
            build_store(tuple_shape, component_shape, data)
        }
        ElementKind::Float64 => {
            let mut data = Vec::with_capacity(len);
            for _ in 0..len {
                data.push(read_f64_le(r)?);
            }
            build_store(tuple_shape, component_shape, data)
        }
        ElementKind::Boolean => {
            let mut data = Vec::with_capacity(len);
            for _ in 0..len {
                data.push(read_u8(r)? != 0);
            }
            build_store(tuple_shape, component_shape, data)
        }
    }
}

fn decode_rect_grid(r: &mut dyn Read) -> Result<DecodedPayload, ArchiveError> {
    let dims = [read_count(r)?, read_count(r)?, read_count(r)?];
    let mut refs: [Option<String>; 4] = [None, None, None, None];
    for slot in refs.iter_mut() {
        if read_u8(r)? != 0 {
            *slot = Some(read_length_prefixed_str(r)?);
        }
    }
    Ok(DecodedPayload::RectGrid { dims, refs })
}

// ── Installation ───────────────────────────────────────────────

fn install_root(
    structure: &mut DataStructure,
    parent: Option<ObjectId>,
    node: DecodedNode,
) -> Result<ObjectId, ArchiveError> {
    let root = install_payload(structure, parent, &node)?;
    if let Err(e) = install_children(structure, root, node) {
        // Decode succeeded but installation hit the store (e.g. a
        // pathological hand-crafted stream); roll the root back so
        // nothing partial remains.
        let _ = structure.remove(root);
        return Err(e);
    }
    Ok(root)
}

fn install_payload(
    structure: &mut DataStructure,
    parent: Option<ObjectId>,
    node: &DecodedNode,
) -> Result<ObjectId, ArchiveError> {
    let id = match &node.payload {
        DecodedPayload::Group => structure.create_group(parent, node.name.clone())?,
        DecodedPayload::Array(store) => {
            structure.create_array_from(parent, node.name.clone(), store.clone())?
        }
        DecodedPayload::RectGrid { dims, .. } => {
            let id = structure.create_rect_grid(parent, node.name.clone())?;
            structure
                .get_mut(id)
                .and_then(|obj| obj.as_rect_grid_mut())
                .ok_or_else(|| ArchiveError::MalformedGroup {
                    detail: "freshly created geometry vanished".to_owned(),
                })?
                .set_dims(*dims);
            id
        }
    };
    Ok(id)
}

fn install_children(
    structure: &mut DataStructure,
    id: ObjectId,
    node: DecodedNode,
) -> Result<(), ArchiveError> {
    let grid_refs = match &node.payload {
        DecodedPayload::RectGrid { refs, .. } => Some(refs.clone()),
        _ => None,
    };

    for child in node.children {
        let child_id = install_payload(structure, Some(id), &child)?;
        install_children(structure, child_id, child)?;
    }

    if let Some(refs) = grid_refs {
        apply_grid_refs(structure, id, refs)?;
    }
    Ok(())
}

fn apply_grid_refs(
    structure: &mut DataStructure,
    id: ObjectId,
    refs: [Option<String>; 4],
) -> Result<(), ArchiveError> {
    let obj = structure.get(id).ok_or_else(|| ArchiveError::MalformedGroup {
        detail: "freshly created geometry vanished".to_owned(),
    })?;
    let mut resolved = [None, None, None, None];
    for (slot, name) in resolved.iter_mut().zip(refs.iter()) {
        if let Some(name) = name {
            *slot = Some(obj.child(name).ok_or_else(|| ArchiveError::MalformedGroup {
                detail: format!("geometry reference '{name}' has no matching child"),
            })?);
        }
    }

    let grid = structure
        .get_mut(id)
        .and_then(|obj| obj.as_rect_grid_mut())
        .ok_or_else(|| ArchiveError::MalformedGroup {
            detail: "freshly created geometry vanished".to_owned(),
        })?;
    grid.set_bounds(resolved[0], resolved[1], resolved[2]);
    grid.set_element_sizes_id(resolved[3]);
    Ok(())
}
