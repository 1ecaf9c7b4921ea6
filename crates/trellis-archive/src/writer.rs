//! Group serialization.
//!
//! [`write_group`] streams the subtree rooted at one object to any
//! `Write` sink: a header, then a recursive node encoding of names,
//! payloads, and children in their stored order.

use std::io::Write;

use trellis_core::ObjectId;
use trellis_store::{DataObject, DataStructure, ErasedStore, NodePayload, RectGrid, StoreError};

use crate::codec::{
    kind_tag, write_f32_le, write_f64_le, write_i16_le, write_i32_le, write_i64_le, write_i8,
    write_length_prefixed_str, write_u16_le, write_u32_le, write_u64_le, write_u8,
};
use crate::error::ArchiveError;
use crate::{FORMAT_VERSION, MAGIC, TAG_ARRAY, TAG_GROUP, TAG_RECT_GRID};

/// Serialize the subtree rooted at `root` into `w`.
///
/// The stream starts with the `b"TRLS"` magic and format version,
/// then one node record per object, children nested in stored order.
/// Geometry bound/cache references are persisted as the names of the
/// geometry's own children; a reference pointing outside the subtree
/// being written is recorded as unset.
pub fn write_group(
    w: &mut dyn Write,
    structure: &DataStructure,
    root: ObjectId,
) -> Result<(), ArchiveError> {
    w.write_all(MAGIC)?;
    write_u8(w, FORMAT_VERSION)?;
    write_node(w, structure, root)
}

fn write_node(
    w: &mut dyn Write,
    structure: &DataStructure,
    id: ObjectId,
) -> Result<(), ArchiveError> {
    let obj = structure
        .get(id)
        .ok_or(ArchiveError::Store(StoreError::AbsentObject { id }))?;
    write_length_prefixed_str(w, obj.name())?;

    match obj.payload() {
        NodePayload::Group => write_u8(w, TAG_GROUP)?,
        NodePayload::Array(node) => {
            write_u8(w, TAG_ARRAY)?;
            write_array(w, &node.store().read())?;
        }
        NodePayload::RectGrid(grid) => {
            write_u8(w, TAG_RECT_GRID)?;
            write_rect_grid(w, obj, grid)?;
        }
    }

    write_u32_le(w, obj.children().len() as u32)?;
    for &child in obj.children().values() {
        write_node(w, structure, child)?;
    }
    Ok(())
}

fn write_shape(w: &mut dyn Write, shape: &[usize]) -> Result<(), ArchiveError> {
    write_u32_le(w, shape.len() as u32)?;
    for &extent in shape {
        write_u64_le(w, extent as u64)?;
    }
    Ok(())
}

fn write_array(w: &mut dyn Write, store: &ErasedStore) -> Result<(), ArchiveError> {
    write_u8(w, kind_tag(store.kind()))?;
    write_shape(w, store.tuple_shape())?;
    write_shape(w, store.component_shape())?;
    match store {
        ErasedStore::Int8(s) => {
            for &v in s.as_slice() {
                write_i8(w, v)?;
            }
        }
        ErasedStore::Int16(s) => {
            for &v in s.as_slice() {
                write_i16_le(w, v)?;
            }
        }
        ErasedStore::Int32(s) => {
            for &v in s.as_slice() {
                write_i32_le(w, v)?;
            }
        }
        ErasedStore::Int64(s) => {
            for &v in s.as_slice() {
                write_i64_le(w, v)?;
            }
        }
        ErasedStore::UInt8(s) => {
            for &v in s.as_slice() {
                write_u8(w, v)?;
            }
        }
        ErasedStore::UInt16(s) => {
            for &v in s.as_slice() {
                write_u16_le(w, v)?;
            }
        }
        ErasedStore::UInt32(s) => {
            for &v in s.as_slice() {
                write_u32_le(w, v)?;
            }
        }
        ErasedStore::UInt64(s) => {
            for &v in s.as_slice() {
                write_u64_le(w, v)?;
            }
        }
        ErasedStore::Float32(s) => {
            for &v in s.as_slice() {
                write_f32_le(w, v)?;
            }
        }
        ErasedStore::Float64(s) => {
            for &v in s.as_slice() {
                write_f64_le(w, v)?;
            }
        }
        ErasedStore::Boolean(s) => {
            for &v in s.as_slice() {
                write_u8(w, u8::from(v))?;
            }
        }
    }
    Ok(())
}

fn write_rect_grid(
    w: &mut dyn Write,
    obj: &DataObject,
    grid: &RectGrid,
) -> Result<(), ArchiveError> {
    for dim in grid.dims() {
        write_u64_le(w, dim as u64)?;
    }
    let [x, y, z] = grid.bounds();
    for target in [x, y, z, grid.element_sizes_id()] {
        write_child_ref(w, obj, target)?;
    }
    Ok(())
}

fn write_child_ref(
    w: &mut dyn Write,
    obj: &DataObject,
    target: Option<ObjectId>,
) -> Result<(), ArchiveError> {
    let name = target.and_then(|t| {
        obj.children()
            .iter()
            .find(|(_, &child)| child == t)
            .map(|(name, _)| name.clone())
    });
    match name {
        Some(name) => {
            write_u8(w, 1)?;
            write_length_prefixed_str(w, &name)
        }
        None => write_u8(w, 0),
    }
}
