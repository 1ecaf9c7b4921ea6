//! Binary encode/decode primitives for the archive format.
//!
//! All integers are little-endian. Strings are length-prefixed with a
//! `u32` length. The format is intentionally simple — no compression,
//! no alignment padding, no self-describing schema.

use std::io::{Read, Write};

use trellis_core::ElementKind;

use crate::error::ArchiveError;

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), ArchiveError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u16.
pub fn write_u16_le(w: &mut dyn Write, v: u16) -> Result<(), ArchiveError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), ArchiveError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian u64.
pub fn write_u64_le(w: &mut dyn Write, v: u64) -> Result<(), ArchiveError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian i8.
pub fn write_i8(w: &mut dyn Write, v: i8) -> Result<(), ArchiveError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian i16.
pub fn write_i16_le(w: &mut dyn Write, v: i16) -> Result<(), ArchiveError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian i32.
pub fn write_i32_le(w: &mut dyn Write, v: i32) -> Result<(), ArchiveError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian i64.
pub fn write_i64_le(w: &mut dyn Write, v: i64) -> Result<(), ArchiveError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f32.
pub fn write_f32_le(w: &mut dyn Write, v: f32) -> Result<(), ArchiveError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f64.
pub fn write_f64_le(w: &mut dyn Write, v: f64) -> Result<(), ArchiveError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a length-prefixed UTF-8 string (u32 length + bytes).
pub fn write_length_prefixed_str(w: &mut dyn Write, s: &str) -> Result<(), ArchiveError> {
    write_u32_le(w, s.len() as u32)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

// ── Primitive readers ───────────────────────────────────────────

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, ArchiveError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian u16.
pub fn read_u16_le(r: &mut dyn Read) -> Result<u16, ArchiveError> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, ArchiveError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian u64.
pub fn read_u64_le(r: &mut dyn Read) -> Result<u64, ArchiveError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Read a little-endian i8.
pub fn read_i8(r: &mut dyn Read) -> Result<i8, ArchiveError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(i8::from_le_bytes(buf))
}

/// Read a little-endian i16.
pub fn read_i16_le(r: &mut dyn Read) -> Result<i16, ArchiveError> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(i16::from_le_bytes(buf))
}

/// Read a little-endian i32.
pub fn read_i32_le(r: &mut dyn Read) -> Result<i32, ArchiveError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

/// Read a little-endian i64.
pub fn read_i64_le(r: &mut dyn Read) -> Result<i64, ArchiveError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(i64::from_le_bytes(buf))
}

/// Read a little-endian f32.
pub fn read_f32_le(r: &mut dyn Read) -> Result<f32, ArchiveError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

/// Read a little-endian f64.
pub fn read_f64_le(r: &mut dyn Read) -> Result<f64, ArchiveError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

/// Read a length-prefixed UTF-8 string.
pub fn read_length_prefixed_str(r: &mut dyn Read) -> Result<String, ArchiveError> {
    let len = read_u32_le(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|e| ArchiveError::MalformedGroup {
        detail: format!("invalid UTF-8 string: {e}"),
    })
}

/// Read a `u64` count into a `usize`, rejecting values that do not
/// fit the platform.
pub fn read_count(r: &mut dyn Read) -> Result<usize, ArchiveError> {
    let v = read_u64_le(r)?;
    usize::try_from(v).map_err(|_| ArchiveError::MalformedGroup {
        detail: format!("count {v} does not fit in usize"),
    })
}

// ── Element kind tags ───────────────────────────────────────────

/// Stable one-byte tag for an element kind.
pub fn kind_tag(kind: ElementKind) -> u8 {
    match kind {
        ElementKind::Int8 => 0,
        ElementKind::Int16 => 1,
        ElementKind::Int32 => 2,
        ElementKind::Int64 => 3,
        ElementKind::UInt8 => 4,
        ElementKind::UInt16 => 5,
        ElementKind::UInt32 => 6,
        ElementKind::UInt64 => 7,
        ElementKind::Float32 => 8,
        ElementKind::Float64 => 9,
        ElementKind::Boolean => 10,
    }
}

/// Inverse of [`kind_tag`].
pub fn kind_from_tag(tag: u8) -> Result<ElementKind, ArchiveError> {
    match tag {
        0 => Ok(ElementKind::Int8),
        1 => Ok(ElementKind::Int16),
        2 => Ok(ElementKind::Int32),
        3 => Ok(ElementKind::Int64),
        4 => Ok(ElementKind::UInt8),
        5 => Ok(ElementKind::UInt16),
        6 => Ok(ElementKind::UInt32),
        7 => Ok(ElementKind::UInt64),
        8 => Ok(ElementKind::Float32),
        9 => Ok(ElementKind::Float64),
        10 => Ok(ElementKind::Boolean),
        tag => Err(ArchiveError::UnknownKindTag { tag }),
    }
}
