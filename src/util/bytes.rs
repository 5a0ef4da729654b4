//! Bounds-checked integer readers over byte slices.
//!
//! Everything stored in compound files and AAF property streams is
//! little-endian; AIFF chunks are big-endian.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::{Error, Result};

/// Borrow `len` bytes at `pos`, failing with `UnexpectedEof` past the end.
#[inline]
pub fn slice_at(buf: &[u8], pos: usize, len: usize) -> Result<&[u8]> {
    pos.checked_add(len)
        .and_then(|end| buf.get(pos..end))
        .ok_or(Error::UnexpectedEof(pos as u64 + len as u64))
}

/// Read little-endian u16.
#[inline]
pub fn le_u16(buf: &[u8], pos: usize) -> Result<u16> {
    Ok(LittleEndian::read_u16(slice_at(buf, pos, 2)?))
}

/// Read little-endian u32.
#[inline]
pub fn le_u32(buf: &[u8], pos: usize) -> Result<u32> {
    Ok(LittleEndian::read_u32(slice_at(buf, pos, 4)?))
}

/// Read little-endian u64.
#[inline]
pub fn le_u64(buf: &[u8], pos: usize) -> Result<u64> {
    Ok(LittleEndian::read_u64(slice_at(buf, pos, 8)?))
}

/// Read little-endian i16.
#[inline]
pub fn le_i16(buf: &[u8], pos: usize) -> Result<i16> {
    Ok(LittleEndian::read_i16(slice_at(buf, pos, 2)?))
}

/// Read little-endian i32.
#[inline]
pub fn le_i32(buf: &[u8], pos: usize) -> Result<i32> {
    Ok(LittleEndian::read_i32(slice_at(buf, pos, 4)?))
}

/// Read little-endian i64.
#[inline]
pub fn le_i64(buf: &[u8], pos: usize) -> Result<i64> {
    Ok(LittleEndian::read_i64(slice_at(buf, pos, 8)?))
}

/// Read big-endian u16.
#[inline]
pub fn be_u16(buf: &[u8], pos: usize) -> Result<u16> {
    Ok(BigEndian::read_u16(slice_at(buf, pos, 2)?))
}

/// Read big-endian u32.
#[inline]
pub fn be_u32(buf: &[u8], pos: usize) -> Result<u32> {
    Ok(BigEndian::read_u32(slice_at(buf, pos, 4)?))
}
