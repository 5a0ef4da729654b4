//! Directory entries of a compound file.

use std::cmp::Ordering;

use super::format::*;
use crate::core::Auid;
use crate::util::{le_u16, le_u32, le_u64, slice_at, utf16le_to_string, Result};

/// Index of a directory entry.
pub type NodeId = u32;

/// Kind of a directory entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryType {
    Unused,
    Storage,
    Stream,
    Root,
}

impl EntryType {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => EntryType::Storage,
            2 => EntryType::Stream,
            5 => EntryType::Root,
            _ => EntryType::Unused,
        }
    }
}

/// One 128-byte directory entry.
#[derive(Clone, Debug)]
pub struct DirEntry {
    pub id: NodeId,
    pub name: String,
    pub kind: EntryType,
    pub left: NodeId,
    pub right: NodeId,
    pub child: NodeId,
    pub clsid: Auid,
    pub start_sector: u32,
    pub size: u64,
}

impl DirEntry {
    /// Decode entry `id` from its 128 raw bytes.
    pub fn parse(id: NodeId, buf: &[u8], sector_shift: u16) -> Result<Self> {
        let name_len = (le_u16(buf, DIR_NAME_LEN_OFFSET)? as usize).min(DIR_NAME_SIZE);
        let name = utf16le_to_string(slice_at(buf, 0, name_len)?);
        let mut size = le_u64(buf, DIR_SIZE_OFFSET)?;

        // Version 3 writers may leave garbage in the high dword.
        if sector_shift == SECTOR_SHIFT_V3 {
            size &= 0xFFFF_FFFF;
        }

        Ok(Self {
            id,
            name,
            kind: EntryType::from_u8(buf[DIR_TYPE_OFFSET]),
            left: le_u32(buf, DIR_LEFT_OFFSET)?,
            right: le_u32(buf, DIR_RIGHT_OFFSET)?,
            child: le_u32(buf, DIR_CHILD_OFFSET)?,
            clsid: Auid::from_bytes(slice_at(buf, DIR_CLSID_OFFSET, 16)?)?,
            start_sector: le_u32(buf, DIR_START_SECTOR_OFFSET)?,
            size,
        })
    }

    #[inline]
    pub fn is_stream(&self) -> bool {
        self.kind == EntryType::Stream
    }

    #[inline]
    pub fn is_storage(&self) -> bool {
        matches!(self.kind, EntryType::Storage | EntryType::Root)
    }
}

/// Directory name ordering: shorter names first, then uppercase comparison.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let la = a.encode_utf16().count();
    let lb = b.encode_utf16().count();
    la.cmp(&lb).then_with(|| {
        a.chars()
            .flat_map(char::to_uppercase)
            .cmp(b.chars().flat_map(char::to_uppercase))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_names() {
        assert_eq!(compare_names("b", "aa"), Ordering::Less);
        assert_eq!(compare_names("Header-2", "header-2"), Ordering::Equal);
        assert_eq!(compare_names("Mobs{1}", "Mobs{2}"), Ordering::Less);
    }

    #[test]
    fn test_parse_entry() {
        let mut buf = [0u8; DIR_ENTRY_SIZE];
        for (i, u) in "properties".encode_utf16().enumerate() {
            buf[i * 2..i * 2 + 2].copy_from_slice(&u.to_le_bytes());
        }
        buf[DIR_NAME_LEN_OFFSET..DIR_NAME_LEN_OFFSET + 2].copy_from_slice(&22u16.to_le_bytes());
        buf[DIR_TYPE_OFFSET] = 2;
        buf[DIR_LEFT_OFFSET..DIR_LEFT_OFFSET + 4].copy_from_slice(&NOSTREAM.to_le_bytes());
        buf[DIR_START_SECTOR_OFFSET..DIR_START_SECTOR_OFFSET + 4].copy_from_slice(&7u32.to_le_bytes());
        buf[DIR_SIZE_OFFSET..DIR_SIZE_OFFSET + 8].copy_from_slice(&0xABCD_0000_0100u64.to_le_bytes());

        let e = DirEntry::parse(4, &buf, SECTOR_SHIFT_V3).unwrap();
        assert_eq!(e.name, "properties");
        assert!(e.is_stream());
        assert_eq!(e.left, NOSTREAM);
        assert_eq!(e.start_sector, 7);
        assert_eq!(e.size, 0x100);
    }
}
