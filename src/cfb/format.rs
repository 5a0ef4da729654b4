//! Compound File Binary constants and header layout.

/// Signature at the start of every compound file.
pub const CFB_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Size of the header structure (the first sector may be larger).
pub const HEADER_SIZE: usize = 512;

/// Offset of the minor/major version fields.
pub const MINOR_VERSION_OFFSET: usize = 0x18;
pub const MAJOR_VERSION_OFFSET: usize = 0x1A;

/// Offset of the byte order mark, always `0xFFFE`.
pub const BYTE_ORDER_OFFSET: usize = 0x1C;
pub const BYTE_ORDER_LE: u16 = 0xFFFE;

pub const SECTOR_SHIFT_OFFSET: usize = 0x1E;
pub const MINI_SECTOR_SHIFT_OFFSET: usize = 0x20;
pub const NUM_DIR_SECTORS_OFFSET: usize = 0x28;
pub const NUM_FAT_SECTORS_OFFSET: usize = 0x2C;
pub const DIR_START_OFFSET: usize = 0x30;
pub const MINI_CUTOFF_OFFSET: usize = 0x38;
pub const MINI_FAT_START_OFFSET: usize = 0x3C;
pub const NUM_MINI_FAT_SECTORS_OFFSET: usize = 0x40;
pub const DIFAT_START_OFFSET: usize = 0x44;
pub const NUM_DIFAT_SECTORS_OFFSET: usize = 0x48;
pub const HEADER_DIFAT_OFFSET: usize = 0x4C;

/// Number of DiFAT entries stored in the header.
pub const HEADER_DIFAT_COUNT: usize = 109;

/// Sector shift for version 3 files (512-byte sectors).
pub const SECTOR_SHIFT_V3: u16 = 9;
/// Sector shift for version 4 files (4096-byte sectors).
pub const SECTOR_SHIFT_V4: u16 = 12;
/// Mini sectors are always 64 bytes.
pub const MINI_SECTOR_SHIFT: u16 = 6;

/// Default stream size below which data lives in the mini stream.
pub const DEFAULT_MINI_CUTOFF: u32 = 4096;

// ============================================================================
// Special sector ids
// ============================================================================

/// Highest regular sector id.
pub const MAXREGSECT: u32 = 0xFFFF_FFFA;
pub const DIFSECT: u32 = 0xFFFF_FFFC;
pub const FATSECT: u32 = 0xFFFF_FFFD;
pub const ENDOFCHAIN: u32 = 0xFFFF_FFFE;
pub const FREESECT: u32 = 0xFFFF_FFFF;

/// Sibling/child id meaning "none".
pub const NOSTREAM: u32 = 0xFFFF_FFFF;

// ============================================================================
// Directory entries
// ============================================================================

pub const DIR_ENTRY_SIZE: usize = 128;
pub const DIR_NAME_SIZE: usize = 64;
pub const DIR_NAME_LEN_OFFSET: usize = 64;
pub const DIR_TYPE_OFFSET: usize = 66;
pub const DIR_COLOR_OFFSET: usize = 67;
pub const DIR_LEFT_OFFSET: usize = 68;
pub const DIR_RIGHT_OFFSET: usize = 72;
pub const DIR_CHILD_OFFSET: usize = 76;
pub const DIR_CLSID_OFFSET: usize = 80;
pub const DIR_START_SECTOR_OFFSET: usize = 116;
pub const DIR_SIZE_OFFSET: usize = 120;

/// Byte offset of a regular sector in the file.
#[inline]
pub const fn sector_offset(sector: u32, shift: u16) -> u64 {
    ((sector as u64) + 1) << shift
}

/// True for ids that end or mark a chain rather than point to data.
#[inline]
pub const fn is_chain_end(sector: u32) -> bool {
    sector > MAXREGSECT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_offset() {
        assert_eq!(sector_offset(0, SECTOR_SHIFT_V3), 512);
        assert_eq!(sector_offset(3, SECTOR_SHIFT_V3), 2048);
        assert_eq!(sector_offset(0, SECTOR_SHIFT_V4), 4096);
    }

    #[test]
    fn test_chain_end() {
        assert!(is_chain_end(ENDOFCHAIN));
        assert!(is_chain_end(FREESECT));
        assert!(!is_chain_end(MAXREGSECT));
        assert!(!is_chain_end(0));
    }
}
