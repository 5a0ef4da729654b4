//! Compound file reader.
//!
//! Reads the header, sector allocation tables and directory eagerly; stream
//! contents are read on demand, either whole or through a [`StreamReader`].

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use memmap2::Mmap;
use parking_lot::RwLock;
use tracing::{debug, warn};

use super::format::*;
use super::node::{compare_names, DirEntry, EntryType, NodeId};
use crate::util::{le_u16, le_u32, Error, Result};

/// Compound file opened for reading.
pub struct CfbFile {
    inner: SourceInner,
    size: u64,
    sector_shift: u16,
    mini_cutoff: u32,
    fat: Vec<u32>,
    mini_fat: Vec<u32>,
    nodes: Vec<DirEntry>,
    mini_stream: Vec<u8>,
}

enum SourceInner {
    /// Memory-mapped file
    Mmap(Mmap),
    /// Buffered file access
    File(Arc<RwLock<File>>),
    /// In-memory image
    Memory(Vec<u8>),
}

impl CfbFile {
    /// Open a file for reading with memory mapping.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_opts(path, true)
    }

    /// Open a file with optional memory mapping.
    pub fn open_opts(path: impl AsRef<Path>, use_mmap: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;

        let size = file.metadata()?.len();
        if size < HEADER_SIZE as u64 {
            return Err(Error::UnexpectedEof(size));
        }

        let inner = if use_mmap && cfg!(feature = "mmap") {
            // Safety: the map is read-only and lives as long as `self`.
            let mmap = unsafe { Mmap::map(&file) }.map_err(|e| Error::MmapFailed(e.to_string()))?;
            SourceInner::Mmap(mmap)
        } else {
            SourceInner::File(Arc::new(RwLock::new(file)))
        };

        Self::load(inner, size)
    }

    /// Read a compound file held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let size = data.len() as u64;
        if size < HEADER_SIZE as u64 {
            return Err(Error::UnexpectedEof(size));
        }
        Self::load(SourceInner::Memory(data), size)
    }

    fn load(inner: SourceInner, size: u64) -> Result<Self> {
        let mut cfb = Self {
            inner,
            size,
            sector_shift: SECTOR_SHIFT_V3,
            mini_cutoff: DEFAULT_MINI_CUTOFF,
            fat: Vec::new(),
            mini_fat: Vec::new(),
            nodes: Vec::new(),
            mini_stream: Vec::new(),
        };

        let mut header = [0u8; HEADER_SIZE];
        cfb.read_into(0, &mut header)?;
        let h = Header::parse(&header)?;
        cfb.sector_shift = h.sector_shift;
        cfb.mini_cutoff = h.mini_cutoff;

        let difat = cfb.read_difat(&header, &h)?;
        cfb.fat = cfb.read_fat(&difat)?;
        cfb.mini_fat = cfb.read_table(h.mini_fat_start)?;
        cfb.nodes = cfb.read_directory(h.dir_start)?;

        let root = cfb.nodes.first().ok_or_else(|| Error::invalid("compound file has no root entry"))?;
        if root.kind != EntryType::Root {
            return Err(Error::invalid("first directory entry is not the root"));
        }
        let (mini_start, mini_size) = (root.start_sector, root.size);
        cfb.mini_stream = cfb.read_regular_chain(mini_start, mini_size)?;

        debug!(
            "compound file: {} bytes, sector size {}, {} FAT entries, {} directory entries",
            cfb.size,
            cfb.sector_size(),
            cfb.fat.len(),
            cfb.nodes.len()
        );
        Ok(cfb)
    }

    // ========================================================================
    // Raw access
    // ========================================================================

    /// Get the total file size.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn sector_size(&self) -> usize {
        1 << self.sector_shift
    }

    /// Streams smaller than this live in the mini stream.
    #[inline]
    pub fn mini_cutoff(&self) -> u32 {
        self.mini_cutoff
    }

    /// Read bytes into an existing buffer.
    fn read_into(&self, pos: u64, buf: &mut [u8]) -> Result<()> {
        let end = pos
            .checked_add(buf.len() as u64)
            .ok_or(Error::UnexpectedEof(u64::MAX))?;
        if end > self.size {
            return Err(Error::UnexpectedEof(end));
        }

        match &self.inner {
            SourceInner::Mmap(mmap) => {
                buf.copy_from_slice(&mmap[pos as usize..end as usize]);
            }
            SourceInner::Memory(data) => {
                buf.copy_from_slice(&data[pos as usize..end as usize]);
            }
            SourceInner::File(file) => {
                let mut f = file.write();
                f.seek(SeekFrom::Start(pos))?;
                f.read_exact(buf)?;
            }
        }
        Ok(())
    }

    /// Read `buf.len()` bytes of sector data starting `offset` bytes into `sector`.
    fn read_sector_part(&self, sector: u32, offset: usize, buf: &mut [u8]) -> Result<()> {
        let pos = sector_offset(sector, self.sector_shift) + offset as u64;
        self.read_into(pos, buf)
    }

    /// Read one whole sector. A final sector cut short by the file end is zero-padded.
    fn read_sector(&self, sector: u32) -> Result<Vec<u8>> {
        let pos = sector_offset(sector, self.sector_shift);
        if pos >= self.size {
            return Err(Error::UnexpectedEof(pos));
        }
        let mut buf = vec![0u8; self.sector_size()];
        let avail = ((self.size - pos) as usize).min(buf.len());
        self.read_into(pos, &mut buf[..avail])?;
        Ok(buf)
    }

    // ========================================================================
    // Allocation tables
    // ========================================================================

    fn read_difat(&self, header: &[u8], h: &Header) -> Result<Vec<u32>> {
        let mut difat = Vec::with_capacity(HEADER_DIFAT_COUNT);
        for i in 0..HEADER_DIFAT_COUNT {
            let s = le_u32(header, HEADER_DIFAT_OFFSET + i * 4)?;
            if !is_chain_end(s) {
                difat.push(s);
            }
        }

        let per_sector = self.sector_size() / 4 - 1;
        let mut next = h.difat_start;
        let mut visited = 0u32;
        while !is_chain_end(next) {
            if visited > h.num_difat_sectors.max(1) * 2 + 64 {
                return Err(Error::invalid("DiFAT chain does not terminate"));
            }
            visited += 1;
            let sector = self.read_sector(next)?;
            for i in 0..per_sector {
                let s = le_u32(&sector, i * 4)?;
                if !is_chain_end(s) {
                    difat.push(s);
                }
            }
            next = le_u32(&sector, per_sector * 4)?;
        }
        Ok(difat)
    }

    fn read_fat(&self, difat: &[u32]) -> Result<Vec<u32>> {
        let per_sector = self.sector_size() / 4;
        let mut fat = Vec::with_capacity(difat.len() * per_sector);
        for &s in difat {
            let sector = self.read_sector(s)?;
            for i in 0..per_sector {
                fat.push(le_u32(&sector, i * 4)?);
            }
        }
        Ok(fat)
    }

    /// Read a table of u32 entries stored in a regular sector chain.
    fn read_table(&self, start: u32) -> Result<Vec<u32>> {
        let chain = self.chain(start, &self.fat)?;
        let per_sector = self.sector_size() / 4;
        let mut table = Vec::with_capacity(chain.len() * per_sector);
        for s in chain {
            let sector = self.read_sector(s)?;
            for i in 0..per_sector {
                table.push(le_u32(&sector, i * 4)?);
            }
        }
        Ok(table)
    }

    fn read_directory(&self, start: u32) -> Result<Vec<DirEntry>> {
        let chain = self.chain(start, &self.fat)?;
        let per_sector = self.sector_size() / DIR_ENTRY_SIZE;
        let mut nodes = Vec::with_capacity(chain.len() * per_sector);
        for s in chain {
            let sector = self.read_sector(s)?;
            for i in 0..per_sector {
                let id = nodes.len() as NodeId;
                let raw = &sector[i * DIR_ENTRY_SIZE..(i + 1) * DIR_ENTRY_SIZE];
                nodes.push(DirEntry::parse(id, raw, self.sector_shift)?);
            }
        }
        Ok(nodes)
    }

    /// Follow a sector chain from `start` through `table`.
    fn chain(&self, start: u32, table: &[u32]) -> Result<Vec<u32>> {
        let mut out = Vec::new();
        let mut s = start;
        while !is_chain_end(s) {
            if out.len() >= table.len() {
                return Err(Error::invalid(format!("sector chain from {} does not terminate", start)));
            }
            out.push(s);
            s = *table
                .get(s as usize)
                .ok_or_else(|| Error::invalid(format!("sector {} outside allocation table", s)))?;
        }
        Ok(out)
    }

    fn read_regular_chain(&self, start: u32, size: u64) -> Result<Vec<u8>> {
        let chain = self.chain(start, &self.fat)?;
        let mut data = Vec::new();
        data.try_reserve_exact(size as usize)?;
        let sector_size = self.sector_size();
        for s in chain {
            if data.len() as u64 >= size {
                break;
            }
            let take = (size as usize - data.len()).min(sector_size);
            let start = data.len();
            data.resize(start + take, 0);
            self.read_sector_part(s, 0, &mut data[start..])?;
        }
        if (data.len() as u64) < size {
            warn!("stream chain from sector {} is shorter than its size {}", start, size);
        }
        Ok(data)
    }

    fn read_mini_chain(&self, start: u32, size: u64) -> Result<Vec<u8>> {
        let chain = self.chain(start, &self.mini_fat)?;
        let mini_size = 1usize << MINI_SECTOR_SHIFT;
        let mut data = Vec::with_capacity(size as usize);
        for s in chain {
            if data.len() as u64 >= size {
                break;
            }
            let take = (size as usize - data.len()).min(mini_size);
            let pos = s as usize * mini_size;
            let piece = self
                .mini_stream
                .get(pos..pos + take)
                .ok_or(Error::UnexpectedEof(pos as u64 + take as u64))?;
            data.extend_from_slice(piece);
        }
        Ok(data)
    }

    // ========================================================================
    // Directory
    // ========================================================================

    /// All directory entries, indexed by [`NodeId`].
    pub fn nodes(&self) -> &[DirEntry] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&DirEntry> {
        self.nodes.get(id as usize)
    }

    /// Root storage entry.
    pub fn root(&self) -> &DirEntry {
        // load() guarantees a root entry
        &self.nodes[0]
    }

    /// Children of a storage, in directory order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Some(parent) = self.node(id) else {
            return out;
        };

        // In-order walk of the sibling tree, bounded against cycles.
        let mut stack = Vec::new();
        let mut cur = parent.child;
        let mut steps = 0usize;
        while (cur != NOSTREAM || !stack.is_empty()) && steps <= self.nodes.len() * 2 {
            steps += 1;
            while let Some(n) = self.node(cur).filter(|_| cur != NOSTREAM) {
                stack.push(cur);
                cur = n.left;
                if stack.len() > self.nodes.len() {
                    return out;
                }
            }
            let Some(top) = stack.pop() else { break };
            out.push(top);
            cur = self.nodes[top as usize].right;
        }
        out
    }

    /// Look up a child of `id` by name (case-insensitive).
    pub fn child_by_name(&self, id: NodeId, name: &str) -> Option<&DirEntry> {
        let parent = self.node(id)?;
        let mut cur = parent.child;
        let mut steps = 0usize;
        while cur != NOSTREAM && steps <= self.nodes.len() {
            steps += 1;
            let node = self.node(cur)?;
            match compare_names(name, &node.name) {
                std::cmp::Ordering::Equal => return Some(node),
                std::cmp::Ordering::Less => cur = node.left,
                std::cmp::Ordering::Greater => cur = node.right,
            }
        }

        // Some writers do not keep the sibling tree ordered.
        self.children(id)
            .into_iter()
            .filter_map(|c| self.node(c))
            .find(|n| compare_names(name, &n.name).is_eq())
    }

    /// Resolve a `/`-separated path from the root.
    pub fn node_by_path(&self, path: &str) -> Option<&DirEntry> {
        let mut node = self.root();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            node = self.child_by_name(node.id, part)?;
        }
        Some(node)
    }

    // ========================================================================
    // Streams
    // ========================================================================

    /// Whole content of the stream at `path`.
    pub fn get_stream_by_path(&self, path: &str) -> Result<Vec<u8>> {
        let node = self
            .node_by_path(path)
            .ok_or_else(|| Error::ObjectNotFound(format!("stream '{}'", path)))?;
        self.get_stream(node.id)
    }

    /// Read the whole content of a stream entry.
    pub fn get_stream(&self, id: NodeId) -> Result<Vec<u8>> {
        let node = self
            .node(id)
            .ok_or_else(|| Error::ObjectNotFound(format!("directory entry {}", id)))?;
        if !node.is_stream() {
            return Err(Error::invalid(format!("'{}' is not a stream", node.name)));
        }
        if node.size < self.mini_cutoff as u64 {
            self.read_mini_chain(node.start_sector, node.size)
        } else {
            self.read_regular_chain(node.start_sector, node.size)
        }
    }

    /// Byte-range reader over a stream, without loading it.
    pub fn stream_reader(&self, id: NodeId) -> Result<StreamReader<'_>> {
        let node = self
            .node(id)
            .ok_or_else(|| Error::ObjectNotFound(format!("directory entry {}", id)))?;
        if !node.is_stream() {
            return Err(Error::invalid(format!("'{}' is not a stream", node.name)));
        }
        let mini = node.size < self.mini_cutoff as u64;
        let sectors = if mini {
            self.chain(node.start_sector, &self.mini_fat)?
        } else {
            self.chain(node.start_sector, &self.fat)?
        };
        Ok(StreamReader { cfb: self, sectors, mini, size: node.size })
    }
}

// ============================================================================
// Header
// ============================================================================

struct Header {
    sector_shift: u16,
    mini_cutoff: u32,
    dir_start: u32,
    mini_fat_start: u32,
    difat_start: u32,
    num_difat_sectors: u32,
}

impl Header {
    fn parse(buf: &[u8]) -> Result<Self> {
        if buf[..8] != CFB_SIGNATURE {
            return Err(Error::InvalidSignature);
        }

        let byte_order = le_u16(buf, BYTE_ORDER_OFFSET)?;
        if byte_order != BYTE_ORDER_LE {
            return Err(Error::invalid(format!("unexpected byte order mark 0x{:04x}", byte_order)));
        }

        let major = le_u16(buf, MAJOR_VERSION_OFFSET)?;
        let sector_shift = le_u16(buf, SECTOR_SHIFT_OFFSET)?;
        if sector_shift != SECTOR_SHIFT_V3 && sector_shift != SECTOR_SHIFT_V4 {
            return Err(Error::UnsupportedVersion(major));
        }

        let mini_shift = le_u16(buf, MINI_SECTOR_SHIFT_OFFSET)?;
        if mini_shift != MINI_SECTOR_SHIFT {
            return Err(Error::invalid(format!("unsupported mini sector shift {}", mini_shift)));
        }

        Ok(Self {
            sector_shift,
            mini_cutoff: le_u32(buf, MINI_CUTOFF_OFFSET)?,
            dir_start: le_u32(buf, DIR_START_OFFSET)?,
            mini_fat_start: le_u32(buf, MINI_FAT_START_OFFSET)?,
            difat_start: le_u32(buf, DIFAT_START_OFFSET)?,
            num_difat_sectors: le_u32(buf, NUM_DIFAT_SECTORS_OFFSET)?,
        })
    }
}

// ============================================================================
// StreamReader
// ============================================================================

/// Lazy reader over one stream's sectors.
pub struct StreamReader<'a> {
    cfb: &'a CfbFile,
    sectors: Vec<u32>,
    mini: bool,
    size: u64,
}

impl StreamReader<'_> {
    /// Stream length in bytes.
    #[inline]
    pub fn len(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Read at `offset`, returning the number of bytes copied (0 at end of stream).
    pub fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        if offset >= self.size {
            return Ok(0);
        }
        let want = ((self.size - offset) as usize).min(buf.len());
        let shift = if self.mini { MINI_SECTOR_SHIFT } else { self.cfb.sector_shift };
        let sector_size = 1usize << shift;

        let mut done = 0usize;
        while done < want {
            let pos = offset + done as u64;
            let index = (pos >> shift) as usize;
            let within = (pos as usize) & (sector_size - 1);
            let take = (sector_size - within).min(want - done);
            let sector = *self
                .sectors
                .get(index)
                .ok_or(Error::UnexpectedEof(pos))?;

            let dst = &mut buf[done..done + take];
            if self.mini {
                let start = sector as usize * sector_size + within;
                let src = self
                    .cfb
                    .mini_stream
                    .get(start..start + take)
                    .ok_or(Error::UnexpectedEof(start as u64))?;
                dst.copy_from_slice(src);
            } else {
                self.cfb.read_sector_part(sector, within, dst)?;
            }
            done += take;
        }
        Ok(done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal version 3 file: header, one FAT sector, one directory sector
    /// and one data sector holding a 600-byte stream.
    fn tiny_file() -> Vec<u8> {
        let mut file = vec![0u8; 512 * 5];
        let h = &mut file[..512];
        h[..8].copy_from_slice(&CFB_SIGNATURE);
        h[MINOR_VERSION_OFFSET..MINOR_VERSION_OFFSET + 2].copy_from_slice(&0x3Eu16.to_le_bytes());
        h[MAJOR_VERSION_OFFSET..MAJOR_VERSION_OFFSET + 2].copy_from_slice(&3u16.to_le_bytes());
        h[BYTE_ORDER_OFFSET..BYTE_ORDER_OFFSET + 2].copy_from_slice(&BYTE_ORDER_LE.to_le_bytes());
        h[SECTOR_SHIFT_OFFSET..SECTOR_SHIFT_OFFSET + 2].copy_from_slice(&9u16.to_le_bytes());
        h[MINI_SECTOR_SHIFT_OFFSET..MINI_SECTOR_SHIFT_OFFSET + 2].copy_from_slice(&6u16.to_le_bytes());
        h[NUM_FAT_SECTORS_OFFSET..NUM_FAT_SECTORS_OFFSET + 4].copy_from_slice(&1u32.to_le_bytes());
        h[DIR_START_OFFSET..DIR_START_OFFSET + 4].copy_from_slice(&1u32.to_le_bytes());
        h[MINI_CUTOFF_OFFSET..MINI_CUTOFF_OFFSET + 4].copy_from_slice(&DEFAULT_MINI_CUTOFF.to_le_bytes());
        h[MINI_FAT_START_OFFSET..MINI_FAT_START_OFFSET + 4].copy_from_slice(&ENDOFCHAIN.to_le_bytes());
        h[DIFAT_START_OFFSET..DIFAT_START_OFFSET + 4].copy_from_slice(&ENDOFCHAIN.to_le_bytes());
        for i in 0..HEADER_DIFAT_COUNT {
            let v = if i == 0 { 0 } else { FREESECT };
            h[HEADER_DIFAT_OFFSET + i * 4..HEADER_DIFAT_OFFSET + i * 4 + 4].copy_from_slice(&v.to_le_bytes());
        }

        // FAT in sector 0: [FATSECT, ENDOFCHAIN (dir), 3, ENDOFCHAIN (data), FREE...]
        let fat = &mut file[512..1024];
        let entries = [FATSECT, ENDOFCHAIN, 3, ENDOFCHAIN];
        for (i, v) in entries.iter().enumerate() {
            fat[i * 4..i * 4 + 4].copy_from_slice(&v.to_le_bytes());
        }
        for i in entries.len()..128 {
            fat[i * 4..i * 4 + 4].copy_from_slice(&FREESECT.to_le_bytes());
        }

        // Directory in sector 1.
        let dir = &mut file[1024..1536];
        write_entry(&mut dir[0..128], "Root Entry", 5, NOSTREAM, NOSTREAM, 1, ENDOFCHAIN, 0);
        write_entry(&mut dir[128..256], "data", 2, NOSTREAM, NOSTREAM, NOSTREAM, 2, 600);
        for i in 2..4 {
            let e = &mut dir[i * 128..(i + 1) * 128];
            for off in [DIR_LEFT_OFFSET, DIR_RIGHT_OFFSET, DIR_CHILD_OFFSET] {
                e[off..off + 4].copy_from_slice(&NOSTREAM.to_le_bytes());
            }
        }

        // Stream body in sectors 2 and 3.
        for i in 0..600 {
            file[1536 + i] = (i % 251) as u8;
        }
        file
    }

    #[allow(clippy::too_many_arguments)]
    fn write_entry(e: &mut [u8], name: &str, kind: u8, left: u32, right: u32, child: u32, start: u32, size: u64) {
        let units: Vec<u16> = name.encode_utf16().chain(std::iter::once(0)).collect();
        for (i, u) in units.iter().enumerate() {
            e[i * 2..i * 2 + 2].copy_from_slice(&u.to_le_bytes());
        }
        e[DIR_NAME_LEN_OFFSET..DIR_NAME_LEN_OFFSET + 2].copy_from_slice(&((units.len() * 2) as u16).to_le_bytes());
        e[DIR_TYPE_OFFSET] = kind;
        e[DIR_LEFT_OFFSET..DIR_LEFT_OFFSET + 4].copy_from_slice(&left.to_le_bytes());
        e[DIR_RIGHT_OFFSET..DIR_RIGHT_OFFSET + 4].copy_from_slice(&right.to_le_bytes());
        e[DIR_CHILD_OFFSET..DIR_CHILD_OFFSET + 4].copy_from_slice(&child.to_le_bytes());
        e[DIR_START_SECTOR_OFFSET..DIR_START_SECTOR_OFFSET + 4].copy_from_slice(&start.to_le_bytes());
        e[DIR_SIZE_OFFSET..DIR_SIZE_OFFSET + 8].copy_from_slice(&size.to_le_bytes());
    }

    #[test]
    fn test_read_tiny_file() -> crate::util::Result<()> {
        let cfb = CfbFile::from_bytes(tiny_file())?;
        assert_eq!(cfb.sector_size(), 512);
        assert_eq!(cfb.root().name, "Root Entry");
        assert_eq!(cfb.children(0), vec![1]);

        let node = cfb.child_by_name(0, "DATA").expect("case-insensitive lookup");
        assert_eq!(node.size, 600);
        assert!(cfb.node_by_path("/data").is_some());
        assert!(cfb.node_by_path("/missing").is_none());
        assert_eq!(cfb.get_stream_by_path("/data")?.len(), 600);
        assert!(matches!(cfb.get_stream_by_path("/missing"), Err(Error::ObjectNotFound(_))));

        let data = cfb.get_stream(node.id)?;
        assert_eq!(data.len(), 600);
        assert_eq!(data[599], (599 % 251) as u8);

        let reader = cfb.stream_reader(node.id)?;
        let mut buf = [0u8; 32];
        assert_eq!(reader.read_at(500, &mut buf)?, 32);
        assert_eq!(buf[12], (512 % 251) as u8);
        assert_eq!(reader.read_at(590, &mut buf)?, 10);
        assert_eq!(reader.read_at(600, &mut buf)?, 0);
        Ok(())
    }

    #[test]
    fn test_bad_signature() {
        let mut file = tiny_file();
        file[0] = 0;
        assert!(matches!(CfbFile::from_bytes(file), Err(Error::InvalidSignature)));
    }

    #[test]
    fn test_cyclic_chain() {
        let mut file = tiny_file();
        // data sector 3 points back to 2
        file[512 + 12..512 + 16].copy_from_slice(&2u32.to_le_bytes());
        let cfb = CfbFile::from_bytes(file).unwrap();
        assert!(cfb.get_stream(1).is_err());
    }

    #[test]
    fn test_open_missing_file() {
        let err = CfbFile::open("/nonexistent/file.aaf").err().unwrap();
        assert!(matches!(err, Error::FileNotFound(_)));
    }
}
