//! Random-access byte sources for audio file parsing.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use parking_lot::Mutex;

use crate::cfb::StreamReader;
use crate::util::{Error, Result};

/// Source that can be read at arbitrary offsets.
pub trait ByteRangeReader {
    /// Total length in bytes.
    fn len(&self) -> u64;

    /// Read at `offset` into `buf`, returning the bytes copied. Short only at
    /// the end of the source.
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fill `buf` completely or fail with `UnexpectedEof`.
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let n = self.read_at(offset, buf)?;
        if n < buf.len() {
            return Err(Error::UnexpectedEof(offset + n as u64));
        }
        Ok(())
    }

    /// Read `len` bytes at `offset` into a new buffer.
    fn read_vec(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.try_reserve_exact(len)?;
        out.resize(len, 0);
        self.read_exact_at(offset, &mut out)?;
        Ok(out)
    }
}

/// In-memory bytes: descriptor summaries, loaded streams.
pub struct MemReader<'a>(pub &'a [u8]);

impl ByteRangeReader for MemReader<'_> {
    fn len(&self) -> u64 {
        self.0.len() as u64
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        if offset > self.0.len() as u64 {
            return Err(Error::UnexpectedEof(offset));
        }
        let src = &self.0[offset as usize..];
        let n = src.len().min(buf.len());
        buf[..n].copy_from_slice(&src[..n]);
        Ok(n)
    }
}

/// File read by seek + read.
pub struct FileReader {
    file: Mutex<File>,
    len: u64,
}

impl FileReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        let len = file.metadata()?.len();
        Ok(Self { file: Mutex::new(file), len })
    }
}

impl ByteRangeReader for FileReader {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;
        let mut done = 0;
        while done < buf.len() {
            match file.read(&mut buf[done..])? {
                0 => break,
                n => done += n,
            }
        }
        Ok(done)
    }
}

impl ByteRangeReader for StreamReader<'_> {
    fn len(&self) -> u64 {
        StreamReader::len(self)
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        StreamReader::read_at(self, offset, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mem_reader_short_read() {
        let r = MemReader(b"abcdef");
        let mut buf = [0u8; 4];
        assert_eq!(r.read_at(4, &mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ef");
        assert_eq!(r.read_at(6, &mut buf).unwrap(), 0);
        assert!(r.read_at(7, &mut buf).is_err());
        assert!(matches!(r.read_exact_at(4, &mut buf), Err(Error::UnexpectedEof(6))));
    }

    #[test]
    fn test_file_reader() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"0123456789").unwrap();
        tmp.flush().unwrap();

        let r = FileReader::open(tmp.path()).unwrap();
        assert_eq!(ByteRangeReader::len(&r), 10);
        assert_eq!(r.read_vec(3, 4).unwrap(), b"3456");
        assert!(r.read_vec(8, 4).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = FileReader::open("/definitely/not/here.wav").err().unwrap();
        assert!(matches!(err, Error::FileNotFound(_)));
    }
}
