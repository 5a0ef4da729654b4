//! Identifier types: AUID, MobID (UMID) and TimeStamp.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::util::{le_i16, le_u16, le_u32, slice_at, Result};

// ============================================================================
// Auid
// ============================================================================

/// 128-bit AAF unique identifier, stored as a little-endian GUID.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Auid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Auid {
    /// Size on disk.
    pub const SIZE: usize = 16;

    /// All-zero identifier.
    pub const NULL: Auid = Auid::new(0, 0, 0, [0; 8]);

    /// Build from its four GUID parts.
    pub const fn new(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self { data1, data2, data3, data4 }
    }

    /// Decode from the first 16 bytes of `buf`.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        let mut data4 = [0u8; 8];
        data4.copy_from_slice(slice_at(buf, 8, 8)?);
        Ok(Self {
            data1: le_u32(buf, 0)?,
            data2: le_u16(buf, 4)?,
            data3: le_u16(buf, 6)?,
            data4,
        })
    }

    /// Encode to the on-disk layout.
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[0..4].copy_from_slice(&self.data1.to_le_bytes());
        out[4..6].copy_from_slice(&self.data2.to_le_bytes());
        out[6..8].copy_from_slice(&self.data3.to_le_bytes());
        out[8..16].copy_from_slice(&self.data4);
        out
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }
}

impl fmt::Display for Auid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.data4;
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.data1, self.data2, self.data3, d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]
        )
    }
}

impl fmt::Debug for Auid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self)
    }
}

impl Serialize for Auid {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

// ============================================================================
// MobId
// ============================================================================

/// 32-byte SMPTE UMID identifying a Mob.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MobId(pub [u8; 32]);

impl MobId {
    /// Size on disk.
    pub const SIZE: usize = 32;

    /// Decode from the first 32 bytes of `buf`.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        let mut id = [0u8; 32];
        id.copy_from_slice(slice_at(buf, 0, 32)?);
        Ok(Self(id))
    }

    /// The material part of the UMID, as an AUID.
    pub fn material(&self) -> Auid {
        let mut data4 = [0u8; 8];
        data4.copy_from_slice(&self.0[24..32]);
        Auid {
            data1: u32::from_le_bytes([self.0[16], self.0[17], self.0[18], self.0[19]]),
            data2: u16::from_le_bytes([self.0[20], self.0[21]]),
            data3: u16::from_le_bytes([self.0[22], self.0[23]]),
            data4,
        }
    }

    /// Build a UMID with the standard SMPTE label around a material AUID.
    pub fn from_material(material: Auid) -> Self {
        const LABEL: [u8; 12] = [0x06, 0x0a, 0x2b, 0x34, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x0f, 0x00];
        let mut id = [0u8; 32];
        id[0..12].copy_from_slice(&LABEL);
        id[12] = 0x13;
        id[16..32].copy_from_slice(&material.to_bytes());
        Self(id)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl fmt::Display for MobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("urn:smpte:umid:")?;
        for (i, chunk) in self.0.chunks(4).enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            for b in chunk {
                write!(f, "{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for MobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for MobId {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

// ============================================================================
// TimeStamp
// ============================================================================

/// Calendar date and time, as stored in Mob and Identification objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
pub struct TimeStamp {
    pub year: i16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Hundredths of a second.
    pub fraction: u8,
}

impl TimeStamp {
    pub const SIZE: usize = 8;

    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        let b = slice_at(buf, 0, Self::SIZE)?;
        Ok(Self {
            year: le_i16(b, 0)?,
            month: b[2],
            day: b[3],
            hour: b[4],
            minute: b[5],
            second: b[6],
            fraction: b[7],
        })
    }

    /// `YYYY:MM:DD`, the BWF origination date layout.
    pub fn date_string(&self) -> String {
        format!("{:04}:{:02}:{:02}", self.year.max(0), self.month, self.day)
    }

    /// `HH:MM:SS`, the BWF origination time layout.
    pub fn time_string(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

impl fmt::Display for TimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}.{:02}", self.date_string(), self.time_string(), self.fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auid_bytes() {
        let id = Auid::new(0x0d010101, 0x0101, 0x3000, [0x06, 0x0e, 0x2b, 0x34, 0x02, 0x06, 0x01, 0x01]);
        let bytes = id.to_bytes();
        assert_eq!(&bytes[0..4], &[0x01, 0x01, 0x01, 0x0d]);
        assert_eq!(Auid::from_bytes(&bytes).unwrap(), id);
        assert_eq!(id.to_string(), "0d010101-0101-3000-060e-2b3402060101");
        assert!(Auid::from_bytes(&bytes[..10]).is_err());
    }

    #[test]
    fn test_mobid_material() {
        let material = Auid::new(0x12345678, 0x9abc, 0xdef0, [1, 2, 3, 4, 5, 6, 7, 8]);
        let mob = MobId::from_material(material);
        assert_eq!(mob.material(), material);
        assert!(!mob.is_null());
        assert!(MobId::default().is_null());
        assert!(mob.to_string().starts_with("urn:smpte:umid:060a2b34."));
    }

    #[test]
    fn test_timestamp() {
        let ts = TimeStamp::from_bytes(&[0xe8, 0x07, 3, 9, 14, 5, 7, 50]).unwrap();
        assert_eq!(ts.year, 2024);
        assert_eq!(ts.date_string(), "2024:03:09");
        assert_eq!(ts.time_string(), "14:05:07");
    }
}
