//! Typed interpretation of raw property values.
//!
//! The stored form of a property is the only thing trusted: class-declared
//! types vary between writers, so the caller names the type it expects and
//! the bytes are validated against it.

use crate::core::defs::type_id;
use crate::core::{Auid, MobId, Rational, TimeStamp};
use crate::util::{
    is_utf16_nul_terminated, le_i16, le_i32, le_i64, le_u16, le_u32, le_u64, slice_at, utf16le_to_string,
    Error, Result,
};

use super::object::{ObjectId, Property, PropertyData, StoredForm, WeakRef};

/// Value types a property can be read as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AafType {
    Boolean,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    /// Edit-unit position (Int64).
    Position,
    /// Edit-unit length (Int64).
    Length,
    Rational,
    TimeStamp,
    VersionType,
    ProductVersion,
    Auid,
    MobId,
    String,
    /// Variable array of UInt32 (channel ids, slot ids).
    UInt32Array,
    /// Opaque bytes, any size.
    Bytes,
    /// Name of a data stream.
    Stream,
    StrongRef,
    StrongRefList,
    WeakRef,
    /// Type-tagged value.
    Indirect,
}

impl AafType {
    /// Fixed encoded size, if the type has one.
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            AafType::Boolean | AafType::Int8 | AafType::UInt8 => Some(1),
            AafType::Int16 | AafType::UInt16 | AafType::VersionType => Some(2),
            AafType::Int32 | AafType::UInt32 => Some(4),
            AafType::Int64
            | AafType::UInt64
            | AafType::Position
            | AafType::Length
            | AafType::Rational
            | AafType::TimeStamp => Some(8),
            AafType::Auid => Some(16),
            AafType::MobId => Some(32),
            _ => None,
        }
    }

    /// Type definition id, used to check Indirect values.
    pub fn type_id(self) -> Option<Auid> {
        Some(match self {
            AafType::Boolean => type_id::BOOLEAN,
            AafType::Int8 => type_id::INT8,
            AafType::UInt8 => type_id::UINT8,
            AafType::Int16 => type_id::INT16,
            AafType::UInt16 => type_id::UINT16,
            AafType::Int32 => type_id::INT32,
            AafType::UInt32 => type_id::UINT32,
            AafType::Int64 => type_id::INT64,
            AafType::UInt64 => type_id::UINT64,
            AafType::Position => type_id::POSITION,
            AafType::Length => type_id::LENGTH,
            AafType::Rational => type_id::RATIONAL,
            AafType::TimeStamp => type_id::TIME_STAMP,
            AafType::Auid => type_id::AUID,
            AafType::MobId => type_id::MOB_ID,
            AafType::String => type_id::STRING,
            AafType::Indirect => type_id::INDIRECT,
            _ => return None,
        })
    }

    /// Stored forms a property of this type may use.
    fn accepts(self, form: StoredForm) -> bool {
        match self {
            AafType::StrongRef => form == StoredForm::StrongRef,
            AafType::StrongRefList => matches!(form, StoredForm::StrongRefSet | StoredForm::StrongRefVector),
            AafType::WeakRef => form == StoredForm::WeakRef,
            AafType::Stream => form == StoredForm::DataStream,
            _ => matches!(form, StoredForm::Data | StoredForm::UniqueObjectId),
        }
    }
}

/// Product version record of Identification objects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ProductVersion {
    pub major: u16,
    pub minor: u16,
    pub tertiary: u16,
    pub patch_level: u16,
    pub release_type: u8,
}

/// Decoded property value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Boolean(bool),
    Int(i64),
    UInt(u64),
    Rational(Rational),
    TimeStamp(TimeStamp),
    Version(i8, i8),
    ProductVersion(ProductVersion),
    Auid(Auid),
    MobId(MobId),
    String(String),
    UInt32Array(Vec<u32>),
    Bytes(Vec<u8>),
    Stream(String),
    Object(ObjectId),
    Objects(Vec<ObjectId>),
    WeakRef(WeakRef),
    Indirect { type_id: Auid, bytes: Vec<u8> },
}

/// Decode `prop` as `ty`.
pub fn decode(prop: &Property, ty: AafType) -> Result<Value> {
    if !ty.accepts(prop.form) {
        return Err(Error::TypeMismatch {
            expected: format!("{:?}", ty),
            actual: format!("{:?}", prop.form),
        });
    }

    let bytes = match &prop.data {
        PropertyData::Object(id) if ty == AafType::StrongRef => return Ok(Value::Object(*id)),
        PropertyData::List(list) if ty == AafType::StrongRefList => return Ok(Value::Objects(list.items.clone())),
        PropertyData::Raw(bytes) => bytes.as_slice(),
        _ => return Err(Error::invalid(format!("unresolved reference in property 0x{:04x}", prop.pid))),
    };

    decode_bytes(bytes, ty)
}

/// Decode raw value bytes as `ty`.
pub fn decode_bytes(bytes: &[u8], ty: AafType) -> Result<Value> {
    if let Some(size) = ty.fixed_size() {
        if bytes.len() != size {
            return Err(Error::TypeMismatch {
                expected: format!("{:?} ({} bytes)", ty, size),
                actual: format!("{} bytes", bytes.len()),
            });
        }
    }

    Ok(match ty {
        AafType::Boolean => Value::Boolean(bytes[0] != 0),
        AafType::Int8 => Value::Int(bytes[0] as i8 as i64),
        AafType::UInt8 => Value::UInt(bytes[0] as u64),
        AafType::Int16 => Value::Int(le_i16(bytes, 0)? as i64),
        AafType::UInt16 => Value::UInt(le_u16(bytes, 0)? as u64),
        AafType::Int32 => Value::Int(le_i32(bytes, 0)? as i64),
        AafType::UInt32 => Value::UInt(le_u32(bytes, 0)? as u64),
        AafType::Int64 | AafType::Position | AafType::Length => Value::Int(le_i64(bytes, 0)?),
        AafType::UInt64 => Value::UInt(le_u64(bytes, 0)?),
        AafType::Rational => Value::Rational(Rational::from_bytes(bytes)?),
        AafType::TimeStamp => Value::TimeStamp(TimeStamp::from_bytes(bytes)?),
        AafType::VersionType => Value::Version(bytes[0] as i8, bytes[1] as i8),
        AafType::ProductVersion => {
            if bytes.len() != 9 && bytes.len() != 10 {
                return Err(Error::TypeMismatch {
                    expected: "ProductVersion (9 or 10 bytes)".into(),
                    actual: format!("{} bytes", bytes.len()),
                });
            }
            Value::ProductVersion(ProductVersion {
                major: le_u16(bytes, 0)?,
                minor: le_u16(bytes, 2)?,
                tertiary: le_u16(bytes, 4)?,
                patch_level: le_u16(bytes, 6)?,
                release_type: bytes[8],
            })
        }
        AafType::Auid => Value::Auid(Auid::from_bytes(bytes)?),
        AafType::MobId => Value::MobId(MobId::from_bytes(bytes)?),
        AafType::String => {
            if !is_utf16_nul_terminated(bytes) {
                return Err(Error::invalid("string is not a NUL-terminated UTF-16 value"));
            }
            Value::String(utf16le_to_string(bytes))
        }
        AafType::UInt32Array => {
            if bytes.len() % 4 != 0 {
                return Err(Error::invalid("UInt32 array size is not a multiple of 4"));
            }
            Value::UInt32Array(bytes.chunks_exact(4).map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]])).collect())
        }
        AafType::Bytes => Value::Bytes(bytes.to_vec()),
        // Data streams carry a byte order tag before the stream name.
        AafType::Stream => Value::Stream(utf16le_to_string(slice_at(bytes, 1, bytes.len().saturating_sub(1))?)),
        AafType::WeakRef => Value::WeakRef(WeakRef::parse(bytes)?),
        AafType::Indirect => {
            // byte order tag, type id, value
            let type_id = Auid::from_bytes(slice_at(bytes, 1, 16)?)?;
            Value::Indirect { type_id, bytes: slice_at(bytes, 17, bytes.len().saturating_sub(17))?.to_vec() }
        }
        AafType::StrongRef | AafType::StrongRefList => {
            return Err(Error::invalid("reference values cannot be decoded from bytes"));
        }
    })
}

// ============================================================================
// Typed extraction
// ============================================================================

/// Rust types that can be read from a property.
pub trait FromValue: Sized {
    /// Type the raw bytes are decoded as.
    const TYPE: AafType;

    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! from_int {
    ($t:ty, $aaf:ident, $variant:ident) => {
        impl FromValue for $t {
            const TYPE: AafType = AafType::$aaf;

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => <$t>::try_from(v).ok(),
                    _ => None,
                }
            }
        }
    };
}

from_int!(u8, UInt8, UInt);
from_int!(u16, UInt16, UInt);
from_int!(u32, UInt32, UInt);
from_int!(u64, UInt64, UInt);
from_int!(i8, Int8, Int);
from_int!(i16, Int16, Int);
from_int!(i32, Int32, Int);
from_int!(i64, Int64, Int);

macro_rules! from_variant {
    ($t:ty, $aaf:ident, $variant:ident) => {
        impl FromValue for $t {
            const TYPE: AafType = AafType::$aaf;

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

from_variant!(bool, Boolean, Boolean);
from_variant!(Rational, Rational, Rational);
from_variant!(TimeStamp, TimeStamp, TimeStamp);
from_variant!(ProductVersion, ProductVersion, ProductVersion);
from_variant!(Auid, Auid, Auid);
from_variant!(MobId, MobId, MobId);
from_variant!(String, String, String);
from_variant!(Vec<u32>, UInt32Array, UInt32Array);
from_variant!(WeakRef, WeakRef, WeakRef);
