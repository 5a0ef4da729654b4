//! AAF object layer.
//!
//! - [`AafFile`] - opened file: object arena, dictionary, navigation
//! - [`Dictionary`] - classes and property definitions
//! - [`Object`] / [`Property`] - raw objects from the compound file
//! - [`AafType`] / [`Value`] - typed property decoding

mod classes;
mod dictionary;
mod file;
mod object;
mod value;

pub use dictionary::{ClassDef, Dictionary, PropertyDef};
pub use file::{AafFile, Identification};
pub use object::{
    parse_property_stream, IndexEntry, Object, ObjectId, ObjectList, Objects, Property, PropertyData, StoredForm,
    WeakRef, PROPERTIES_LITTLE_ENDIAN, PROPERTIES_STREAM,
};
pub use value::{decode, decode_bytes, AafType, FromValue, ProductVersion, Value};
