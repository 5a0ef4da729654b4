//! AAF objects as stored in the compound file.
//!
//! Every object is a storage whose `properties` stream lists its
//! properties. Strong references name child storages; strong reference
//! sets and vectors name an index stream plus one storage per member.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::cfb::{CfbFile, NodeId};
use crate::core::Auid;
use crate::util::{le_u16, le_u32, slice_at, utf16le_to_string, Error, Result};

/// Name of the property stream inside every object storage.
pub const PROPERTIES_STREAM: &str = "properties";

/// Byte order tag of little-endian property streams ('L').
pub const PROPERTIES_LITTLE_ENDIAN: u8 = 0x4C;

const PROPERTY_HEADER_SIZE: usize = 4;
const PROPERTY_ENTRY_SIZE: usize = 6;
const VECTOR_INDEX_HEADER_SIZE: usize = 12;
const SET_INDEX_HEADER_SIZE: usize = 15;

const MAX_DEPTH: usize = 256;

/// Handle of an object in [`Objects`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u32);

impl ObjectId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ============================================================================
// Stored forms
// ============================================================================

/// How a property value is stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoredForm {
    Data,
    DataStream,
    StrongRef,
    StrongRefVector,
    StrongRefSet,
    WeakRef,
    WeakRefVector,
    WeakRefSet,
    WeakRefStoredObjectId,
    UniqueObjectId,
    OpaqueStream,
    Unknown(u16),
}

impl StoredForm {
    pub fn from_u16(v: u16) -> Self {
        match v {
            0x82 => StoredForm::Data,
            0x42 => StoredForm::DataStream,
            0x22 => StoredForm::StrongRef,
            0x32 => StoredForm::StrongRefVector,
            0x3A => StoredForm::StrongRefSet,
            0x02 => StoredForm::WeakRef,
            0x12 => StoredForm::WeakRefVector,
            0x1A => StoredForm::WeakRefSet,
            0x03 => StoredForm::WeakRefStoredObjectId,
            0x86 => StoredForm::UniqueObjectId,
            0x40 => StoredForm::OpaqueStream,
            other => StoredForm::Unknown(other),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            StoredForm::Data => 0x82,
            StoredForm::DataStream => 0x42,
            StoredForm::StrongRef => 0x22,
            StoredForm::StrongRefVector => 0x32,
            StoredForm::StrongRefSet => 0x3A,
            StoredForm::WeakRef => 0x02,
            StoredForm::WeakRefVector => 0x12,
            StoredForm::WeakRefSet => 0x1A,
            StoredForm::WeakRefStoredObjectId => 0x03,
            StoredForm::UniqueObjectId => 0x86,
            StoredForm::OpaqueStream => 0x40,
            StoredForm::Unknown(v) => v,
        }
    }
}

// ============================================================================
// Objects and properties
// ============================================================================

/// Index entry of a set/vector member.
#[derive(Clone, Debug, Default)]
pub struct IndexEntry {
    pub local_key: u32,
    pub ref_count: u32,
    /// Unique identification bytes (sets only).
    pub identification: Vec<u8>,
}

/// Members of a strong reference set or vector.
#[derive(Clone, Debug, Default)]
pub struct ObjectList {
    pub is_set: bool,
    pub entry_count: u32,
    pub first_free_key: u32,
    pub last_free_key: u32,
    /// Property holding each member's unique identifier (sets only).
    pub identification_pid: u16,
    pub identification_size: u8,
    /// Members in index order.
    pub items: Vec<ObjectId>,
}

/// Property payload.
#[derive(Clone, Debug)]
pub enum PropertyData {
    /// Raw value bytes.
    Raw(Vec<u8>),
    /// Resolved strong reference.
    Object(ObjectId),
    /// Resolved strong reference set or vector.
    List(ObjectList),
}

/// One property of an object.
#[derive(Clone, Debug)]
pub struct Property {
    pub pid: u16,
    pub form: StoredForm,
    pub data: PropertyData,
}

impl Property {
    pub fn raw(&self) -> Option<&[u8]> {
        match &self.data {
            PropertyData::Raw(b) => Some(b),
            _ => None,
        }
    }
}

/// An object loaded from the file.
#[derive(Clone, Debug)]
pub struct Object {
    pub class: Auid,
    pub node: NodeId,
    pub name: String,
    pub parent: Option<ObjectId>,
    pub properties: Vec<Property>,
    pub entry: Option<IndexEntry>,
}

impl Object {
    pub fn property(&self, pid: u16) -> Option<&Property> {
        self.properties.iter().find(|p| p.pid == pid)
    }
}

/// Weak reference value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeakRef {
    pub referenced_property_index: u16,
    pub key_pid: u16,
    pub identification: Vec<u8>,
}

impl WeakRef {
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let size = *buf.get(4).ok_or(Error::UnexpectedEof(5))? as usize;
        Ok(Self {
            referenced_property_index: le_u16(buf, 0)?,
            key_pid: le_u16(buf, 2)?,
            identification: slice_at(buf, 5, size)?.to_vec(),
        })
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Arena of every object in a file.
#[derive(Debug, Default)]
pub struct Objects {
    items: Vec<Object>,
}

impl Objects {
    #[inline]
    pub fn get(&self, id: ObjectId) -> &Object {
        &self.items[id.index()]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, o)| (ObjectId(i as u32), o))
    }

    /// Load the object tree rooted at directory entry `node`.
    pub fn load_tree(&mut self, cfb: &CfbFile, node: NodeId) -> Result<ObjectId> {
        let mut loader = Loader { cfb, objects: self, visited: HashSet::new() };
        loader.load(node, None, None, 0)
    }
}

struct Loader<'a> {
    cfb: &'a CfbFile,
    objects: &'a mut Objects,
    visited: HashSet<NodeId>,
}

impl Loader<'_> {
    fn load(
        &mut self,
        node: NodeId,
        parent: Option<ObjectId>,
        entry: Option<IndexEntry>,
        depth: usize,
    ) -> Result<ObjectId> {
        if depth > MAX_DEPTH {
            return Err(Error::invalid("object tree too deep"));
        }
        if !self.visited.insert(node) {
            return Err(Error::invalid(format!("directory entry {} referenced twice", node)));
        }

        let cfb = self.cfb;
        let dir = cfb
            .node(node)
            .ok_or_else(|| Error::ObjectNotFound(format!("directory entry {}", node)))?;

        let id = ObjectId(self.objects.items.len() as u32);
        self.objects.items.push(Object {
            class: dir.clsid,
            node,
            name: dir.name.clone(),
            parent,
            properties: Vec::new(),
            entry,
        });

        let raw = match cfb.child_by_name(node, PROPERTIES_STREAM) {
            Some(stream) => parse_property_stream(&cfb.get_stream(stream.id)?)?,
            None => {
                warn!("object '{}' has no properties stream", dir.name);
                Vec::new()
            }
        };

        let mut properties = Vec::with_capacity(raw.len());
        for (pid, form, bytes) in raw {
            let data = match form {
                StoredForm::StrongRef => match self.load_strong_ref(node, id, &bytes, depth) {
                    Ok(child) => PropertyData::Object(child),
                    Err(e) => {
                        warn!("object '{}' property 0x{:04x}: {}", self.node_name(node), pid, e);
                        PropertyData::Raw(bytes)
                    }
                },
                StoredForm::StrongRefSet | StoredForm::StrongRefVector => {
                    let is_set = form == StoredForm::StrongRefSet;
                    match self.load_list(node, id, &bytes, is_set, depth) {
                        Ok(list) => PropertyData::List(list),
                        Err(e) => {
                            warn!("object '{}' property 0x{:04x}: {}", self.node_name(node), pid, e);
                            PropertyData::Raw(bytes)
                        }
                    }
                }
                _ => PropertyData::Raw(bytes),
            };
            properties.push(Property { pid, form, data });
        }

        self.objects.items[id.index()].properties = properties;
        Ok(id)
    }

    fn node_name(&self, node: NodeId) -> &str {
        self.cfb.node(node).map(|n| n.name.as_str()).unwrap_or("?")
    }

    fn load_strong_ref(&mut self, node: NodeId, id: ObjectId, value: &[u8], depth: usize) -> Result<ObjectId> {
        let name = utf16le_to_string(value);
        let child = self
            .cfb
            .child_by_name(node, &name)
            .ok_or_else(|| Error::ObjectNotFound(format!("child storage '{}'", name)))?
            .id;
        self.load(child, Some(id), None, depth + 1)
    }

    fn load_list(
        &mut self,
        node: NodeId,
        id: ObjectId,
        value: &[u8],
        is_set: bool,
        depth: usize,
    ) -> Result<ObjectList> {
        let name = utf16le_to_string(value);
        let index_name = format!("{} index", name);
        let index_node = self
            .cfb
            .child_by_name(node, &index_name)
            .ok_or_else(|| Error::ObjectNotFound(format!("index stream '{}'", index_name)))?
            .id;
        let index = self.cfb.get_stream(index_node)?;

        let mut list = ObjectList {
            is_set,
            entry_count: le_u32(&index, 0)?,
            first_free_key: le_u32(&index, 4)?,
            last_free_key: le_u32(&index, 8)?,
            ..Default::default()
        };

        let mut pos = if is_set {
            list.identification_pid = le_u16(&index, 12)?;
            list.identification_size = *index.get(14).ok_or(Error::UnexpectedEof(15))?;
            SET_INDEX_HEADER_SIZE
        } else {
            VECTOR_INDEX_HEADER_SIZE
        };

        for _ in 0..list.entry_count {
            let mut entry = IndexEntry { local_key: le_u32(&index, pos)?, ..Default::default() };
            pos += 4;
            if is_set {
                entry.ref_count = le_u32(&index, pos)?;
                pos += 4;
                let size = list.identification_size as usize;
                entry.identification = slice_at(&index, pos, size)?.to_vec();
                pos += size;
            }

            let member_name = format!("{}{{{:x}}}", name, entry.local_key);
            let Some(member) = self.cfb.child_by_name(node, &member_name).map(|n| n.id) else {
                warn!("missing member storage '{}'", member_name);
                continue;
            };
            match self.load(member, Some(id), Some(entry), depth + 1) {
                Ok(obj) => list.items.push(obj),
                Err(e) => warn!("member '{}': {}", member_name, e),
            }
        }

        debug!("loaded {} '{}' with {} members", if is_set { "set" } else { "vector" }, name, list.items.len());
        Ok(list)
    }
}

/// Split a property stream into (pid, stored form, value bytes).
pub fn parse_property_stream(buf: &[u8]) -> Result<Vec<(u16, StoredForm, Vec<u8>)>> {
    let byte_order = *buf.first().ok_or(Error::UnexpectedEof(0))?;
    if byte_order != PROPERTIES_LITTLE_ENDIAN {
        return Err(Error::invalid(format!("unsupported property byte order 0x{:02x}", byte_order)));
    }
    let count = le_u16(buf, 2)? as usize;

    let mut out = Vec::with_capacity(count);
    let mut value_pos = PROPERTY_HEADER_SIZE + count * PROPERTY_ENTRY_SIZE;
    for i in 0..count {
        let at = PROPERTY_HEADER_SIZE + i * PROPERTY_ENTRY_SIZE;
        let pid = le_u16(buf, at)?;
        let form = StoredForm::from_u16(le_u16(buf, at + 2)?);
        let len = le_u16(buf, at + 4)? as usize;
        out.push((pid, form, slice_at(buf, value_pos, len)?.to_vec()));
        value_pos += len;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(entries: &[(u16, u16, &[u8])]) -> Vec<u8> {
        let mut buf = vec![PROPERTIES_LITTLE_ENDIAN, 0x20];
        buf.extend_from_slice(&(entries.len() as u16).to_le_bytes());
        for (pid, form, value) in entries {
            buf.extend_from_slice(&pid.to_le_bytes());
            buf.extend_from_slice(&form.to_le_bytes());
            buf.extend_from_slice(&(value.len() as u16).to_le_bytes());
        }
        for (_, _, value) in entries {
            buf.extend_from_slice(value);
        }
        buf
    }

    #[test]
    fn test_parse_property_stream() {
        let buf = stream(&[(0x4801, 0x82, &[7, 0, 0, 0]), (0x4803, 0x22, &[b'S', 0, 0, 0])]);
        let props = parse_property_stream(&buf).unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props[0].0, 0x4801);
        assert_eq!(props[0].1, StoredForm::Data);
        assert_eq!(props[0].2, vec![7, 0, 0, 0]);
        assert_eq!(props[1].1, StoredForm::StrongRef);
    }

    #[test]
    fn test_truncated_property_stream() {
        let mut buf = stream(&[(0x4801, 0x82, &[7, 0, 0, 0])]);
        buf.truncate(buf.len() - 1);
        assert!(parse_property_stream(&buf).is_err());
        assert!(parse_property_stream(&[0x42, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_weak_ref() {
        let mut raw = vec![0x02, 0x00, 0x01, 0x1B, 16];
        raw.extend_from_slice(&[0xAB; 16]);
        let r = WeakRef::parse(&raw).unwrap();
        assert_eq!(r.referenced_property_index, 2);
        assert_eq!(r.key_pid, 0x1B01);
        assert_eq!(r.identification, vec![0xAB; 16]);
        assert!(WeakRef::parse(&raw[..10]).is_err());
    }

    #[test]
    fn test_stored_form_codes() {
        for code in [0x82u16, 0x42, 0x22, 0x32, 0x3A, 0x02, 0x12, 0x1A, 0x03, 0x86, 0x40, 0x99] {
            assert_eq!(StoredForm::from_u16(code).to_u16(), code);
        }
    }
}
