//! AAF file: object graph, dictionary and navigation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::dictionary::{ClassDef, Dictionary, PropertyDef};
use super::object::{Object, ObjectId, ObjectList, Objects, Property, PropertyData, WeakRef};
use super::value::{decode, AafType, FromValue, ProductVersion, Value};
use crate::cfb::{CfbFile, NodeId, StreamReader};
use crate::core::defs::{class_id, pid};
use crate::core::{Auid, MobId, TimeStamp};
use crate::util::{Error, Result};

/// Identification of the application that wrote (or last modified) the file.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Identification {
    pub company_name: String,
    pub product_name: String,
    pub product_version: Option<ProductVersion>,
    pub product_version_string: String,
    pub product_id: Auid,
    pub date: TimeStamp,
    pub toolkit_version: Option<ProductVersion>,
    pub platform: String,
    pub generation: Auid,
}

/// An opened AAF file.
pub struct AafFile {
    path: Option<PathBuf>,
    cfb: CfbFile,
    objects: Objects,
    dict: Dictionary,
    root: ObjectId,
    header: ObjectId,
    content_storage: ObjectId,
    dictionary: Option<ObjectId>,
    meta_dictionary: Option<ObjectId>,
    identification: Identification,
}

impl std::fmt::Debug for AafFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AafFile")
            .field("path", &self.path)
            .field("objects", &self.objects.len())
            .finish()
    }
}

impl AafFile {
    /// Open a file, memory-mapped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_opts(path, true)
    }

    /// Open a file with optional memory mapping.
    pub fn open_opts(path: impl AsRef<Path>, use_mmap: bool) -> Result<Self> {
        let path = path.as_ref();
        let cfb = CfbFile::open_opts(path, use_mmap)?;
        Self::from_cfb(cfb, Some(path.to_path_buf()))
    }

    /// Read a file held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_cfb(CfbFile::from_bytes(data)?, None)
    }

    #[tracing::instrument(skip_all)]
    fn from_cfb(cfb: CfbFile, path: Option<PathBuf>) -> Result<Self> {
        let mut objects = Objects::default();
        let root = objects.load_tree(&cfb, cfb.root().id)?;

        if objects.get(root).class != class_id::ROOT {
            warn!("root storage has class {:?}, expected the AAF root class", objects.get(root).class);
        }

        let mut file = Self {
            path,
            cfb,
            objects,
            dict: Dictionary::builtin(),
            root,
            header: root,
            content_storage: root,
            dictionary: None,
            meta_dictionary: None,
            identification: Identification::default(),
        };

        file.meta_dictionary = file.strong_ref(root, pid::ROOT_META_DICTIONARY);
        if let Some(meta) = file.meta_dictionary {
            file.register_meta_dictionary(meta);
        }
        file.warn_unknown_classes();

        file.header = file
            .strong_ref(root, pid::ROOT_HEADER)
            .ok_or_else(|| Error::invalid("file has no Header object"))?;
        file.content_storage = file
            .strong_ref(file.header, pid::HEADER_CONTENT)
            .ok_or_else(|| Error::invalid("Header has no ContentStorage"))?;
        file.dictionary = file.strong_ref(file.header, pid::HEADER_DICTIONARY);
        file.identification = file.read_identification();

        info!(
            "loaded {} objects, {} mobs, written by {} {}",
            file.objects.len(),
            file.mobs().len(),
            file.identification.company_name,
            file.identification.product_name
        );
        Ok(file)
    }

    // ========================================================================
    // MetaDictionary
    // ========================================================================

    fn register_meta_dictionary(&mut self, meta: ObjectId) {
        let class_defs = self.members(meta, pid::META_DICTIONARY_CLASS_DEFINITIONS).to_vec();
        let mut classes = Vec::with_capacity(class_defs.len());

        for def in class_defs {
            let Some(id) = self.get::<Auid>(def, pid::META_DEFINITION_IDENTIFICATION) else {
                continue;
            };
            let name = self.get::<String>(def, pid::META_DEFINITION_NAME).unwrap_or_default();
            let parent = self
                .get::<WeakRef>(def, pid::CLASS_DEFINITION_PARENT_CLASS)
                .and_then(|r| Auid::from_bytes(&r.identification).ok());
            let concrete = self.get::<bool>(def, pid::CLASS_DEFINITION_IS_CONCRETE).unwrap_or(true);

            let properties = self
                .members(def, pid::CLASS_DEFINITION_PROPERTIES)
                .iter()
                .filter_map(|&p| {
                    Some(PropertyDef {
                        pid: self.get::<u16>(p, pid::PROPERTY_DEFINITION_LOCAL_IDENTIFICATION)?,
                        name: self.get::<String>(p, pid::META_DEFINITION_NAME).unwrap_or_default(),
                        optional: self.get::<bool>(p, pid::PROPERTY_DEFINITION_IS_OPTIONAL).unwrap_or(true),
                        type_id: self
                            .get::<WeakRef>(p, pid::PROPERTY_DEFINITION_TYPE)
                            .and_then(|r| Auid::from_bytes(&r.identification).ok())
                            .unwrap_or(Auid::NULL),
                    })
                })
                .collect();

            classes.push(ClassDef { id, name, parent, concrete, properties, builtin: false });
        }

        debug!("meta dictionary declares {} classes", classes.len());
        for class in classes {
            self.dict.register_class(class);
        }
        self.dict.check_parents();
    }

    fn warn_unknown_classes(&self) {
        let mut seen = HashSet::new();
        for (_, obj) in self.objects.iter() {
            if self.dict.resolve_class(&obj.class).is_none() && seen.insert(obj.class) {
                warn!("unknown class {:?} (first seen on '{}')", obj.class, obj.name);
            }
        }
    }

    fn read_identification(&self) -> Identification {
        // The last entry describes the most recent writer.
        let Some(&ident) = self.members(self.header, pid::HEADER_IDENTIFICATION_LIST).last() else {
            warn!("Header has no Identification");
            return Identification::default();
        };

        Identification {
            company_name: self.get(ident, pid::IDENTIFICATION_COMPANY_NAME).unwrap_or_default(),
            product_name: self.get(ident, pid::IDENTIFICATION_PRODUCT_NAME).unwrap_or_default(),
            product_version: self.get(ident, pid::IDENTIFICATION_PRODUCT_VERSION),
            product_version_string: self.get(ident, pid::IDENTIFICATION_PRODUCT_VERSION_STRING).unwrap_or_default(),
            product_id: self.get(ident, pid::IDENTIFICATION_PRODUCT_ID).unwrap_or_default(),
            date: self.get(ident, pid::IDENTIFICATION_DATE).unwrap_or_default(),
            toolkit_version: self.get(ident, pid::IDENTIFICATION_TOOLKIT_VERSION),
            platform: self.get(ident, pid::IDENTIFICATION_PLATFORM).unwrap_or_default(),
            generation: self.get(ident, pid::IDENTIFICATION_GENERATION_AUID).unwrap_or_default(),
        }
    }

    // ========================================================================
    // File-level accessors
    // ========================================================================

    /// Path the file was opened from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn cfb(&self) -> &CfbFile {
        &self.cfb
    }

    pub fn objects(&self) -> &Objects {
        &self.objects
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    pub fn root(&self) -> ObjectId {
        self.root
    }

    pub fn header(&self) -> ObjectId {
        self.header
    }

    pub fn content_storage(&self) -> ObjectId {
        self.content_storage
    }

    /// The Header's Dictionary object (definition lists).
    pub fn definitions(&self) -> Option<ObjectId> {
        self.dictionary
    }

    pub fn identification(&self) -> &Identification {
        &self.identification
    }

    pub fn operational_pattern(&self) -> Option<Auid> {
        self.get(self.header, pid::HEADER_OPERATIONAL_PATTERN)
    }

    /// Header file format version (major, minor).
    pub fn version(&self) -> Option<(i8, i8)> {
        match self.get_property_value(self.header, pid::HEADER_VERSION, AafType::VersionType)? {
            Value::Version(major, minor) => Some((major, minor)),
            _ => None,
        }
    }

    pub fn object_model_version(&self) -> Option<u32> {
        self.get(self.header, pid::HEADER_OBJECT_MODEL_VERSION)
    }

    pub fn mobs(&self) -> &[ObjectId] {
        self.members(self.content_storage, pid::CONTENT_STORAGE_MOBS)
    }

    pub fn essence_data(&self) -> &[ObjectId] {
        self.members(self.content_storage, pid::CONTENT_STORAGE_ESSENCE_DATA)
    }

    /// Members of one of the Dictionary's definition sets.
    pub fn definition_list(&self, list_pid: u16) -> Option<&ObjectList> {
        self.object_list(self.dictionary?, list_pid)
    }

    // ========================================================================
    // Objects and classes
    // ========================================================================

    #[inline]
    pub fn object(&self, id: ObjectId) -> &Object {
        self.objects.get(id)
    }

    #[inline]
    pub fn class_of(&self, id: ObjectId) -> Auid {
        self.objects.get(id).class
    }

    /// True when the object's class is `class` or derives from it.
    pub fn is_a(&self, id: ObjectId, class: &Auid) -> bool {
        self.dict.is_subclass(&self.objects.get(id).class, class)
    }

    pub fn class_name(&self, id: ObjectId) -> String {
        self.dict.class_name(&self.objects.get(id).class)
    }

    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.objects.get(id).parent
    }

    /// Nearest ancestor of `id` that is-a `class`.
    pub fn ancestor(&self, id: ObjectId, class: &Auid) -> Option<ObjectId> {
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            if self.is_a(p, class) {
                return Some(p);
            }
            cur = self.parent(p);
        }
        None
    }

    /// Id of a property the file declares by name (dynamic properties).
    pub fn pid_by_name(&self, name: &str) -> Option<u16> {
        self.dict.pid_by_name(name)
    }

    // ========================================================================
    // Property access
    // ========================================================================

    /// Raw property, logging a miss according to the class definition.
    pub fn get_property(&self, id: ObjectId, pid: u16) -> Option<&Property> {
        let obj = self.objects.get(id);
        if let Some(prop) = obj.property(pid) {
            return Some(prop);
        }

        match self.dict.property_def(&obj.class, pid) {
            None => warn!(
                "unknown property 0x{:04x} requested on {} '{}'",
                pid,
                self.dict.class_name(&obj.class),
                obj.name
            ),
            Some(def) if !def.optional => error!(
                "missing required property {} (0x{:04x}) on {} '{}'",
                def.name,
                pid,
                self.dict.class_name(&obj.class),
                obj.name
            ),
            Some(def) => debug!("missing optional property {} on '{}'", def.name, obj.name),
        }
        None
    }

    /// Decoded property value; the stored form must match `ty`.
    pub fn get_property_value(&self, id: ObjectId, pid: u16, ty: AafType) -> Option<Value> {
        let prop = self.get_property(id, pid)?;
        match decode(prop, ty) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("property 0x{:04x} of '{}': {}", pid, self.objects.get(id).name, e);
                None
            }
        }
    }

    /// Typed property value.
    pub fn get<T: FromValue>(&self, id: ObjectId, pid: u16) -> Option<T> {
        T::from_value(self.get_property_value(id, pid, T::TYPE)?)
    }

    /// Typed property value without missing-property logging.
    pub fn get_opt<T: FromValue>(&self, id: ObjectId, pid: u16) -> Option<T> {
        let prop = self.objects.get(id).property(pid)?;
        T::from_value(decode(prop, T::TYPE).ok()?)
    }

    /// Object referenced by a strong reference property.
    pub fn strong_ref(&self, id: ObjectId, pid: u16) -> Option<ObjectId> {
        match self.get_property_value(id, pid, AafType::StrongRef)? {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Set/vector of a strong reference collection property.
    pub fn object_list(&self, id: ObjectId, pid: u16) -> Option<&ObjectList> {
        match &self.objects.get(id).property(pid)?.data {
            PropertyData::List(list) => Some(list),
            _ => None,
        }
    }

    /// Members of a strong reference set or vector, empty when absent.
    pub fn members(&self, id: ObjectId, pid: u16) -> &[ObjectId] {
        self.object_list(id, pid).map(|l| l.items.as_slice()).unwrap_or(&[])
    }

    /// Iterate a set/vector in index order, optionally keeping only one class family.
    pub fn iter_set<'a>(
        &'a self,
        id: ObjectId,
        pid: u16,
        class: Option<Auid>,
    ) -> impl Iterator<Item = ObjectId> + 'a {
        self.members(id, pid)
            .iter()
            .copied()
            .filter(move |&m| class.map_or(true, |c| self.is_a(m, &c)))
    }

    /// Value of an Indirect property, checked against `expected`.
    pub fn get_indirect_value(&self, id: ObjectId, pid: u16, expected: AafType) -> Option<Value> {
        let Value::Indirect { type_id, bytes } = self.get_property_value(id, pid, AafType::Indirect)? else {
            return None;
        };
        if Some(type_id) != expected.type_id() {
            warn!(
                "indirect property 0x{:04x} of '{}' holds type {:?}, expected {:?}",
                pid,
                self.objects.get(id).name,
                type_id,
                expected
            );
            return None;
        }
        match super::value::decode_bytes(&bytes, expected) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("indirect property 0x{:04x}: {}", pid, e);
                None
            }
        }
    }

    /// Typed Indirect value.
    pub fn indirect<T: FromValue>(&self, id: ObjectId, pid: u16) -> Option<T> {
        T::from_value(self.get_indirect_value(id, pid, T::TYPE)?)
    }

    /// Directory entry of a data stream property.
    pub fn stream_node(&self, id: ObjectId, pid: u16) -> Option<NodeId> {
        let Value::Stream(name) = self.get_property_value(id, pid, AafType::Stream)? else {
            return None;
        };
        let node = self.objects.get(id).node;
        self.cfb.child_by_name(node, &name).map(|n| n.id)
    }

    /// Whole content of a data stream property.
    pub fn get_stream(&self, id: ObjectId, pid: u16) -> Result<Vec<u8>> {
        let node = self
            .stream_node(id, pid)
            .ok_or_else(|| Error::PropertyNotFound(format!("data stream 0x{:04x}", pid)))?;
        self.cfb.get_stream(node)
    }

    /// Lazy reader over a data stream property.
    pub fn stream_reader(&self, id: ObjectId, pid: u16) -> Result<StreamReader<'_>> {
        let node = self
            .stream_node(id, pid)
            .ok_or_else(|| Error::PropertyNotFound(format!("data stream 0x{:04x}", pid)))?;
        self.cfb.stream_reader(node)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Resolve a weak reference against the set or vector it targets.
    pub fn resolve_weak_ref(&self, list: &ObjectList, r: &WeakRef) -> Option<ObjectId> {
        list.items.iter().copied().find(|&m| {
            let Some(entry) = &self.objects.get(m).entry else {
                return false;
            };
            if list.identification_size == 0 {
                entry.local_key == r.referenced_property_index as u32
            } else {
                entry.identification == r.identification
            }
        })
    }

    /// AUID of the definition a weak reference property points at.
    ///
    /// `list_pid` names the Dictionary set holding the definitions. When the
    /// dictionary lacks the target, the reference's own key is used.
    pub fn weak_ref_definition(&self, id: ObjectId, pid: u16, list_pid: u16) -> Option<Auid> {
        let r = self.get::<WeakRef>(id, pid)?;
        if let Some(def) = self.definition_list(list_pid).and_then(|l| self.resolve_weak_ref(l, &r)) {
            if let Some(uid) = self.get::<Auid>(def, pid::DEFINITION_OBJECT_IDENTIFICATION) {
                return Some(uid);
            }
        }
        debug!("weak reference 0x{:04x} not found in dictionary, using its key", pid);
        Auid::from_bytes(&r.identification).ok()
    }

    /// Mob with the given id.
    pub fn find_mob_by_id(&self, mob_id: &MobId) -> Option<ObjectId> {
        self.mobs()
            .iter()
            .copied()
            .find(|&m| self.get_opt::<MobId>(m, pid::MOB_MOB_ID).as_ref() == Some(mob_id))
    }

    /// Slot of `mob` with the given slot id.
    pub fn find_slot_by_id(&self, mob: ObjectId, slot_id: u32) -> Option<ObjectId> {
        self.members(mob, pid::MOB_SLOTS)
            .iter()
            .copied()
            .find(|&s| self.get_opt::<u32>(s, pid::MOB_SLOT_SLOT_ID) == Some(slot_id))
    }

    /// EssenceData object holding the essence of a SourceMob.
    pub fn find_essence_data_by_mob_id(&self, mob_id: &MobId) -> Option<ObjectId> {
        self.essence_data()
            .iter()
            .copied()
            .find(|&e| self.get_opt::<MobId>(e, pid::ESSENCE_DATA_MOB_ID).as_ref() == Some(mob_id))
    }
}
