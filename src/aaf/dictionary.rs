//! Class and property dictionary.
//!
//! Starts from the built-in object model and grows with the class and
//! property definitions a file declares in its MetaDictionary.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::classes::BUILTIN_CLASSES;
use crate::core::Auid;

/// Property definition.
#[derive(Clone, Debug)]
pub struct PropertyDef {
    pub pid: u16,
    pub name: String,
    pub optional: bool,
    /// Declared type. Informational only; NULL for built-in definitions.
    pub type_id: Auid,
}

/// Class definition.
#[derive(Clone, Debug)]
pub struct ClassDef {
    pub id: Auid,
    pub name: String,
    pub parent: Option<Auid>,
    pub concrete: bool,
    /// Properties declared by this class (not inherited ones).
    pub properties: Vec<PropertyDef>,
    /// Defined by the built-in object model rather than the file.
    pub builtin: bool,
}

/// Registry of classes with parent-chain lookup.
#[derive(Clone, Debug, Default)]
pub struct Dictionary {
    classes: HashMap<Auid, ClassDef>,
    /// Registration order, for stable iteration.
    order: Vec<Auid>,
}

impl Dictionary {
    /// Dictionary holding the built-in AAF object model.
    pub fn builtin() -> Self {
        let mut dict = Self::default();
        for spec in BUILTIN_CLASSES {
            dict.insert(ClassDef {
                id: spec.id,
                name: spec.name.to_string(),
                parent: spec.parent,
                concrete: spec.concrete,
                properties: spec
                    .props
                    .iter()
                    .map(|p| PropertyDef {
                        pid: p.pid,
                        name: p.name.to_string(),
                        optional: p.optional,
                        type_id: Auid::NULL,
                    })
                    .collect(),
                builtin: true,
            });
        }
        dict
    }

    fn insert(&mut self, class: ClassDef) {
        if !self.classes.contains_key(&class.id) {
            self.order.push(class.id);
        }
        self.classes.insert(class.id, class);
    }

    /// Merge a class declared by a file.
    ///
    /// Known classes only gain the properties whose ids they do not define yet.
    pub fn register_class(&mut self, class: ClassDef) {
        // InterchangeObject names itself as its parent in meta dictionaries.
        let parent = class.parent.filter(|p| *p != class.id);

        let Some(existing) = self.classes.get_mut(&class.id) else {
            debug!("registering class {} {}", class.name, class.id);
            self.insert(ClassDef { parent, builtin: false, ..class });
            return;
        };

        for prop in class.properties {
            if let Some(known) = existing.properties.iter_mut().find(|p| p.pid == prop.pid) {
                if known.type_id.is_null() {
                    known.type_id = prop.type_id;
                }
                continue;
            }
            debug!("class {}: adding property 0x{:04x} {}", existing.name, prop.pid, prop.name);
            existing.properties.push(prop);
        }
        if existing.parent.is_none() {
            existing.parent = parent;
        }
    }

    /// Check that every registered parent exists, warning about the rest.
    pub fn check_parents(&self) {
        for class in self.classes() {
            if let Some(parent) = class.parent {
                if !self.classes.contains_key(&parent) {
                    warn!("class {} has unknown parent {}", class.name, parent);
                }
            }
        }
    }

    /// Look up a class.
    pub fn resolve_class(&self, id: &Auid) -> Option<&ClassDef> {
        self.classes.get(id)
    }

    /// Class name, or the id in braces when unknown.
    pub fn class_name(&self, id: &Auid) -> String {
        self.classes
            .get(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("{:?}", id))
    }

    /// All classes in registration order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
        self.order.iter().filter_map(|id| self.classes.get(id))
    }

    /// Walk from `id` up to the root class.
    pub fn ancestry(&self, id: &Auid) -> impl Iterator<Item = &ClassDef> {
        let mut next = self.classes.get(id);
        let mut steps = 0usize;
        let limit = self.classes.len();
        std::iter::from_fn(move || {
            let cur = next?;
            steps += 1;
            next = if steps > limit {
                None
            } else {
                cur.parent.and_then(|p| self.classes.get(&p))
            };
            Some(cur)
        })
    }

    /// True when `id` is `ancestor` or derives from it.
    pub fn is_subclass(&self, id: &Auid, ancestor: &Auid) -> bool {
        id == ancestor || self.ancestry(id).any(|c| c.id == *ancestor)
    }

    /// Properties of a class including inherited ones; a child's definition
    /// wins over a parent's with the same id.
    pub fn property_defs(&self, id: &Auid) -> Vec<&PropertyDef> {
        let mut out: Vec<&PropertyDef> = Vec::new();
        for class in self.ancestry(id) {
            for prop in &class.properties {
                if !out.iter().any(|p| p.pid == prop.pid) {
                    out.push(prop);
                }
            }
        }
        out
    }

    /// Definition of `pid` as seen from `class`.
    pub fn property_def(&self, class: &Auid, pid: u16) -> Option<&PropertyDef> {
        self.ancestry(class)
            .find_map(|c| c.properties.iter().find(|p| p.pid == pid))
    }

    /// Name of a property id, searching all classes.
    pub fn property_name(&self, pid: u16) -> Option<&str> {
        self.classes()
            .find_map(|c| c.properties.iter().find(|p| p.pid == pid))
            .map(|p| p.name.as_str())
    }

    /// Id of the first property named `name`. Used for dynamic (file-local) properties.
    pub fn pid_by_name(&self, name: &str) -> Option<u16> {
        self.classes()
            .find_map(|c| c.properties.iter().find(|p| p.name == name))
            .map(|p| p.pid)
    }
}
