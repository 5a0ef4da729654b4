//! Name/text pairs attached to compositions, clips and essences.
//!
//! AAF stores these as `TaggedValue` objects (user comments, attributes,
//! descriptor metadata). Order of appearance is kept and duplicate names
//! are allowed, since editors write them that way.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;

/// Ordered list of name/text pairs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MetaData {
    entries: SmallVec<[(String, String); 4]>,
}

impl MetaData {
    /// Create empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, keeping any earlier entry with the same name.
    pub fn push(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.entries.push((name.into(), text.into()));
    }

    /// Set a value, replacing the first entry with the same name.
    pub fn set(&mut self, name: impl Into<String>, text: impl Into<String>) {
        let name = name.into();
        let text = text.into();

        for (k, v) in &mut self.entries {
            if k == &name {
                *v = text;
                return;
            }
        }
        self.entries.push((name, text));
    }

    /// First value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Check if a name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    /// Remove the first entry with `name` and return its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate over name/text pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Debug for MetaData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Serialize for MetaData {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = s.serialize_seq(Some(self.entries.len()))?;
        for (name, text) in self.iter() {
            seq.serialize_element(&[name, text])?;
        }
        seq.end()
    }
}

impl FromIterator<(String, String)> for MetaData {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_basic() {
        let mut meta = MetaData::new();
        assert!(meta.is_empty());

        meta.push("Scene", "12");
        meta.push("Take", "3");
        assert_eq!(meta.len(), 2);
        assert_eq!(meta.get("Scene"), Some("12"));
        assert!(meta.contains("Take"));
        assert_eq!(meta.get("Tape"), None);
    }

    #[test]
    fn test_metadata_duplicates() {
        let mut meta = MetaData::new();
        meta.push("Comment", "first");
        meta.push("Comment", "second");
        assert_eq!(meta.len(), 2);
        assert_eq!(meta.get("Comment"), Some("first"));

        meta.set("Comment", "replaced");
        assert_eq!(meta.iter().map(|(_, v)| v).collect::<Vec<_>>(), ["replaced", "second"]);

        assert_eq!(meta.remove("Comment").as_deref(), Some("replaced"));
        assert_eq!(meta.get("Comment"), Some("second"));
    }

    #[test]
    fn test_metadata_json() {
        let meta: MetaData = vec![("a".to_string(), "1".to_string())].into_iter().collect();
        assert_eq!(serde_json::to_string(&meta).unwrap(), r#"[["a","1"]]"#);
    }
}
