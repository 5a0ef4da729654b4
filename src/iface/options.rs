//! Parse and extraction options

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::util::{Error, Result};

/// Options controlling interpretation, essence lookup and vendor fixes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    // Essence
    /// Extra directory searched first for external media.
    pub media_location: Option<PathBuf>,
    /// Name essence files after their SourceMob material id.
    pub mobid_essence_filename: bool,

    // Pro Tools
    pub protools_remove_sample_accurate_edit: bool,
    pub protools_replace_rendered_fades: bool,

    // I/O
    pub use_mmap: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            media_location: None,
            mobid_essence_filename: false,
            protools_remove_sample_accurate_edit: true,
            protools_replace_rendered_fades: true,
            use_mmap: true,
        }
    }
}

impl Options {
    fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("aaf");
            p.push("options.json");
            p
        })
    }

    /// Load options from the user config directory, defaults when absent
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(&p).ok())
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Load options from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&text).map_err(|e| Error::other(format!("options: {}", e)))
    }

    /// Save options to the user config directory
    pub fn save(&self) {
        if let Some(path) = Self::path() {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir).ok();
            }
            if let Ok(json) = serde_json::to_string_pretty(self) {
                let _ = std::fs::write(path, json);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{ "media_location": "/media", "protools_replace_rendered_fades": false }"#).unwrap();

        let opts = Options::from_file(&path).unwrap();
        assert_eq!(opts.media_location.as_deref(), Some(Path::new("/media")));
        assert!(!opts.protools_replace_rendered_fades);
        assert!(opts.protools_remove_sample_accurate_edit);
        assert!(opts.use_mmap);
    }

    #[test]
    fn test_bad_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(Options::from_file(&path).is_err());
    }
}
