//! # AAF
//!
//! Reader for the Advanced Authoring Format (.aaf) and audio timeline
//! reconstruction.
//!
//! An AAF file is a Compound File Binary container holding a graph of
//! persistent objects. This crate decodes the container and the objects,
//! then interprets the compositions into tracks of clips, transitions,
//! gains and markers that reference audio essence.
//!
//! ## Modules
//!
//! - [`util`] - Errors, byte readers, text helpers
//! - [`cfb`] - Compound File Binary container
//! - [`core`] - Identifiers, rationals, well-known definitions
//! - [`aaf`] - Object graph, dictionary and typed property values
//! - [`iface`] - Timeline interpreter and composition model
//! - [`essence`] - External media lookup, RIFF/AIFF parsing, extraction
//! - [`vendor`] - Vendor detection and Pro Tools fixes
//!
//! ## Example
//!
//! ```ignore
//! use aaf::iface::{load, Options};
//!
//! let (_file, comp) = load("session.aaf", &Options::default())?;
//! for track in &comp.audio.tracks {
//!     println!("{} {}: {} clips", track.number, track.name, track.clip_count);
//! }
//! ```

pub mod util;
pub mod cfb;
pub mod core;
pub mod aaf;
pub mod iface;
pub mod essence;
pub mod vendor;

// Re-export commonly used types
pub use util::{Error, Result};
pub use aaf::AafFile;
pub use iface::{load, parse_composition, Composition, Options};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::aaf::{AafFile, Identification, ObjectId};
    pub use crate::core::{Auid, MobId, Rational};
    pub use crate::iface::{
        load, parse_composition, AudioClip, AudioTrack, Composition, EssenceFile, EssenceType, Options,
        TimelineItem, Transition,
    };
    pub use crate::essence::{extract_audio_clip, extract_audio_essence, ExtractFormat};
}
