//! Compound File Binary (structured storage) container.
//!
//! AAF files are compound files: a FAT-style sector allocator holding a tree
//! of storages (directories) and streams (files). This module only reads.

pub mod format;
mod node;
mod reader;

pub use node::{compare_names, DirEntry, EntryType, NodeId};
pub use reader::{CfbFile, StreamReader};
