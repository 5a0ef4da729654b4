//! Error types for the AAF library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for AAF operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Compound file signature mismatch
    #[error("Invalid compound file: bad signature")]
    InvalidSignature,

    /// Unsupported container or property stream version
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(u16),

    /// File or stream is truncated
    #[error("Unexpected end of data at position {0}")]
    UnexpectedEof(u64),

    /// Invalid data structure in file
    #[error("Invalid file structure: {0}")]
    InvalidStructure(String),

    /// Property missing on an object
    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    /// Object could not be resolved (mob, slot, node, weak reference)
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// Stored value does not match the expected type
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// URI could not be parsed
    #[error("Malformed URI: {0}")]
    MalformedUri(String),

    /// Variable gain cannot be composed with another gain
    #[error("Gain automation offsets are not supported")]
    UnsupportedAutomation,

    /// Essence cannot be read or extracted from its current location
    #[error("Essence not locatable: {0}")]
    EssenceNotLocatable(String),

    /// Essence payload does not fit a RIFF/WAVE file
    #[error("Essence file too large for WAVE output: {0} bytes")]
    EssenceFileTooLarge(u64),

    /// Descriptor summary could not be parsed
    #[error("Summary parse failed: {0}")]
    SummaryParseFailed(String),

    /// External or embedded audio file could not be parsed
    #[error("Audio file parse failed: {0}")]
    ExternalFileParseFailed(String),

    /// Allocation for a buffer failed
    #[error("Out of memory")]
    OutOfMemory,

    /// Memory mapping failed
    #[error("Memory mapping failed: {0}")]
    MmapFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Self::OutOfMemory
    }
}

/// Result type alias for AAF operations.
pub type Result<T> = std::result::Result<T, Error>;
