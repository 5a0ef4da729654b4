//! Utility types and functions for AAF.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - Little-endian readers and UTF-16 text helpers
//! - File name sanitizing

mod error;
mod bytes;
mod text;

pub use error::*;
pub use bytes::*;
pub use text::*;
