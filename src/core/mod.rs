//! Core layer - fundamental AAF value types.
//!
//! This module provides:
//! - [`Auid`] / [`MobId`] / [`TimeStamp`] - identifiers and dates
//! - [`Rational`] and edit-unit conversion
//! - [`MetaData`] - name/text pairs
//! - [`defs`] - well-known property, class and definition ids

mod uid;
mod rational;
mod metadata;
pub mod defs;

pub use uid::{Auid, MobId, TimeStamp};
pub use rational::{convert_unit, convert_unit_u64, Rational};
pub use metadata::MetaData;
