//! Data module: the untyped frame buffer and its guard zones.
//!
//! This module contains:
//! - [`RawData`]: uninitialised, never-shrinking byte storage
//! - [`GuardLayout`]: canary zones placed after the storage

mod guard;
mod raw;

pub use guard::{Clobber, GuardLayout};
pub use raw::{RawData, MIN_ALIGN};
