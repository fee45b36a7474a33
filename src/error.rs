//! Error types for overrun detection.

use thiserror::Error;

/// A guard zone was found modified.
///
/// Returned by the `try_check_for_overrun*` family. The panicking
/// `check_for_overrun*` family formats this same value into its panic message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OverrunError {
    /// A byte in a guard zone no longer matches the canary.
    #[error("{label} overrun: guard zone {zone} clobbered at byte {offset} (capacity {capacity}, found {found:#04x}, expected {expected:#04x})")]
    Clobbered {
        /// Diagnostic label of the buffer (record kind or caller info).
        label: String,
        /// Index of the guard zone that was modified.
        zone: usize,
        /// Byte offset of the first modified guard byte, from the start of storage.
        offset: usize,
        /// Storage capacity at the time of the check.
        capacity: usize,
        /// Byte found in the guard.
        found: u8,
        /// Canary byte that should have been there.
        expected: u8,
    },
}

impl OverrunError {
    /// Index of the clobbered zone.
    pub const fn zone(&self) -> usize {
        match self {
            Self::Clobbered { zone, .. } => *zone,
        }
    }

    /// Byte offset of the first clobbered guard byte.
    pub const fn offset(&self) -> usize {
        match self {
            Self::Clobbered { offset, .. } => *offset,
        }
    }

    /// Diagnostic label of the failing buffer.
    pub fn label(&self) -> &str {
        match self {
            Self::Clobbered { label, .. } => label,
        }
    }
}
