//! Raw bitmap rows (e.g. glyph masks, image strips), sized in bytes.

#![allow(unsafe_code)]

use super::typed::{Record, TypedData};
use crate::error::OverrunError;
use std::mem::MaybeUninit;

impl Record for u8 {
    const LABEL: &'static str = "bitmap";
    const GUARD_ZONES: usize = 1;
}

/// Bitmap byte storage, one guard zone.
pub type BitmapData = TypedData<u8>;

impl TypedData<u8> {
    /// Inspect the guard zone, naming `info` in the panic message if modified.
    ///
    /// `info` identifies which bitmap failed, e.g. the glyph it was rasterised for.
    pub fn check_for_overrun_with_info(&self, info: &str) {
        self.check_with_info(info);
    }

    /// Inspect the guard zone, tagging any error with `info`.
    pub fn try_check_for_overrun_with_info(&self, info: &str) -> Result<(), OverrunError> {
        self.try_check_with_info(info)
    }

    /// Row `row` of a bitmap with `stride` bytes per row.
    ///
    /// # Panics
    /// Panics if the row does not lie inside the live region.
    pub fn row_mut(&mut self, row: usize, stride: usize) -> &mut [MaybeUninit<u8>] {
        let start = row.checked_mul(stride);
        let end = start.and_then(|start| start.checked_add(stride));
        let length = self.length();
        match (start, end) {
            (Some(start), Some(end)) if end <= length => &mut self.records_mut()[start..end],
            _ => panic!("bitmap row {row} with stride {stride} exceeds length {length}"),
        }
    }
}
