//! Run-length-encoded background colors, one run per span of same-colored cells.

#![allow(unsafe_code)]

use super::color::Rgb;
use super::typed::{Record, TypedData};
use std::slice;

/// A run of `count` cells sharing one background color, starting at `origin`.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct BackgroundColorRle {
    /// Run color.
    pub color: Rgb,
    _padding: u8,
    /// First column of the run.
    pub origin: u16,
    /// Number of cells in the run.
    pub count: u16,
}

const _: () = assert!(std::mem::size_of::<BackgroundColorRle>() == 8);

impl BackgroundColorRle {
    /// Create a run.
    pub const fn new(color: Rgb, origin: u16, count: u16) -> Self {
        Self {
            color,
            _padding: 0,
            origin,
            count,
        }
    }

    /// Column one past the end of the run.
    #[inline]
    pub const fn end(&self) -> u32 {
        self.origin as u32 + self.count as u32
    }
}

impl Record for BackgroundColorRle {
    const LABEL: &'static str = "background color runs";
    const GUARD_ZONES: usize = 1;
}

/// Background run storage, one guard zone.
///
/// `count()` is the number of runs written this frame; it varies per row
/// while the storage is sized for the worst case.
pub type BackgroundColorRlesData = TypedData<BackgroundColorRle>;

impl TypedData<BackgroundColorRle> {
    /// Append a run at index `count()`.
    ///
    /// When the live region is full it is doubled, so a row of `n` runs
    /// reallocates O(log n) times whatever the configured growth policy.
    pub fn push_run(&mut self, run: BackgroundColorRle) {
        let index = self.count();
        if index >= self.len_records() {
            self.set_len_records(index.max(1).saturating_mul(2).max(index + 1));
        }
        self.write(index, run);
        self.set_count(index + 1);
    }

    /// Forget all runs, keeping storage.
    #[inline]
    pub fn clear_runs(&mut self) {
        self.set_count(0);
    }

    /// The runs written since the last [`clear_runs`](Self::clear_runs).
    ///
    /// Only runs appended with [`push_run`](Self::push_run), or otherwise
    /// written below `count()`, are visible.
    ///
    /// # Safety
    /// Every record below `count()` must have been written.
    pub unsafe fn runs(&self) -> &[BackgroundColorRle] {
        slice::from_raw_parts(self.as_ptr(), self.count().min(self.len_records()))
    }
}
