//! Guard zones: canary bytes placed after a buffer's capacity.
//!
//! ```text
//! ┌──────────────────────────────┬─────────┬─────────┬─────────┐
//! │  storage (capacity bytes)    │ zone 0  │ zone 1  │ zone 2  │
//! │  live region = [0, length)   │ adjacent│         │ farthest│
//! └──────────────────────────────┴─────────┴─────────┴─────────┘
//! ```
//!
//! Every zone is `zone_len` bytes of the canary pattern repeated. The pattern
//! is phased from the start of the guard region, so byte `i` of the guard is
//! always `canary[i % 4]` regardless of zone boundaries.

use crate::config::DataConfig;
use std::ops::Range;

/// A clobbered guard byte found by [`GuardLayout::inspect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clobber {
    /// Zone containing the byte.
    pub zone: usize,
    /// Offset of the byte relative to the start of the guard region.
    pub offset: usize,
    /// Byte found.
    pub found: u8,
    /// Byte expected.
    pub expected: u8,
}

/// Placement and content of the guard zones of one buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardLayout {
    zones: usize,
    zone_len: usize,
    canary: [u8; 4],
}

impl GuardLayout {
    /// Layout with `zones` zones sized by `config`.
    pub const fn new(zones: usize, config: &DataConfig) -> Self {
        Self {
            zones,
            zone_len: config.zone_len,
            canary: config.canary,
        }
    }

    /// Number of zones.
    #[inline]
    pub const fn zones(&self) -> usize {
        self.zones
    }

    /// Total guard bytes, or `None` if the product overflows.
    #[inline]
    pub const fn len(&self) -> Option<usize> {
        self.zones.checked_mul(self.zone_len)
    }

    /// Whether the layout has no guard bytes at all.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.zones == 0 || self.zone_len == 0
    }

    /// Byte range of `zone`, relative to the start of the guard region.
    ///
    /// # Panics
    /// Panics if `zone` is not a zone of this layout.
    pub fn zone_range(&self, zone: usize) -> Range<usize> {
        assert!(
            zone < self.zones,
            "guard zone {zone} out of range ({} zones)",
            self.zones
        );
        let start = zone * self.zone_len;
        start..start + self.zone_len
    }

    /// Canary byte expected at `offset` in the guard region.
    #[inline]
    pub const fn expected(&self, offset: usize) -> u8 {
        self.canary[offset % self.canary.len()]
    }

    /// Write the canary over the whole guard region.
    pub fn fill(&self, guard: &mut [u8]) {
        for (offset, byte) in guard.iter_mut().enumerate() {
            *byte = self.expected(offset);
        }
    }

    /// Find the first modified byte in `zones`, scanning zones in order.
    pub fn inspect(&self, guard: &[u8], mut zones: Range<usize>) -> Option<Clobber> {
        zones.find_map(|zone| {
            let range = self.zone_range(zone);
            guard[range.clone()]
                .iter()
                .zip(range)
                .find(|&(&found, offset)| found != self.expected(offset))
                .map(|(&found, offset)| Clobber {
                    zone,
                    offset,
                    found,
                    expected: self.expected(offset),
                })
        })
    }
}
