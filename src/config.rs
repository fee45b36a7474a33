//! Configuration for frame data buffers.

/// Default canary pattern written into every guard zone.
pub const DEFAULT_CANARY: [u8; 4] = [0xDE, 0xAD, 0xBE, 0xEF];

/// Default width of a single guard zone in bytes.
pub const DEFAULT_ZONE_LEN: usize = 16;

/// How storage grows when a requested length exceeds capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Growth {
    /// Reallocate to exactly the requested length.
    #[default]
    Exact,
    /// Reallocate to the larger of the requested length and twice the
    /// current capacity.
    Doubling,
}

impl Growth {
    /// Capacity to reallocate to when `requested` exceeds `capacity`.
    #[inline]
    pub const fn next_capacity(self, capacity: usize, requested: usize) -> usize {
        match self {
            Self::Exact => requested,
            Self::Doubling => {
                let doubled = capacity.saturating_mul(2);
                if doubled > requested {
                    doubled
                } else {
                    requested
                }
            }
        }
    }
}

/// Configuration for a frame data buffer.
///
/// Every buffer carries its own copy, so buffers created with different
/// configurations can coexist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataConfig {
    /// Byte pattern repeated across each guard zone.
    pub canary: [u8; 4],
    /// Width of one guard zone in bytes. Zero disables overrun checking.
    pub zone_len: usize,
    /// Growth policy for `set_length` past capacity.
    pub growth: Growth,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            canary: DEFAULT_CANARY,
            zone_len: DEFAULT_ZONE_LEN,
            growth: Growth::Exact,
        }
    }
}

impl DataConfig {
    /// Set the canary pattern.
    #[must_use]
    pub const fn with_canary(mut self, canary: [u8; 4]) -> Self {
        self.canary = canary;
        self
    }

    /// Set the width of each guard zone.
    #[must_use]
    pub const fn with_zone_len(mut self, zone_len: usize) -> Self {
        self.zone_len = zone_len;
        self
    }

    /// Set the growth policy.
    #[must_use]
    pub const fn with_growth(mut self, growth: Growth) -> Self {
        self.growth = growth;
        self
    }

    /// Whether guard zones are written and checked at all.
    #[inline]
    pub const fn guards_enabled(&self) -> bool {
        self.zone_len > 0
    }
}
