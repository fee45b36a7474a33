//! Screen-character cells and their view.
//!
//! ```text
//! ┌──────────┬─────────┬─────────┬─────┬───────┬─────────┐
//! │   code   │   fg    │   bg    │ mod │ flags │   pad   │
//! │   u32    │ [u8; 3] │ [u8; 3] │ u8  │  u8   │ [u8; 2] │
//! └──────────┴─────────┴─────────┴─────┴───────┴─────────┘
//! ```

use super::color::{Modifiers, Rgb};
use super::typed::{Record, TypedData};
use bitflags::bitflags;

bitflags! {
    /// Cell-level flags.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
    pub struct CharFlags: u8 {
        /// `code` indexes a complex-character table instead of a code point.
        const COMPLEX = 0b0000_0001;
    }
}

/// One character cell of the screen grid.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ScreenChar {
    /// Code point or complex-character index.
    pub code: u32,
    /// Foreground color.
    pub fg: Rgb,
    /// Background color.
    pub bg: Rgb,
    /// Text modifiers.
    pub modifiers: Modifiers,
    /// Cell flags.
    pub flags: CharFlags,
    _padding: [u8; 2],
}

const _: () = assert!(
    std::mem::size_of::<ScreenChar>() == 16,
    "ScreenChar must be exactly 16 bytes"
);

impl ScreenChar {
    /// A blank cell with default colors.
    pub const EMPTY: Self = Self::new(' ');

    /// A plain cell for `ch`.
    pub const fn new(ch: char) -> Self {
        Self {
            code: ch as u32,
            fg: Rgb::WHITE,
            bg: Rgb::BLACK,
            modifiers: Modifiers::empty(),
            flags: CharFlags::empty(),
            _padding: [0; 2],
        }
    }

    /// Set the foreground color.
    #[must_use]
    pub const fn with_fg(mut self, fg: Rgb) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background color.
    #[must_use]
    pub const fn with_bg(mut self, bg: Rgb) -> Self {
        self.bg = bg;
        self
    }

    /// Set the modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl Default for ScreenChar {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Record for ScreenChar {
    const LABEL: &'static str = "screen chars";
    const GUARD_ZONES: usize = 1;
}

/// Screen-character storage, one guard zone.
pub type ScreenCharData = TypedData<ScreenChar>;
