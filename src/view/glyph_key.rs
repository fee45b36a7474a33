//! Glyph keys: what the glyph cache is asked to rasterise, one per cell.
//!
//! The view carries three guard zones. The glyph-key pass writes the keys,
//! then later passes read them; each pass can check its own zone so a crash
//! report names the stage that noticed the damage.

#![allow(unsafe_code)]

use super::typed::{Record, TypedData};
use crate::error::OverrunError;
use bitflags::bitflags;

bitflags! {
    /// Font face selection for a glyph.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
    pub struct Typeface: u8 {
        /// Bold face.
        const BOLD = 0b01;
        /// Italic face.
        const ITALIC = 0b10;
    }
}

bitflags! {
    /// How a glyph is produced.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
    pub struct GlyphFlags: u8 {
        /// `code` indexes a complex-character table.
        const COMPLEX = 0b0001;
        /// Drawn procedurally as a box-drawing character.
        const BOX_DRAWING = 0b0010;
        /// Rasterise with thin strokes.
        const THIN_STROKES = 0b0100;
        /// Anything to draw at all.
        const DRAWABLE = 0b1000;
    }
}

/// Key identifying one rasterised glyph.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct GlyphKey {
    /// Code point or complex-character index.
    pub code: u32,
    /// Code point of a following combining mark, or 0.
    pub combining_successor: u32,
    /// Font face.
    pub typeface: Typeface,
    /// Glyph production flags.
    pub flags: GlyphFlags,
    _padding: [u8; 2],
}

const _: () = assert!(std::mem::size_of::<GlyphKey>() == 12);

impl GlyphKey {
    /// A drawable key for a plain character.
    pub const fn new(ch: char, typeface: Typeface) -> Self {
        Self {
            code: ch as u32,
            combining_successor: 0,
            typeface,
            flags: GlyphFlags::DRAWABLE,
            _padding: [0; 2],
        }
    }

    /// A key for a cell with nothing to draw.
    pub const fn blank() -> Self {
        Self {
            code: 0,
            combining_successor: 0,
            typeface: Typeface::empty(),
            flags: GlyphFlags::empty(),
            _padding: [0; 2],
        }
    }

    /// Whether the key produces any pixels.
    #[inline]
    pub const fn is_drawable(&self) -> bool {
        self.flags.contains(GlyphFlags::DRAWABLE)
    }
}

impl Record for GlyphKey {
    const LABEL: &'static str = "glyph keys";
    const GUARD_ZONES: usize = 3;
}

/// Glyph-key storage, three guard zones.
pub type GlyphKeyData = TypedData<GlyphKey>;

impl TypedData<GlyphKey> {
    /// Typed pointer to the first key, aliasing the byte storage.
    #[inline]
    pub fn base_pointer(&mut self) -> *mut GlyphKey {
        self.as_mut_ptr()
    }

    /// Inspect guard zone 1 and panic if it was modified.
    pub fn check_for_overrun1(&self) {
        self.check_zone(1);
    }

    /// Inspect guard zone 2 and panic if it was modified.
    pub fn check_for_overrun2(&self) {
        self.check_zone(2);
    }

    /// Inspect guard zone 1.
    pub fn try_check_for_overrun1(&self) -> Result<(), OverrunError> {
        self.try_check_zone(1)
    }

    /// Inspect guard zone 2.
    pub fn try_check_for_overrun2(&self) -> Result<(), OverrunError> {
        self.try_check_zone(2)
    }
}
