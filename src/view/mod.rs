//! Typed views: [`RawData`](crate::data::RawData) interpreted as record arrays.
//!
//! | View | Record | Guard zones | Extra checks |
//! |---|---|---|---|
//! | [`ScreenCharData`] | [`ScreenChar`] | 1 | |
//! | [`GlyphKeyData`] | [`GlyphKey`] | 3 | `check_for_overrun1/2`, `base_pointer` |
//! | [`AttributesData`] | [`Attributes`] | 3 | `check_for_overrun1/2` |
//! | [`BackgroundColorRlesData`] | [`BackgroundColorRle`] | 1 | |
//! | [`BitmapData`] | `u8` | 1 | `check_for_overrun_with_info` |

mod attributes;
mod background;
mod bitmap;
mod color;
mod glyph_key;
mod screen_char;
mod typed;

pub use attributes::{Attributes, AttributesData};
pub use background::{BackgroundColorRle, BackgroundColorRlesData};
pub use bitmap::BitmapData;
pub use color::{Modifiers, Rgb};
pub use glyph_key::{GlyphFlags, GlyphKey, GlyphKeyData, Typeface};
pub use screen_char::{CharFlags, ScreenChar, ScreenCharData};
pub use typed::{Record, TypedData};
