//! # Framedata
//!
//! Per-frame render buffers for a text-rendering pipeline.
//!
//! Glyph keys, cell attributes, background runs and bitmaps are rebuilt every
//! frame. Zeroing or reallocating them at that rate is measurable, so the
//! buffers here never initialise storage and never shrink it.
//!
//! ## Core Concepts
//!
//! - **No zeroing**: allocation and growth leave new bytes uninitialised
//! - **No shrinking**: `set_length` within capacity is a metadata update
//! - **Guard zones**: canary bytes after the storage catch writers that ran past it
//! - **Typed views**: one generic [`TypedData`] per record kind
//! - **Pooling**: [`DataPool`] recycles views across frames and threads
//!
//! ## Example
//!
//! ```rust
//! use framedata::{GlyphKey, GlyphKeyData, Typeface};
//!
//! let mut keys = GlyphKeyData::data_of_length(80);
//! for (x, ch) in "hello".chars().enumerate() {
//!     keys.write(x, GlyphKey::new(ch, Typeface::empty()));
//! }
//! keys.set_count(5);
//! keys.check_for_overrun();
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod data;
pub mod error;
pub mod pool;
pub mod view;

// Re-exports for convenience
pub use config::{DataConfig, Growth};
pub use data::RawData;
pub use error::OverrunError;
pub use pool::{DataPool, Recycler};
pub use view::{
    Attributes, AttributesData, BackgroundColorRle, BackgroundColorRlesData, BitmapData, CharFlags,
    GlyphFlags, GlyphKey, GlyphKeyData, Modifiers, Record, Rgb, ScreenChar, ScreenCharData,
    Typeface, TypedData,
};
