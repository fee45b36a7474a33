//! Per-cell attributes consumed by the text shader.

use super::color::{Modifiers, Rgb};
use super::typed::{Record, TypedData};
use crate::error::OverrunError;

/// Colors and decorations for one cell.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Attributes {
    /// Text color.
    pub fg: Rgb,
    /// Cell background color.
    pub bg: Rgb,
    /// Underline color; ignored when `underline` is 0.
    pub underline_color: Rgb,
    /// Underline style, 0 for none.
    pub underline: u8,
    /// Text modifiers.
    pub modifiers: Modifiers,
    _padding: u8,
}

const _: () = assert!(std::mem::size_of::<Attributes>() == 12);

impl Attributes {
    /// Plain attributes with the given colors.
    pub const fn new(fg: Rgb, bg: Rgb) -> Self {
        Self {
            fg,
            bg,
            underline_color: fg,
            underline: 0,
            modifiers: Modifiers::empty(),
            _padding: 0,
        }
    }

    /// Set the underline style and color.
    #[must_use]
    pub const fn with_underline(mut self, underline: u8, color: Rgb) -> Self {
        self.underline = underline;
        self.underline_color = color;
        self
    }

    /// Set the modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl Record for Attributes {
    const LABEL: &'static str = "attributes";
    const GUARD_ZONES: usize = 3;
}

/// Attribute storage, three guard zones.
pub type AttributesData = TypedData<Attributes>;

impl TypedData<Attributes> {
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

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use crate::config::DataConfig;

    #[test]
    fn test_attributes_builders() {
        let attrs = Attributes::new(Rgb::WHITE, Rgb::BLACK)
            .with_underline(3, Rgb::new(255, 0, 0))
            .with_modifiers(Modifiers::ITALIC);
        assert_eq!(attrs.underline, 3);
        assert_eq!(attrs.underline_color, Rgb::new(255, 0, 0));
        assert_eq!(attrs.modifiers, Modifiers::ITALIC);
    }

    #[test]
    fn test_attributes_row_checks() {
        let mut data = AttributesData::data_of_length(80);
        for x in 0..80 {
            data.write(x, Attributes::new(Rgb::WHITE, Rgb::BLACK));
        }
        data.check_for_overrun();
        data.check_for_overrun1();
        data.check_for_overrun2();
    }

    #[test]
    fn test_attributes_zone_isolation() {
        let config = DataConfig::default().with_zone_len(4);
        let mut data = AttributesData::with_config(2, config);
        // zone 0 = [24, 28), zone 1 = [28, 32), zone 2 = [32, 36)
        unsafe { data.mutable_bytes().add(29).write(0) };

        assert!(data.try_check_for_overrun2().is_ok());
        assert_eq!(data.try_check_for_overrun1().unwrap_err().offset(), 29);
        assert_eq!(data.try_check_for_overrun().unwrap_err().zone(), 1);
    }

    #[test]
    #[should_panic(expected = "attributes overrun: guard zone 2")]
    fn test_attributes_check2_panics() {
        let config = DataConfig::default().with_zone_len(4);
        let mut data = AttributesData::with_config(1, config);
        unsafe { data.mutable_bytes().add(12 + 8).write(0) };
        data.check_for_overrun2();
    }
}
