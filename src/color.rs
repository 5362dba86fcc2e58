//! Color type for monochrome e-paper panels
//!
//! RAM holds 1 bit per pixel: a set bit is white, a cleared bit is black.
//!
//! ## Example
//!
//! ```
//! use epd_ssd1677::Color;
//!
//! // Fill values for whole bytes of the frame buffer
//! assert_eq!(Color::Black.byte(), 0x00);
//! assert_eq!(Color::White.byte(), 0xFF);
//! ```

/// Colors supported by the panel
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum Color {
    /// Black pixels
    Black,
    /// White pixels
    #[default]
    White,
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU1;
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::BinaryColor> for Color {
    /// `On` draws ink, so it maps to black
    fn from(color: embedded_graphics_core::pixelcolor::BinaryColor) -> Self {
        match color {
            embedded_graphics_core::pixelcolor::BinaryColor::On => Self::Black,
            embedded_graphics_core::pixelcolor::BinaryColor::Off => Self::White,
        }
    }
}

impl Color {
    /// Byte with all 8 pixels set to this color
    pub fn byte(self) -> u8 {
        match self {
            Self::Black => 0x00,
            Self::White => 0xFF,
        }
    }
}
