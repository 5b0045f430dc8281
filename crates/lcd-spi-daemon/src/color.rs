//! Colour codec: 5/6/5-bit channel triples to the controller's RGB565 bytes.

pub use lcd_spi_common::{G_MAX, Pixel, RB_MAX};
use lcd_spi_common::{Color, channels_in_range, pack_rgb565, unpack_rgb565};

use crate::error::DrawError;

/// A validated 5/6/5-bit colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb565 {
    r: u8,
    g: u8,
    b: u8,
}

impl Rgb565 {
    /// Build a colour, rejecting channels wider than their bit budget.
    pub fn new(r: u8, g: u8, b: u8) -> Result<Self, DrawError> {
        if !channels_in_range(r, g, b) {
            return Err(DrawError::InvalidColor);
        }
        Ok(Rgb565 { r, g, b })
    }

    /// Build a colour from 8-bit channels by dropping the low bits.
    pub fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        Rgb565 {
            r: r >> 3,
            g: g >> 2,
            b: b >> 3,
        }
    }

    pub fn channels(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    pub fn to_pixel(self) -> Pixel {
        pack_rgb565(self.r, self.g, self.b)
    }

    pub fn from_pixel(pixel: Pixel) -> Self {
        let (r, g, b) = unpack_rgb565(pixel);
        Rgb565 { r, g, b }
    }
}

/// Pack a colour for the panel.
pub fn to_panel(red: u8, green: u8, blue: u8) -> Result<Pixel, DrawError> {
    Rgb565::new(red, green, blue).map(Rgb565::to_pixel)
}

/// Unpack a panel pixel back into its channels.
pub fn from_panel(pixel: Pixel) -> (u8, u8, u8) {
    Rgb565::from_pixel(pixel).channels()
}

/// Pack an 8-bit-per-channel triple, as returned by a panel memory read.
pub fn from_camera(r8: u8, g8: u8, b8: u8) -> Pixel {
    Rgb565::from_rgb888(r8, g8, b8).to_pixel()
}

/// Channels of a palette colour, `None` for the background sentinel.
pub fn palette(color: Color) -> Option<Rgb565> {
    let (r, g, b) = match color {
        Color::Black => (0, 0, 0),
        Color::White => (RB_MAX, G_MAX, RB_MAX),
        Color::Red => (RB_MAX, 0, 0),
        Color::Blue => (0, 0, RB_MAX),
        Color::Yellow => (RB_MAX, G_MAX, 0),
        Color::Green => (0, G_MAX, 0),
        Color::Brown => (20, 10, 5),
        Color::Background => return None,
    };
    Some(Rgb565 { r, g, b })
}

/// Resolve a wire palette index.
pub fn color_from_index(index: u8) -> Result<Color, DrawError> {
    Color::try_from(index).map_err(|_| DrawError::InvalidColor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_panel_packing() {
        assert_eq!(to_panel(0, 0, 0).unwrap(), [0x00, 0x00]);
        assert_eq!(to_panel(31, 63, 31).unwrap(), [0xFF, 0xFF]);
        assert_eq!(to_panel(31, 0, 0).unwrap(), [0xF8, 0x00]);
        assert_eq!(to_panel(0, 63, 0).unwrap(), [0x07, 0xE0]);
        assert_eq!(to_panel(0, 0, 31).unwrap(), [0x00, 0x1F]);
    }

    #[test]
    fn test_round_trip_all_colors() {
        for r in 0..=RB_MAX {
            for g in 0..=G_MAX {
                for b in 0..=RB_MAX {
                    let pixel = to_panel(r, g, b).unwrap();
                    assert_eq!(from_panel(pixel), (r, g, b));
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_channels_rejected() {
        assert!(matches!(to_panel(32, 0, 0), Err(DrawError::InvalidColor)));
        assert!(matches!(to_panel(0, 64, 0), Err(DrawError::InvalidColor)));
        assert!(matches!(to_panel(0, 0, 32), Err(DrawError::InvalidColor)));
        assert!(matches!(to_panel(255, 255, 255), Err(DrawError::InvalidColor)));
    }

    #[test]
    fn test_from_camera_downshifts() {
        assert_eq!(from_camera(0xFF, 0xFF, 0xFF), [0xFF, 0xFF]);
        assert_eq!(from_camera(0x07, 0x03, 0x07), [0x00, 0x00]);
        assert_eq!(from_camera(0xF8, 0xFC, 0xF8), to_panel(31, 63, 31).unwrap());
        assert_eq!(from_camera(0x80, 0x40, 0x20), to_panel(16, 16, 4).unwrap());
    }

    #[test]
    fn test_palette() {
        assert_eq!(palette(Color::White).unwrap().to_pixel(), [0xFF, 0xFF]);
        assert_eq!(palette(Color::Black).unwrap().to_pixel(), [0x00, 0x00]);
        assert!(palette(Color::Background).is_none());
        assert!(matches!(color_from_index(8), Err(DrawError::InvalidColor)));
        assert_eq!(color_from_index(2).unwrap(), Color::Red);
    }
}
