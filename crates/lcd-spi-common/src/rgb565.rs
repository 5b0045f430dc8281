//! RGB565 pixel layout shared by everything that builds pixels for the panel.

/// Largest value of the red and blue channels (5 bits).
pub const RB_MAX: u8 = 31;
/// Largest value of the green channel (6 bits).
pub const G_MAX: u8 = 63;

/// Packed pixel, in the byte order the controller expects on the bus.
pub type Pixel = [u8; 2];

/// Whether every channel fits its bit width.
pub fn channels_in_range(red: u8, green: u8, blue: u8) -> bool {
    red <= RB_MAX && green <= G_MAX && blue <= RB_MAX
}

/// Pack channels into a pixel: `rrrrrggg gggbbbbb`.
///
/// Bits above each channel's width are dropped; check with
/// [channels_in_range] first when the input is untrusted.
pub fn pack_rgb565(red: u8, green: u8, blue: u8) -> Pixel {
    let (r, g, b) = (red & RB_MAX, green & G_MAX, blue & RB_MAX);
    [(r << 3) | (g >> 3), ((g & 0x07) << 5) | b]
}

/// Split a pixel back into its channels.
pub fn unpack_rgb565(pixel: Pixel) -> (u8, u8, u8) {
    (
        pixel[0] >> 3,
        ((pixel[0] & 0x07) << 3) | (pixel[1] >> 5),
        pixel[1] & RB_MAX,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_rgb565() {
        assert_eq!(pack_rgb565(0, 0, 0), [0x00, 0x00]);
        assert_eq!(pack_rgb565(RB_MAX, G_MAX, RB_MAX), [0xFF, 0xFF]);
        assert_eq!(pack_rgb565(31, 0, 0), [0xF8, 0x00]);
        assert_eq!(pack_rgb565(0, 63, 0), [0x07, 0xE0]);
        assert_eq!(pack_rgb565(0, 0, 31), [0x00, 0x1F]);
        assert_eq!(unpack_rgb565([0x07, 0xE0]), (0, 63, 0));
    }

    #[test]
    fn test_channels_in_range() {
        assert!(channels_in_range(RB_MAX, G_MAX, RB_MAX));
        assert!(!channels_in_range(32, 0, 0));
        assert!(!channels_in_range(0, 64, 0));
        assert!(!channels_in_range(0, 0, 32));
    }
}
