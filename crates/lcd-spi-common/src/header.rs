use crate::{BYTES_PER_PIXEL, CommandTag};

/// Geometry block following the command tag of every drawing request.
///
/// Four little-endian `u16` fields, in order `x, y, dx, dy`. For text
/// requests `x`/`y` are the starting character cell, `dx` is the text length
/// and `dy` packs the foreground (high byte) and background (low byte)
/// palette indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Header {
    pub x: u16,
    pub y: u16,
    pub dx: u16,
    pub dy: u16,
}

impl Header {
    /// Size of the header on the wire
    pub const SIZE: usize = 8;

    pub fn new(x: u16, y: u16, dx: u16, dy: u16) -> Self {
        Header { x, y, dx, dy }
    }

    /// Build the header of a text request.
    pub fn text(col: u16, row: u16, len: u16, fg: u8, bg: u8) -> Self {
        Header {
            x: col,
            y: row,
            dx: len,
            dy: ((fg as u16) << 8) | bg as u16,
        }
    }

    /// Foreground and background palette indices of a text request.
    pub fn text_colors(&self) -> (u8, u8) {
        ((self.dy >> 8) as u8, (self.dy & 0xFF) as u8)
    }

    pub fn from_bytes(bytes: &[u8; 8]) -> Self {
        Header {
            x: u16::from_le_bytes([bytes[0], bytes[1]]),
            y: u16::from_le_bytes([bytes[2], bytes[3]]),
            dx: u16::from_le_bytes([bytes[4], bytes[5]]),
            dy: u16::from_le_bytes([bytes[6], bytes[7]]),
        }
    }

    pub fn to_bytes(&self) -> [u8; 8] {
        let mut bytes = [0u8; 8];
        bytes[0..2].copy_from_slice(&self.x.to_le_bytes());
        bytes[2..4].copy_from_slice(&self.y.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.dx.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.dy.to_le_bytes());
        bytes
    }

    /// Number of payload bytes that follow this header for the given command.
    ///
    /// Known before any payload byte is read, so the payload can be received
    /// with a single exact-length read.
    pub fn payload_len(&self, tag: CommandTag) -> usize {
        match tag {
            CommandTag::WriteText => self.dx as usize,
            CommandTag::WriteBitmap => (self.dx as usize)
                .saturating_mul(self.dy as usize)
                .saturating_mul(BYTES_PER_PIXEL),
            CommandTag::WriteRectangle => 1,
            CommandTag::ReadTouchscreen => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_wire_order() {
        let header = Header::new(0x0102, 0x0304, 10, 0xAABB);
        assert_eq!(
            header.to_bytes(),
            [0x02, 0x01, 0x04, 0x03, 10, 0, 0xBB, 0xAA]
        );
        assert_eq!(Header::from_bytes(&header.to_bytes()), header);
    }

    #[test]
    fn test_header_payload_len() {
        let header = Header::new(0, 0, 10, 10);
        assert_eq!(header.payload_len(CommandTag::WriteText), 10);
        assert_eq!(header.payload_len(CommandTag::WriteBitmap), 200);
        assert_eq!(header.payload_len(CommandTag::WriteRectangle), 1);
        assert_eq!(header.payload_len(CommandTag::ReadTouchscreen), 0);

        // No overflow for the largest declared geometry, even on 32-bit targets
        let header = Header::new(0, 0, u16::MAX, u16::MAX);
        assert!(header.payload_len(CommandTag::WriteBitmap) > crate::PANEL_BYTES);
    }

    #[test]
    fn test_header_text_colors() {
        let header = Header::text(40, 39, 5, 1, 0);
        assert_eq!(header.dy, 0x0100);
        assert_eq!(header.text_colors(), (1, 0));
    }
}
