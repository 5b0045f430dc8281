use core::fmt::Display;

/// Command tag opening every request on the socket.
///
/// Encoded as a 4-byte little-endian integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum CommandTag {
    /// Render text at a character cell position.
    WriteText = 1,
    /// Copy raw RGB565 pixels into a region.
    WriteBitmap = 2,
    /// Fill a region with a palette colour.
    WriteRectangle = 3,
    /// Sample the touchscreen.
    ReadTouchscreen = 4,
}

impl CommandTag {
    /// Size of the tag on the wire
    pub const SIZE: usize = 4;

    /// Decode a tag, returning the raw value if it is not a known command.
    pub fn from_bytes(bytes: &[u8; 4]) -> Result<Self, u32> {
        Self::try_from(u32::from_le_bytes(*bytes))
    }

    /// Encode the tag in wire order.
    pub fn to_bytes(self) -> [u8; 4] {
        (self as u32).to_le_bytes()
    }

    /// Whether the tag is followed by a geometry [Header](crate::Header).
    pub fn has_header(self) -> bool {
        !matches!(self, CommandTag::ReadTouchscreen)
    }
}

impl TryFrom<u32> for CommandTag {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CommandTag::WriteText),
            2 => Ok(CommandTag::WriteBitmap),
            3 => Ok(CommandTag::WriteRectangle),
            4 => Ok(CommandTag::ReadTouchscreen),
            other => Err(other),
        }
    }
}

impl Display for CommandTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CommandTag::WriteText => write!(f, "WriteText"),
            CommandTag::WriteBitmap => write!(f, "WriteBitmap"),
            CommandTag::WriteRectangle => write!(f, "WriteRectangle"),
            CommandTag::ReadTouchscreen => write!(f, "ReadTouchscreen"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_from_bytes() {
        assert_eq!(
            CommandTag::from_bytes(&[1, 0, 0, 0]),
            Ok(CommandTag::WriteText)
        );
        assert_eq!(
            CommandTag::from_bytes(&[4, 0, 0, 0]),
            Ok(CommandTag::ReadTouchscreen)
        );
        assert_eq!(CommandTag::from_bytes(&[0, 0, 0, 0]), Err(0));
        assert_eq!(CommandTag::from_bytes(&[2, 0, 0, 1]), Err(0x0100_0002));
    }

    #[test]
    fn test_tag_header_presence() {
        assert!(CommandTag::WriteText.has_header());
        assert!(CommandTag::WriteBitmap.has_header());
        assert!(CommandTag::WriteRectangle.has_header());
        assert!(!CommandTag::ReadTouchscreen.has_header());
    }
}
