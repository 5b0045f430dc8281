use core::fmt::Display;

/// Status code returned for every drawing request.
///
/// Encoded as a 4-byte little-endian integer. ReadTouchscreen requests get
/// the sample itself instead, with no status in front of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum Status {
    Ok = 0,
    OutOfBounds = 1,
    InvalidPayload = 2,
    InvalidColor = 3,
    InvalidCharacter = 4,
    DeviceError = 5,
    UnknownCommand = 6,
}

impl Status {
    /// Size of the status on the wire
    pub const SIZE: usize = 4;

    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }

    pub fn to_bytes(self) -> [u8; 4] {
        (self as u32).to_le_bytes()
    }

    /// Decode a status, returning the raw value if it is unknown.
    pub fn from_bytes(bytes: &[u8; 4]) -> Result<Self, u32> {
        match u32::from_le_bytes(*bytes) {
            0 => Ok(Status::Ok),
            1 => Ok(Status::OutOfBounds),
            2 => Ok(Status::InvalidPayload),
            3 => Ok(Status::InvalidColor),
            4 => Ok(Status::InvalidCharacter),
            5 => Ok(Status::DeviceError),
            6 => Ok(Status::UnknownCommand),
            other => Err(other),
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Status::Ok => write!(f, "success"),
            Status::OutOfBounds => write!(f, "region exceeds the panel"),
            Status::InvalidPayload => write!(f, "payload length does not match the header"),
            Status::InvalidColor => write!(f, "invalid colour"),
            Status::InvalidCharacter => write!(f, "text contains a character without glyph"),
            Status::DeviceError => write!(f, "display device failure"),
            Status::UnknownCommand => write!(f, "unknown command"),
        }
    }
}
