use std::fmt::Display;

use lcd_spi_common::Status;

/// Failure of a transfer device call.
#[derive(Debug)]
pub enum DeviceError {
    /// The ioctl (or open) failed at the OS level
    Io(std::io::Error),
    /// The driver reported fewer bytes than requested
    ///
    /// `expected` is the requested byte count, `actual` what the driver returned.
    ShortTransfer { expected: usize, actual: usize },
    /// The device is not present (e.g. no touch controller configured)
    Unavailable,
}

impl Display for DeviceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceError::Io(e) => write!(f, "device I/O error: {}", e),
            DeviceError::ShortTransfer { expected, actual } => write!(
                f,
                "short transfer: {} of {} bytes transferred",
                actual, expected
            ),
            DeviceError::Unavailable => write!(f, "device unavailable"),
        }
    }
}

impl std::error::Error for DeviceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeviceError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DeviceError {
    fn from(e: std::io::Error) -> Self {
        DeviceError::Io(e)
    }
}

/// Failure of a drawing operation.
///
/// Everything but [DrawError::Device] is detected before the device is
/// touched, so a rejected request never leaves a partial write behind.
#[derive(Debug)]
pub enum DrawError {
    /// Region does not fit on the panel
    OutOfBounds { x: u16, y: u16, dx: u16, dy: u16 },
    /// Payload length differs from what the region requires
    InvalidPayload { expected: usize, actual: usize },
    /// Colour channel out of range, or unknown palette index
    InvalidColor,
    /// Character outside the font table
    InvalidCharacter(u8),
    /// Transfer device call failed
    Device(DeviceError),
}

impl DrawError {
    /// Status code reported to the client for this error.
    pub fn status(&self) -> Status {
        match self {
            DrawError::OutOfBounds { .. } => Status::OutOfBounds,
            DrawError::InvalidPayload { .. } => Status::InvalidPayload,
            DrawError::InvalidColor => Status::InvalidColor,
            DrawError::InvalidCharacter(_) => Status::InvalidCharacter,
            DrawError::Device(_) => Status::DeviceError,
        }
    }
}

impl Display for DrawError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawError::OutOfBounds { x, y, dx, dy } => write!(
                f,
                "region x={} y={} dx={} dy={} exceeds the panel",
                x, y, dx, dy
            ),
            DrawError::InvalidPayload { expected, actual } => write!(
                f,
                "payload of {} bytes, expected {} bytes",
                actual, expected
            ),
            DrawError::InvalidColor => write!(f, "invalid colour"),
            DrawError::InvalidCharacter(c) => write!(f, "no glyph for character code {}", c),
            DrawError::Device(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DrawError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DrawError::Device(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DeviceError> for DrawError {
    fn from(e: DeviceError) -> Self {
        DrawError::Device(e)
    }
}
