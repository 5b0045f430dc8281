//! Socket protocol: request decoding, per-connection handling and the
//! listening socket.
//!
//! A request is a 4-byte command tag, then (for drawing commands) an 8-byte
//! geometry [Header], then a payload whose length follows from the header.
//! One connection carries exactly one request.

use lcd_spi_common::{CommandTag, Status, TouchSample};

use crate::region::Region;

pub mod decoder;
pub mod listener;
pub mod session;


pub use decoder::{DecodeError, DecodeState, RequestDecoder};
pub use session::{SessionError, handle_connection};

/// A decoded request. Each variant only carries its own fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    /// Text starting at character cell (`col`, `row`), palette indices as sent
    WriteText {
        col: u16,
        row: u16,
        fg: u8,
        bg: u8,
        text: Vec<u8>,
    },
    /// Raw RGB565 pixels for `region`
    WriteBitmap { region: Region, pixels: Vec<u8> },
    /// Fill `region` with the palette colour at index `color`
    WriteRectangle { region: Region, color: u8 },
    ReadTouchscreen,
}

impl Request {
    pub fn tag(&self) -> CommandTag {
        match self {
            Request::WriteText { .. } => CommandTag::WriteText,
            Request::WriteBitmap { .. } => CommandTag::WriteBitmap,
            Request::WriteRectangle { .. } => CommandTag::WriteRectangle,
            Request::ReadTouchscreen => CommandTag::ReadTouchscreen,
        }
    }
}

/// What goes back to the client before the connection is closed.
///
/// Drawing requests are answered with a status; touchscreen reads with the
/// bare sample and no status in front of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    Status(Status),
    Touch(TouchSample),
}

impl Response {
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Response::Status(status) => status.to_bytes().to_vec(),
            Response::Touch(sample) => sample.to_bytes().to_vec(),
        }
    }
}
