//! RequestDecoder: sans-io decoder turning raw socket bytes into a [Request].

use std::{fmt::Display, mem};

use lcd_spi_common::{CommandTag, Header, PANEL_BYTES};

use super::Request;
use crate::region::Region;

/// Where the decoder stands in the request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeState {
    /// Waiting for the 4-byte command tag
    AwaitCommand,
    /// Waiting for the geometry header of a drawing command
    AwaitHeader(CommandTag),
    /// Waiting for `len` payload bytes
    AwaitPayload {
        tag: CommandTag,
        header: Header,
        len: usize,
    },
    /// A request was produced (or rejected); nothing more is read
    Done,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// Ingest blocks, more bytes were offered than the current state needs
    ///
    /// The `read` field indicates how many bytes were taken.
    IngestFull { read: usize },
    /// Not enough bytes buffered to make progress
    IngestEmpty,
    /// The command tag is not a known command
    UnknownCommand(u32),
    /// The header declares a payload larger than the panel can hold
    PayloadTooLarge { tag: CommandTag, len: usize },
    /// The request was already decoded
    Finished,
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::IngestFull { read } => {
                write!(f, "Ingest buffer full after reading {} bytes", read)
            }
            DecodeError::IngestEmpty => write!(f, "Ingest buffer is empty"),
            DecodeError::UnknownCommand(tag) => write!(f, "Unknown command tag {}", tag),
            DecodeError::PayloadTooLarge { tag, len } => {
                write!(f, "{} payload of {} bytes is too large", tag, len)
            }
            DecodeError::Finished => write!(f, "Request already decoded"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// RequestDecoder: sans-io decoder for one request.
///
/// The decoder never buffers more than the current state needs:
/// [RequestDecoder::wanted] tells the caller exactly how many bytes to read
/// next, so the socket is drained with exact-length reads and nothing past
/// the request is consumed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestDecoder {
    state: DecodeState,
    ingest: Vec<u8>,
    max_payload: usize,
}

impl RequestDecoder {
    /// Create a decoder accepting payloads up to `max_payload` bytes
    pub fn new(max_payload: usize) -> Self {
        RequestDecoder {
            state: DecodeState::AwaitCommand,
            ingest: Vec::with_capacity(Header::SIZE),
            max_payload,
        }
    }

    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// Number of bytes the current state still needs.
    pub fn wanted(&self) -> usize {
        let total = match self.state {
            DecodeState::AwaitCommand => CommandTag::SIZE,
            DecodeState::AwaitHeader(_) => Header::SIZE,
            DecodeState::AwaitPayload { len, .. } => len,
            DecodeState::Done => 0,
        };
        total - self.ingest.len()
    }

    /// Ingest raw data, taking at most [RequestDecoder::wanted] bytes
    pub fn ingest(&mut self, data: &[u8]) -> Result<(), DecodeError> {
        let to_read = self.wanted().min(data.len());
        self.ingest.extend_from_slice(&data[..to_read]);
        if to_read < data.len() {
            Err(DecodeError::IngestFull { read: to_read })
        } else {
            Ok(())
        }
    }

    /// Make progress, moving through the states as far as the ingested data
    /// allows.
    ///
    /// Returns the request once its last byte is in, or
    /// [DecodeError::IngestEmpty] when more data is needed.
    pub fn progress(&mut self) -> Result<Request, DecodeError> {
        loop {
            match self.state {
                DecodeState::AwaitCommand => {
                    if self.ingest.len() < CommandTag::SIZE {
                        return Err(DecodeError::IngestEmpty);
                    }
                    let mut buf = [0u8; CommandTag::SIZE];
                    buf.copy_from_slice(&self.ingest[..CommandTag::SIZE]);
                    self.ingest.clear();
                    let tag = match CommandTag::from_bytes(&buf) {
                        Ok(tag) => tag,
                        Err(raw) => {
                            self.state = DecodeState::Done;
                            return Err(DecodeError::UnknownCommand(raw));
                        }
                    };
                    if !tag.has_header() {
                        self.state = DecodeState::Done;
                        return Ok(Request::ReadTouchscreen);
                    }
                    self.state = DecodeState::AwaitHeader(tag);
                }
                DecodeState::AwaitHeader(tag) => {
                    if self.ingest.len() < Header::SIZE {
                        return Err(DecodeError::IngestEmpty);
                    }
                    let mut buf = [0u8; Header::SIZE];
                    buf.copy_from_slice(&self.ingest[..Header::SIZE]);
                    self.ingest.clear();
                    let header = Header::from_bytes(&buf);
                    let len = header.payload_len(tag);
                    if len > self.max_payload {
                        self.state = DecodeState::Done;
                        return Err(DecodeError::PayloadTooLarge { tag, len });
                    }
                    self.ingest.reserve_exact(len);
                    self.state = DecodeState::AwaitPayload { tag, header, len };
                }
                DecodeState::AwaitPayload { tag, header, len } => {
                    if self.ingest.len() < len {
                        return Err(DecodeError::IngestEmpty);
                    }
                    let payload = mem::take(&mut self.ingest);
                    self.state = DecodeState::Done;
                    return Ok(Self::build(tag, header, payload));
                }
                DecodeState::Done => return Err(DecodeError::Finished),
            }
        }
    }

    fn build(tag: CommandTag, header: Header, payload: Vec<u8>) -> Request {
        let region = Region::new(header.x, header.y, header.dx, header.dy);
        match tag {
            CommandTag::WriteText => {
                let (fg, bg) = header.text_colors();
                Request::WriteText {
                    col: header.x,
                    row: header.y,
                    fg,
                    bg,
                    text: payload,
                }
            }
            CommandTag::WriteBitmap => Request::WriteBitmap {
                region,
                pixels: payload,
            },
            CommandTag::WriteRectangle => Request::WriteRectangle {
                region,
                color: payload[0],
            },
            CommandTag::ReadTouchscreen => Request::ReadTouchscreen,
        }
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::new(PANEL_BYTES)
    }
}
