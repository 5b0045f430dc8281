//! One client connection: read a request, run it, answer, close.

use std::{fmt::Display, io, time::Duration};

use lcd_spi_common::Status;
use log::{debug, trace};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    time::timeout,
};

use super::{DecodeError, RequestDecoder, Response};
use crate::{
    daemon::Daemon,
    device::{TouchSensor, TransferDevice},
};

/// Upper bound of a single socket read
const READ_CHUNK: usize = 4096;

#[derive(Debug)]
pub enum SessionError {
    /// The client closed the connection in the middle of a request
    ShortRead { missing: usize },
    /// No data arrived within the read timeout
    Timeout,
    Io(io::Error),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::ShortRead { missing } => {
                write!(f, "Connection closed with {} bytes missing", missing)
            }
            SessionError::Timeout => write!(f, "Timed out waiting for request data"),
            SessionError::Io(e) => write!(f, "Socket error: {}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(e: io::Error) -> Self {
        SessionError::Io(e)
    }
}

/// Serve a single request on `stream`.
///
/// Bytes are read exactly as the decoder asks for them, each read bounded by
/// `read_timeout`. A request cut short (EOF, timeout or socket error) is
/// dropped without touching the panel and without a reply. The stream is
/// shut down once the response, if any, is written.
pub async fn handle_connection<S, D, T>(
    mut stream: S,
    daemon: &mut Daemon<D, T>,
    read_timeout: Duration,
) -> Result<(), SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    D: TransferDevice,
    T: TouchSensor,
{
    let mut decoder = RequestDecoder::default();
    let mut read_buf = [0u8; READ_CHUNK];

    let response = loop {
        trace!("Session loop in state {:?}", decoder.state());
        match decoder.progress() {
            Ok(request) => break daemon.handle(request),
            Err(DecodeError::IngestEmpty) => {}
            Err(DecodeError::UnknownCommand(tag)) => {
                debug!("Rejecting unknown command tag {}", tag);
                break Some(Response::Status(Status::UnknownCommand));
            }
            Err(DecodeError::PayloadTooLarge { tag, len }) => {
                debug!("Rejecting {} with a {} byte payload", tag, len);
                break Some(Response::Status(Status::OutOfBounds));
            }
            Err(e @ (DecodeError::IngestFull { .. } | DecodeError::Finished)) => {
                // Exact-length reads never over-feed the decoder
                debug!("Decoder in unexpected state: {}", e);
                break None;
            }
        }

        let wanted = decoder.wanted().min(READ_CHUNK);
        let buf = &mut read_buf[..wanted];
        match timeout(read_timeout, stream.read_exact(buf)).await {
            Err(_) => return Err(SessionError::Timeout),
            Ok(Err(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(SessionError::ShortRead {
                    missing: decoder.wanted(),
                });
            }
            Ok(Err(e)) => return Err(e.into()),
            Ok(Ok(_)) => {}
        }
        if let Err(e) = decoder.ingest(buf) {
            debug!("Decoder refused data: {}", e);
        }
    };

    if let Some(response) = response {
        stream.write_all(&response.to_bytes()).await?;
        stream.flush().await?;
    }
    stream.shutdown().await?;
    Ok(())
}
