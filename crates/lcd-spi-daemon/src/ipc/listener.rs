//! Listening socket setup and the accept loop.

use std::{
    io,
    os::{fd::AsRawFd, unix::net::UnixListener as StdUnixListener},
    path::Path,
    time::Duration,
};

use log::{debug, warn};
use tokio::net::UnixListener;

use super::handle_connection;
use crate::{
    Daemon,
    device::{TouchSensor, TransferDevice},
};

/// Pending connections queued by the kernel
pub const BACKLOG: i32 = 2;

/// Bind a stream socket at `path` with the given listen `backlog`.
///
/// A file left at `path` by a previous run is removed first. Must be called
/// from within a tokio runtime.
pub fn bind(path: &Path, backlog: i32) -> io::Result<UnixListener> {
    match std::fs::remove_file(path) {
        Ok(()) => debug!("Removed stale socket {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let listener = StdUnixListener::bind(path)?;
    // std listens with its own backlog; shrink it to ours
    // SAFETY: the descriptor is owned by `listener` and stays open for the call
    if unsafe { libc::listen(listener.as_raw_fd(), backlog) } < 0 {
        return Err(io::Error::last_os_error());
    }
    listener.set_nonblocking(true)?;
    UnixListener::from_std(listener)
}

/// Serve connections from `listener` one at a time until `shutdown`
/// completes.
///
/// Each connection is handled to completion before the next is accepted.
/// Failed sessions and failed accepts are logged and do not stop the loop.
pub async fn serve<D, T, F>(
    listener: &UnixListener,
    daemon: &mut Daemon<D, T>,
    read_timeout: Duration,
    shutdown: F,
) where
    D: TransferDevice,
    T: TouchSensor,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, _)) => {
                        debug!("New client connection");
                        if let Err(e) = handle_connection(stream, daemon, read_timeout).await {
                            warn!("Error handling client connection: {}", e);
                        }
                    }
                    Err(e) => {
                        warn!("Failed to accept client connection: {}", e);
                    }
                }
            }
        }
    }
}
