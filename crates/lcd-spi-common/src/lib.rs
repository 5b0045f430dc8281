//! Wire-level primitives shared by the lcd-spi daemon and its clients.
//!
//! Everything in here is fixed-size and allocation free so it can be used
//! on both sides of the Unix socket without pulling in the daemon.
#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod color;
mod command;
mod header;
mod panel;
mod rgb565;
mod status;
mod touch;

pub use color::{Color, UnknownColor};
pub use command::CommandTag;
pub use header::Header;
pub use panel::*;
pub use rgb565::{G_MAX, Pixel, RB_MAX, channels_in_range, pack_rgb565, unpack_rgb565};
pub use status::Status;
pub use touch::TouchSample;

/// Default path of the daemon's listening socket.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/lcd_spi_socket";
