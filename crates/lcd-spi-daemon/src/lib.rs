//! lcd-spi-daemon: owner of the SPI panel and touchscreen.
//!
//! The library holds everything between the Unix socket and the kernel
//! transfer devices: the request decoder, the drawing engine and the pieces
//! it is built from. `main.rs` only wires them to real devices and a socket.

pub mod color;
pub mod controller;
pub mod daemon;
pub mod device;
pub mod draw;
pub mod error;
pub mod font;
pub mod glyph;
pub mod ipc;
pub mod region;

pub use daemon::Daemon;
pub use error::{DeviceError, DrawError};
