//! Boundary to the kernel-resident SPI drivers.
//!
//! The drawing engine only sees the [TransferDevice] and [TouchSensor]
//! capabilities; [spi] implements them on top of the `lcd_spi` and
//! `touchpad_spi` character devices.

use lcd_spi_common::TouchSample;

use crate::error::DeviceError;

pub mod spi;

#[cfg(test)]
pub mod test_spy;

/// Bytes a read transfer clocks in before the answer: the one received while
/// the command goes out, then the controller's dummy byte. The drivers drop
/// both, so a read of `len` answer bytes is `len + READ_OVERHEAD` on the bus.
pub const READ_OVERHEAD: usize = 2;

/// Byte-level access to the display controller.
///
/// Every call completes synchronously. A single call never moves more than
/// [TransferDevice::max_transfer] bytes; splitting larger payloads is the
/// caller's job.
pub trait TransferDevice {
    /// Send a lone command byte.
    fn write_command(&mut self, cmd: u8) -> Result<(), DeviceError>;

    /// Send a command byte followed by its parameter bytes.
    fn write_command_with_data(&mut self, cmd: u8, data: &[u8]) -> Result<(), DeviceError>;

    /// Send data bytes (D/C high), e.g. pixels after a memory write command.
    fn write_data(&mut self, data: &[u8]) -> Result<(), DeviceError>;

    /// Send `cmd` and return the `len` answer bytes that follow the dummy
    /// byte. Counts [READ_OVERHEAD] extra bytes against
    /// [TransferDevice::max_transfer].
    fn read(&mut self, cmd: u8, len: usize) -> Result<Vec<u8>, DeviceError>;

    /// Reset the controller.
    fn reset(&mut self) -> Result<(), DeviceError>;

    /// Largest byte count accepted by a single call.
    fn max_transfer(&self) -> usize;
}

/// Access to the touchscreen controller.
pub trait TouchSensor {
    fn read_touch(&mut self) -> Result<TouchSample, DeviceError>;
}

/// A missing touch controller answers every read with [DeviceError::Unavailable].
impl<T: TouchSensor> TouchSensor for Option<T> {
    fn read_touch(&mut self) -> Result<TouchSample, DeviceError> {
        match self {
            Some(sensor) => sensor.read_touch(),
            None => Err(DeviceError::Unavailable),
        }
    }
}
