//! ioctl adapter for the `lcd_spi` and `touchpad_spi` character devices.
//!
//! Both drivers take a `struct lcdd_transfer` describing one SPI message:
//! a byte count, a transmit buffer and an optional receive buffer. The ioctl
//! number selects whether the bytes go out as command or data.
//!
//! For reads `byte_cnt` is the length of the whole message. Only the first
//! transmit byte is sent, the rest of the message is clocked with zeroes, and
//! the driver copies back `byte_cnt - 2` bytes: everything after the byte
//! received during the command and the dummy byte that follows it.

use std::{
    fs::{File, OpenOptions},
    mem,
    os::fd::AsRawFd,
    path::Path,
    ptr,
};

use lcd_spi_common::{PANEL_BYTES, TouchSample};
use log::{debug, trace};

use super::{READ_OVERHEAD, TouchSensor, TransferDevice};
use crate::{controller, error::DeviceError};

/// Default LCD character device
pub const DEFAULT_LCD_DEVICE: &str = "/dev/lcd_spi";
/// Default touchscreen character device
pub const DEFAULT_TOUCH_DEVICE: &str = "/dev/touchpad_spi";

/// Largest message the LCD driver buffers: one full frame.
pub const DEFAULT_MAX_TRANSFER: usize = PANEL_BYTES;
/// Smallest usable transfer limit: a command with a 4-byte address pair, or a
/// one-pixel read-back with its overhead.
pub const MIN_MAX_TRANSFER: usize = 5;

/// Transfer descriptor shared with the kernel drivers.
#[repr(C)]
struct LcddTransfer {
    byte_cnt: u32,
    tx_buf: *const u8,
    rx_buf: *mut u8,
}

const SPI_IOC_MAGIC: u8 = b'k';
const IOC_WRITE: u32 = 1;
const IOC_READ: u32 = 2;

/// Linux `_IOC` request number for an [LcddTransfer] argument.
const fn ioc(dir: u32, nr: u8) -> u32 {
    (dir << 30)
        | ((mem::size_of::<LcddTransfer>() as u32) << 16)
        | ((SPI_IOC_MAGIC as u32) << 8)
        | nr as u32
}

const LCD_WR_DATA: u32 = ioc(IOC_WRITE, 6);
const LCD_WR_CMD_DATA: u32 = ioc(IOC_WRITE, 7);
const LCD_WR_CMD: u32 = ioc(IOC_WRITE, 8);
const LCD_RD_CMD: u32 = ioc(IOC_READ, 8);
const TOUCH_RD_CMD: u32 = ioc(IOC_READ, 7);

/// XPT2046 control bytes: start bit, channel select, 12-bit differential mode.
const TOUCH_CHANNEL_X: u8 = 0xD0;
const TOUCH_CHANNEL_Y: u8 = 0x90;
const TOUCH_CHANNEL_Z1: u8 = 0xB0;

/// Transmit buffer of a read message answering with `len` bytes.
fn read_message(cmd: u8, len: usize) -> Vec<u8> {
    let mut tx = vec![0u8; len + READ_OVERHEAD];
    tx[0] = cmd;
    tx
}

/// Send `cmd` and collect the `len` answer bytes the driver hands back.
fn read_transfer(file: &File, request: u32, cmd: u8, len: usize) -> Result<Vec<u8>, DeviceError> {
    let tx = read_message(cmd, len);
    let mut rx = vec![0u8; len];
    transfer(file, request, &tx, Some(&mut rx))?;
    Ok(rx)
}

fn open_rw(path: &Path) -> Result<File, DeviceError> {
    Ok(OpenOptions::new().read(true).write(true).open(path)?)
}

/// Run one transfer through the driver.
///
/// The drivers return the number of transferred bytes; anything below one
/// is a failed transfer.
fn transfer(
    file: &File,
    request: u32,
    tx: &[u8],
    rx: Option<&mut [u8]>,
) -> Result<(), DeviceError> {
    let byte_cnt = u32::try_from(tx.len()).map_err(|_| DeviceError::ShortTransfer {
        expected: tx.len(),
        actual: 0,
    })?;
    if let Some(rx) = rx.as_ref() {
        debug_assert!(rx.len() + READ_OVERHEAD >= tx.len());
    }
    let mut tr = LcddTransfer {
        byte_cnt,
        tx_buf: tx.as_ptr(),
        rx_buf: rx.map_or(ptr::null_mut(), |rx| rx.as_mut_ptr()),
    };
    trace!("ioctl {:#010x}, {} bytes", request, tx.len());
    // Safety: `tr` points at buffers that outlive the call. The driver
    // writes at most `byte_cnt - READ_OVERHEAD` bytes into the receive buffer.
    let ret = unsafe {
        libc::ioctl(file.as_raw_fd(), request as _, &mut tr as *mut LcddTransfer)
    };
    if ret < 0 {
        return Err(DeviceError::Io(std::io::Error::last_os_error()));
    }
    if ret < 1 {
        return Err(DeviceError::ShortTransfer {
            expected: tx.len(),
            actual: ret as usize,
        });
    }
    Ok(())
}

/// The LCD controller behind `/dev/lcd_spi`.
pub struct SpiLcd {
    file: File,
    max_transfer: usize,
}

impl SpiLcd {
    pub fn open(path: impl AsRef<Path>, max_transfer: usize) -> Result<Self, DeviceError> {
        let path = path.as_ref();
        let file = open_rw(path)?;
        debug!("Opened LCD device {}", path.display());
        Ok(SpiLcd { file, max_transfer })
    }

    fn check_len(&self, len: usize) -> Result<(), DeviceError> {
        if len > self.max_transfer {
            return Err(DeviceError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!(
                    "transfer of {} bytes exceeds the {} byte driver buffer",
                    len, self.max_transfer
                ),
            )));
        }
        Ok(())
    }
}

impl TransferDevice for SpiLcd {
    fn write_command(&mut self, cmd: u8) -> Result<(), DeviceError> {
        transfer(&self.file, LCD_WR_CMD, &[cmd], None)
    }

    fn write_command_with_data(&mut self, cmd: u8, data: &[u8]) -> Result<(), DeviceError> {
        self.check_len(data.len() + 1)?;
        let mut tx = Vec::with_capacity(data.len() + 1);
        tx.push(cmd);
        tx.extend_from_slice(data);
        transfer(&self.file, LCD_WR_CMD_DATA, &tx, None)
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), DeviceError> {
        self.check_len(data.len())?;
        transfer(&self.file, LCD_WR_DATA, data, None)
    }

    fn read(&mut self, cmd: u8, len: usize) -> Result<Vec<u8>, DeviceError> {
        self.check_len(len + READ_OVERHEAD)?;
        read_transfer(&self.file, LCD_RD_CMD, cmd, len)
    }

    fn reset(&mut self) -> Result<(), DeviceError> {
        self.write_command(controller::SWRESET)
    }

    fn max_transfer(&self) -> usize {
        self.max_transfer
    }
}

/// The resistive touch controller behind `/dev/touchpad_spi`.
pub struct SpiTouch {
    file: File,
}

impl SpiTouch {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DeviceError> {
        let path = path.as_ref();
        let file = open_rw(path)?;
        debug!("Opened touch device {}", path.display());
        Ok(SpiTouch { file })
    }

    fn sample(&mut self, channel: u8) -> Result<u16, DeviceError> {
        let rx = read_transfer(&self.file, TOUCH_RD_CMD, channel, TOUCH_SAMPLE_BYTES)?;
        Ok(sample_value([rx[0], rx[1]]))
    }
}

/// Answer bytes carrying one conversion
const TOUCH_SAMPLE_BYTES: usize = 2;

/// 12-bit conversion result, MSB first, as returned by the driver.
fn sample_value(rx: [u8; TOUCH_SAMPLE_BYTES]) -> u16 {
    (((rx[0] as u16) << 8) | rx[1] as u16) >> 3
}

impl TouchSensor for SpiTouch {
    fn read_touch(&mut self) -> Result<TouchSample, DeviceError> {
        let x = self.sample(TOUCH_CHANNEL_X)?;
        let y = self.sample(TOUCH_CHANNEL_Y)?;
        let z = self.sample(TOUCH_CHANNEL_Z1)?;
        Ok(TouchSample::new(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ioctl_numbers() {
        let size = (mem::size_of::<LcddTransfer>() as u32) << 16;
        assert_eq!(LCD_WR_DATA, 0x4000_6B06 | size);
        assert_eq!(LCD_WR_CMD_DATA, 0x4000_6B07 | size);
        assert_eq!(LCD_WR_CMD, 0x4000_6B08 | size);
        assert_eq!(LCD_RD_CMD, 0x8000_6B08 | size);
        assert_eq!(TOUCH_RD_CMD, 0x8000_6B07 | size);
    }

    /// What the driver copies back to userspace for a message clocked in as
    /// `bus`: everything after the command echo and the dummy byte.
    fn driver_answer(bus: &[u8]) -> Vec<u8> {
        bus[READ_OVERHEAD..].to_vec()
    }

    #[test]
    fn test_read_message_layout() {
        let tx = read_message(0x2E, 9);
        assert_eq!(tx.len(), 11);
        assert_eq!(tx[0], 0x2E);
        assert!(tx[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_touch_sample_from_driver_answer() {
        let tx = read_message(TOUCH_CHANNEL_X, TOUCH_SAMPLE_BYTES);
        // Echo and dummy byte, then a full-scale conversion
        let bus = [0xFF, 0x00, 0x7F, 0xF8];
        assert_eq!(tx.len(), bus.len());
        let rx = driver_answer(&bus);
        assert_eq!(rx.len(), TOUCH_SAMPLE_BYTES);
        assert_eq!(sample_value([rx[0], rx[1]]), 0x0FFF);

        let rx = driver_answer(&[0xAA, 0x55, 0x40, 0x08]);
        assert_eq!(sample_value([rx[0], rx[1]]), 0x0801);
        assert_eq!(sample_value([0x00, 0x07]), 0);
    }

    #[test]
    fn test_open_missing_device() {
        let result = SpiLcd::open("/nonexistent/lcd_spi", DEFAULT_MAX_TRANSFER);
        assert!(matches!(result, Err(DeviceError::Io(_))));
    }
}
