//! ILI9341 command opcodes used by the drawing engine.

/// Software reset
pub const SWRESET: u8 = 0x01;
/// Sleep out
pub const SLPOUT: u8 = 0x11;
/// Display on
pub const DISPON: u8 = 0x29;
/// Column address set, 4 data bytes: start (hi, lo), end (hi, lo)
pub const CASET: u8 = 0x2A;
/// Page (row) address set, same layout as `CASET`
pub const PASET: u8 = 0x2B;
/// Memory write; data that follows fills the current window
pub const RAMWR: u8 = 0x2C;
/// Memory read
pub const RAMRD: u8 = 0x2E;
/// Memory access control (orientation, RGB/BGR order)
pub const MADCTL: u8 = 0x36;
/// Pixel format set
pub const PIXFMT: u8 = 0x3A;
/// Memory read continue
pub const RAMRD_CONT: u8 = 0x3E;
/// Write display brightness
pub const WRDISBV: u8 = 0x51;
/// Write CTRL display (brightness control block)
pub const WRCTRLD: u8 = 0x53;

/// `PIXFMT` argument: 16 bits per pixel on both interfaces
pub const PIXFMT_16BPP: u8 = 0x55;
/// `MADCTL` argument: BGR colour filter order
pub const MADCTL_BGR: u8 = 0b0000_1000;
/// `WRCTRLD` argument: brightness control, dimming and backlight on
pub const WRCTRLD_ON: u8 = 0x2C;
/// `WRDISBV` argument applied at start-up
pub const DEFAULT_BRIGHTNESS: u8 = 0x12;

/// Bytes returned per pixel by a memory read (one 8-bit value per channel).
pub const READ_BYTES_PER_PIXEL: usize = 3;
