//! Addressing windows on the panel.

use lcd_spi_common::{BYTES_PER_PIXEL, PANEL_HEIGHT, PANEL_WIDTH};

use crate::{controller, device::TransferDevice, error::DrawError};

/// A rectangular area of the panel: origin plus extent, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub dx: u16,
    pub dy: u16,
}

impl Region {
    pub fn new(x: u16, y: u16, dx: u16, dy: u16) -> Self {
        Region { x, y, dx, dy }
    }

    /// The whole panel.
    pub fn full_panel() -> Self {
        Region::new(0, 0, PANEL_WIDTH, PANEL_HEIGHT)
    }

    /// Check that the region lies on the panel.
    pub fn validate(&self) -> Result<(), DrawError> {
        if self.x as u32 + self.dx as u32 > PANEL_WIDTH as u32
            || self.y as u32 + self.dy as u32 > PANEL_HEIGHT as u32
        {
            return Err(DrawError::OutOfBounds {
                x: self.x,
                y: self.y,
                dx: self.dx,
                dy: self.dy,
            });
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.dx == 0 || self.dy == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.dx as usize * self.dy as usize
    }

    /// Size of a pixel buffer covering the region.
    pub fn byte_len(&self) -> usize {
        self.pixel_count() * BYTES_PER_PIXEL
    }

    /// First and last column, inclusive.
    ///
    /// Only meaningful on a validated region. An empty extent yields a
    /// one-column range starting at `x`.
    pub fn columns(&self) -> (u16, u16) {
        (self.x, self.x + self.dx.saturating_sub(1))
    }

    /// First and last row, inclusive. Same rules as [Region::columns].
    pub fn rows(&self) -> (u16, u16) {
        (self.y, self.y + self.dy.saturating_sub(1))
    }
}

/// Address-set argument: start and end, each split high byte first.
fn address_bytes(start: u16, end: u16) -> [u8; 4] {
    let [start_hi, start_lo] = start.to_be_bytes();
    let [end_hi, end_lo] = end.to_be_bytes();
    [start_hi, start_lo, end_hi, end_lo]
}

/// Point the controller's write/read window at `region`.
///
/// Subsequent memory writes fill the window left to right, top to bottom,
/// through the controller's auto-increment. Nothing is sent if the region
/// does not fit on the panel.
pub fn set_window<D>(device: &mut D, region: &Region) -> Result<(), DrawError>
where
    D: TransferDevice + ?Sized,
{
    region.validate()?;
    let (first_col, last_col) = region.columns();
    let (first_row, last_row) = region.rows();
    device.write_command_with_data(controller::CASET, &address_bytes(first_col, last_col))?;
    device.write_command_with_data(controller::PASET, &address_bytes(first_row, last_row))?;
    Ok(())
}
