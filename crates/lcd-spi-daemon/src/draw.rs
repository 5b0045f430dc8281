//! Drawing engine: turns rectangles, bitmaps and text into window + memory
//! write sequences on a [TransferDevice].

use std::time::Duration;

use lcd_spi_common::{BYTES_PER_PIXEL, Color};
use log::{debug, trace};

use crate::{
    color::{self, Pixel},
    controller,
    device::{READ_OVERHEAD, TransferDevice},
    error::{DeviceError, DrawError},
    glyph,
    region::{self, Region},
};

/// The panel, driven through a transfer device.
pub struct Lcd<D: TransferDevice> {
    device: D,
}

impl<D: TransferDevice> Lcd<D> {
    pub fn new(device: D) -> Self {
        Lcd { device }
    }

    /// Bring the controller out of reset into 16-bit colour mode with the
    /// backlight on.
    ///
    /// `delay` is called for each settle time the controller needs between
    /// steps; pass `std::thread::sleep` on real hardware.
    pub fn init<F: FnMut(Duration)>(&mut self, mut delay: F) -> Result<(), DrawError> {
        let long = Duration::from_millis(120);
        self.device.reset()?;
        delay(long);
        self.device.write_command(controller::DISPON)?;
        self.device.write_command(controller::SLPOUT)?;
        delay(Duration::from_millis(5));
        self.device
            .write_command_with_data(controller::PIXFMT, &[controller::PIXFMT_16BPP])?;
        self.device
            .write_command_with_data(controller::MADCTL, &[controller::MADCTL_BGR])?;
        delay(long);
        self.device
            .write_command_with_data(controller::WRCTRLD, &[controller::WRCTRLD_ON])?;
        delay(long);
        self.device
            .write_command_with_data(controller::WRDISBV, &[controller::DEFAULT_BRIGHTNESS])?;
        delay(long);
        debug!("Display controller initialised");
        Ok(())
    }

    /// Fill the whole panel.
    pub fn clear(&mut self, color: Color) -> Result<(), DrawError> {
        self.draw_rectangle(Region::full_panel(), color)
    }

    /// Fill `region` with one colour.
    ///
    /// The background sentinel leaves the panel as it is.
    pub fn draw_rectangle(&mut self, region: Region, color: Color) -> Result<(), DrawError> {
        region.validate()?;
        let Some(rgb) = color::palette(color) else {
            trace!("Rectangle with background colour, nothing to draw");
            return Ok(());
        };
        if region.is_empty() {
            return Ok(());
        }
        let pixel = rgb.to_pixel();
        let mut pixels = Vec::with_capacity(region.byte_len());
        for _ in 0..region.pixel_count() {
            pixels.extend_from_slice(&pixel);
        }
        region::set_window(&mut self.device, &region)?;
        self.write_pixels(&pixels)
    }

    /// Copy caller-supplied RGB565 bytes into `region`.
    pub fn draw_bitmap(&mut self, region: Region, pixels: &[u8]) -> Result<(), DrawError> {
        region.validate()?;
        if pixels.len() != region.byte_len() {
            return Err(DrawError::InvalidPayload {
                expected: region.byte_len(),
                actual: pixels.len(),
            });
        }
        if region.is_empty() {
            return Ok(());
        }
        region::set_window(&mut self.device, &region)?;
        self.write_pixels(pixels)
    }

    /// Render `text` starting at character cell (`col`, `row`).
    ///
    /// Each run of the layout is drawn as its own window. When either colour
    /// is the background sentinel the run's current content is read back from
    /// the panel first so untouched pixels survive the write.
    pub fn draw_text(
        &mut self,
        text: &[u8],
        fg: Color,
        bg: Color,
        col: u16,
        row: u16,
    ) -> Result<(), DrawError> {
        let runs = glyph::layout(text, col, row)?;
        let blend = fg == Color::Background || bg == Color::Background;
        for run in runs {
            let region = run.region();
            region::set_window(&mut self.device, &region)?;
            let mut pixels = if blend {
                self.read_pixels(&region)?
            } else {
                vec![0u8; region.byte_len()]
            };
            glyph::render_run(run.text(text), fg, bg, &mut pixels)?;
            self.write_pixels(&pixels)?;
        }
        Ok(())
    }

    /// Memory write of `pixels` into the current window, split into chunks
    /// the device accepts. The write command goes out once, before the first
    /// chunk.
    fn write_pixels(&mut self, pixels: &[u8]) -> Result<(), DrawError> {
        let max = self.device.max_transfer().max(1);
        self.device.write_command(controller::RAMWR)?;
        for chunk in pixels.chunks(max) {
            self.device.write_data(chunk)?;
        }
        trace!(
            "Wrote {} bytes in {} chunk(s)",
            pixels.len(),
            pixels.len().div_ceil(max)
        );
        Ok(())
    }

    /// Memory read of the current window, converted to panel pixels.
    ///
    /// The controller answers with one byte per channel, so each chunk holds
    /// a whole number of pixels.
    fn read_pixels(&mut self, region: &Region) -> Result<Vec<u8>, DrawError> {
        let per_chunk = (self.device.max_transfer().saturating_sub(READ_OVERHEAD)
            / controller::READ_BYTES_PER_PIXEL)
            .max(1);
        let mut pixels = Vec::with_capacity(region.byte_len());
        let mut remaining = region.pixel_count();
        let mut cmd = controller::RAMRD;
        while remaining > 0 {
            let count = remaining.min(per_chunk);
            let len = count * controller::READ_BYTES_PER_PIXEL;
            let raw = self.device.read(cmd, len)?;
            if raw.len() != len {
                return Err(DeviceError::ShortTransfer {
                    expected: len,
                    actual: raw.len(),
                }
                .into());
            }
            for rgb in raw.chunks_exact(controller::READ_BYTES_PER_PIXEL) {
                let pixel: Pixel = color::from_camera(rgb[0], rgb[1], rgb[2]);
                pixels.extend_from_slice(&pixel);
            }
            remaining -= count;
            cmd = controller::RAMRD_CONT;
        }
        debug_assert_eq!(pixels.len(), region.pixel_count() * BYTES_PER_PIXEL);
        Ok(pixels)
    }
}
