//! Text layout and glyph rasterization.
//!
//! Text is laid out on a grid of 5×8 pixel character cells, 48 columns by
//! 40 rows. Lines wrap at the right edge and the grid itself wraps from the
//! last row back to the first, so the panel behaves like a terminal whose
//! old content is overwritten in place rather than scrolled.

use lcd_spi_common::{
    BYTES_PER_PIXEL, Color, GLYPH_HEIGHT, GLYPH_WIDTH, PANEL_BYTES, PANEL_WIDTH, TEXT_COLUMNS,
    TEXT_ROWS,
};

use crate::{
    color::{self, Rgb565},
    error::DrawError,
    font,
    region::Region,
};

/// A stretch of consecutive characters sharing one text row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextRun {
    /// Character column of the first character
    pub col: u16,
    /// Character row
    pub row: u16,
    /// Offset of the first character in the laid out text
    pub start: usize,
    /// Number of characters
    pub len: usize,
}

impl TextRun {
    /// Panel area covered by the run.
    pub fn region(&self) -> Region {
        Region::new(
            self.col * GLYPH_WIDTH,
            self.row * GLYPH_HEIGHT,
            self.len as u16 * GLYPH_WIDTH,
            GLYPH_HEIGHT,
        )
    }

    /// The characters of the run.
    pub fn text<'a>(&self, text: &'a [u8]) -> &'a [u8] {
        &text[self.start..self.start + self.len]
    }
}

/// Split `text` into runs starting at cell (`start_col`, `start_row`).
///
/// Wrapping is lazy: the cursor only moves to the next row when a character
/// has to be placed past the right edge, so a text that exactly fills a line
/// ends there and never yields an empty continuation run.
pub fn layout(text: &[u8], start_col: u16, start_row: u16) -> Result<Vec<TextRun>, DrawError> {
    if start_col >= TEXT_COLUMNS || start_row >= TEXT_ROWS {
        return Err(DrawError::OutOfBounds {
            x: start_col.saturating_mul(GLYPH_WIDTH),
            y: start_row.saturating_mul(GLYPH_HEIGHT),
            dx: GLYPH_WIDTH,
            dy: GLYPH_HEIGHT,
        });
    }
    for &code in text {
        font::glyph(code)?;
    }

    let mut runs = Vec::new();
    if text.is_empty() {
        return Ok(runs);
    }
    let mut current = TextRun {
        col: start_col,
        row: start_row,
        start: 0,
        len: 0,
    };
    let mut col = start_col;
    let mut row = start_row;
    for index in 0..text.len() {
        if col == TEXT_COLUMNS {
            runs.push(current);
            col = 0;
            row += 1;
            if row == TEXT_ROWS {
                row = 0;
            }
            current = TextRun {
                col,
                row,
                start: index,
                len: 0,
            };
        }
        current.len += 1;
        col += 1;
    }
    runs.push(current);
    Ok(runs)
}

/// Rasterize `text` into `target`, a row-major pixel buffer `stride` pixels
/// wide, with the first cell's top-left corner at pixel (`origin_x`, `origin_y`).
///
/// For glyph column byte `bits` and cell row `r` (0 = top), the pixel takes
/// bit `7 - r`: the most significant bit lands on the top row and the rows
/// below take decreasing bits. `None` colours leave the target untouched.
fn rasterize(
    text: &[u8],
    fg: Option<Rgb565>,
    bg: Option<Rgb565>,
    target: &mut [u8],
    stride: usize,
    origin_x: usize,
    origin_y: usize,
) -> Result<(), DrawError> {
    let fg = fg.map(Rgb565::to_pixel);
    let bg = bg.map(Rgb565::to_pixel);
    for (index, &code) in text.iter().enumerate() {
        let glyph = font::glyph(code)?;
        for (glyph_col, &bits) in glyph.iter().enumerate() {
            let x = origin_x + index * GLYPH_WIDTH as usize + glyph_col;
            for cell_row in 0..GLYPH_HEIGHT as usize {
                let lit = bits & (1 << (7 - cell_row)) != 0;
                let pixel = if lit { fg } else { bg };
                if let Some(pixel) = pixel {
                    let offset = ((origin_y + cell_row) * stride + x) * BYTES_PER_PIXEL;
                    target[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&pixel);
                }
            }
        }
    }
    Ok(())
}

/// Render the characters of one run into a buffer covering exactly
/// [TextRun::region].
pub fn render_run(
    text: &[u8],
    fg: Color,
    bg: Color,
    target: &mut [u8],
) -> Result<(), DrawError> {
    let stride = text.len() * GLYPH_WIDTH as usize;
    let expected = stride * GLYPH_HEIGHT as usize * BYTES_PER_PIXEL;
    if target.len() != expected {
        return Err(DrawError::InvalidPayload {
            expected,
            actual: target.len(),
        });
    }
    rasterize(
        text,
        color::palette(fg),
        color::palette(bg),
        target,
        stride,
        0,
        0,
    )
}

/// Render `text` into a full-panel buffer, wrapping as [layout] does.
pub fn render_text(
    text: &[u8],
    fg: Color,
    bg: Color,
    start_col: u16,
    start_row: u16,
    target: &mut [u8],
) -> Result<(), DrawError> {
    if target.len() != PANEL_BYTES {
        return Err(DrawError::InvalidPayload {
            expected: PANEL_BYTES,
            actual: target.len(),
        });
    }
    let fg = color::palette(fg);
    let bg = color::palette(bg);
    for run in layout(text, start_col, start_row)? {
        let region = run.region();
        rasterize(
            run.text(text),
            fg,
            bg,
            target,
            PANEL_WIDTH as usize,
            region.x as usize,
            region.y as usize,
        )?;
    }
    Ok(())
}
