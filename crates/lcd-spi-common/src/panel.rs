/// Panel width in pixels.
pub const PANEL_WIDTH: u16 = 240;
/// Panel height in pixels.
pub const PANEL_HEIGHT: u16 = 320;
/// RGB565, two bytes per pixel.
pub const BYTES_PER_PIXEL: usize = 2;
/// Size of a full-panel pixel buffer.
pub const PANEL_BYTES: usize = PANEL_WIDTH as usize * PANEL_HEIGHT as usize * BYTES_PER_PIXEL;

/// Width of a character cell in pixels.
pub const GLYPH_WIDTH: u16 = 5;
/// Height of a character cell in pixels (7 glyph rows and one spacing row).
pub const GLYPH_HEIGHT: u16 = 8;
/// Number of character cells on one text line.
pub const TEXT_COLUMNS: u16 = PANEL_WIDTH / GLYPH_WIDTH;
/// Number of text lines on the panel.
pub const TEXT_ROWS: u16 = PANEL_HEIGHT / GLYPH_HEIGHT;
