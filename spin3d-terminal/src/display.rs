//! Truecolor terminal presentation of the RGBA framebuffer.

use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use spin3d_core::Framebuffer;
use std::io::Write;

/// Upper-half-block glyph: the foreground color paints the top half of
/// the cell and the background color the bottom half, giving two
/// framebuffer samples per terminal cell.
const HALF_BLOCK: char = '\u{2580}';

/// Maps the framebuffer onto the terminal cell grid by nearest-neighbor
/// sampling, two vertical samples per cell.
pub struct TerminalDisplay {
    cols: u16,
    rows: u16,
}

impl TerminalDisplay {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    pub fn draw<W: Write>(&self, fb: &Framebuffer, out: &mut W) -> std::io::Result<()> {
        let bytes = fb.as_bytes();
        let samples_y = self.rows as usize * 2;

        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            for col in 0..self.cols {
                let x = col as usize * fb.width() / self.cols as usize;
                let y_top = row as usize * 2 * fb.height() / samples_y;
                let y_bottom = (row as usize * 2 + 1) * fb.height() / samples_y;

                let (r, g, b) = sample(bytes, fb.width(), x, y_top);
                out.queue(SetForegroundColor(Color::Rgb { r, g, b }))?;
                let (r, g, b) = sample(bytes, fb.width(), x, y_bottom);
                out.queue(SetBackgroundColor(Color::Rgb { r, g, b }))?;
                out.queue(Print(HALF_BLOCK))?;
            }
        }
        out.queue(ResetColor)?;
        Ok(())
    }
}

fn sample(bytes: &[u8], width: usize, x: usize, y: usize) -> (u8, u8, u8) {
    let offset = (y * width + x) * 4;
    (bytes[offset], bytes[offset + 1], bytes[offset + 2])
}
