mod canvas;

use ratatui::{buffer::Buffer, layout::Rect, style::Color};

pub use canvas::BrailleCanvas;

/// Copy the set cells of a canvas into the buffer in one colour. Empty cells
/// are left alone so layers drawn later stack on top of earlier ones.
pub fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
    for row in 0..area.height {
        for col in 0..area.width {
            if let Some(ch) = canvas.glyph(col as usize, row as usize) {
                buf[(area.x + col, area.y + row)].set_char(ch).set_fg(color);
            }
        }
    }
}
