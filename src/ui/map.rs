use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::braille::render_layer;
use crate::chart::format_compact;
use crate::map::{render_choropleth, RenderOptions, Viewport, NO_DATA_COLOR, PALETTE};
use crate::views::MapView;

/// Braille choropleth with legend, hover label and cursor marker
pub struct MapWidget<'a> {
    pub view: &'a MapView,
    pub viewport: Viewport,
    pub hovered: Option<usize>,
    /// Terminal cell under the mouse
    pub cursor: Option<(u16, u16)>,
    pub show_borders: bool,
}

impl MapWidget<'_> {
    fn render_legend(&self, area: Rect, buf: &mut Buffer) {
        let rows = PALETTE.len() as u16 + 1;
        if area.height < rows + 2 || area.width < 24 {
            return;
        }
        let top = area.bottom() - rows;
        let scale = &self.view.scale;
        for (i, color) in PALETTE.iter().enumerate().rev() {
            let (lo, hi) = scale.bounds(i);
            let y = top + (PALETTE.len() - 1 - i) as u16;
            buf.set_string(area.x, y, "■", Style::default().fg(*color));
            buf.set_string(
                area.x + 2,
                y,
                format!("{}–{}", format_compact(lo.round()), format_compact(hi.round())),
                Style::default().fg(Color::Gray),
            );
        }
        buf.set_string(area.x, area.bottom() - 1, "■", Style::default().fg(NO_DATA_COLOR));
        buf.set_string(area.x + 2, area.bottom() - 1, "no data", Style::default().fg(Color::Gray));
    }
}

impl Widget for MapWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let options = RenderOptions {
            show_borders: self.show_borders,
            highlight: self.hovered,
        };
        let layers = render_choropleth(
            &self.view.shapes,
            &self.view.buckets,
            PALETTE.len(),
            &options,
            area.width as usize,
            area.height as usize,
            &self.viewport,
        );

        // Back to front: grey countries, buckets light to dark, borders, hover outline
        render_layer(&layers.no_data, NO_DATA_COLOR, area, buf);
        for (canvas, color) in layers.fills.iter().zip(PALETTE) {
            render_layer(canvas, color, area, buf);
        }
        render_layer(&layers.borders, Color::Gray, area, buf);
        render_layer(&layers.highlight, Color::Yellow, area, buf);

        if self.view.values.iter().any(Option::is_some) {
            self.render_legend(area, buf);
        }

        if let Some((cx, cy)) = self.cursor {
            buf[(cx, cy)].set_char('╋').set_fg(Color::Red);

            if let Some(text) = self.hovered.and_then(|idx| self.view.describe(idx)) {
                let label = format!(" {text} ");
                let len = label.chars().count() as u16;
                let mut x = cx + 2;
                if x + len > area.right() {
                    x = cx.saturating_sub(len + 1).max(area.x);
                }
                let y = if cy > area.y { cy - 1 } else { (cy + 1).min(area.bottom() - 1) };
                buf.set_stringn(
                    x,
                    y,
                    &label,
                    (area.right() - x) as usize,
                    Style::default().fg(Color::Black).bg(Color::White),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::table;
    use crate::data::CountryShape;

    #[test]
    fn test_hover_label_and_legend() {
        let ring = vec![(-60.0, -40.0), (60.0, -40.0), (60.0, 60.0), (-60.0, 60.0), (-60.0, -40.0)];
        let shapes = vec![CountryShape::new("Middle".into(), None, vec![vec![ring]])];
        let t = table("Country Name,2020\nMiddle,1500000\n");
        let view = MapView::new(shapes, Some(&t));

        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        MapWidget {
            view: &view,
            viewport: Viewport::world(120, 80),
            hovered: Some(0),
            cursor: Some((30, 10)),
            show_borders: true,
        }
        .render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Middle: 1,500,000 (2020)"));
        assert!(text.contains("no data"));
        assert!(text.contains('╋'));
        assert_eq!(buf[(32, 9)].fg, Color::Black);
    }
}
