use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::braille::render_layer;
use crate::chart::format_thousands;
use crate::map::{render_outline, Viewport};
use crate::views::CountryView;

/// Fraction of the panel left free around the outline
const OUTLINE_PADDING: f64 = 0.05;

/// Side panel of the country chart: code, latest population and outline
pub struct OutlinePanel<'a> {
    pub view: &'a CountryView,
}

impl Widget for OutlinePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = self.view;
        let block = Block::default()
            .borders(Borders::LEFT)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height < 4 || inner.width < 4 {
            return;
        }

        // Latest year before the forecast starts
        let latest = view
            .records
            .iter()
            .rev()
            .find(|r| view.chart.marker_x.map_or(true, |m| f64::from(r.year) < m));
        let mut lines = vec![
            Line::from(Span::styled(
                view.country.clone(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("ISO ", Style::default().fg(Color::DarkGray)),
                Span::styled(view.iso2.to_uppercase(), Style::default().fg(Color::Yellow)),
            ]),
        ];
        if let Some(record) = latest {
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", record.year), Style::default().fg(Color::DarkGray)),
                Span::raw(format_thousands(record.total)),
            ]));
        }
        let text_rows = lines.len() as u16 + 1;
        Paragraph::new(lines).render(inner, buf);

        let map_area = Rect::new(inner.x, inner.y + text_rows, inner.width, inner.height.saturating_sub(text_rows));
        if map_area.height == 0 {
            return;
        }
        match &view.outline {
            Some(shape) => {
                let viewport = Viewport::fit_bounds(
                    shape.bbox,
                    map_area.width as usize * 2,
                    map_area.height as usize * 4,
                    OUTLINE_PADDING,
                );
                let canvas = render_outline(shape, map_area.width as usize, map_area.height as usize, &viewport);
                render_layer(&canvas, Color::Cyan, map_area, buf);
            }
            None => {
                buf.set_string(map_area.x, map_area.y, "outline unavailable", Style::default().fg(Color::DarkGray));
            }
        }
    }
}
