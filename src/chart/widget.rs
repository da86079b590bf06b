use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use super::{AxisSide, ChartModel, LinearScale, Mark};
use crate::braille::{render_layer, BrailleCanvas};
use crate::map::draw_line;

const AXIS_STYLE: Style = Style::new().fg(Color::DarkGray);

/// Line, area and dual-axis charts on braille canvases
pub struct ChartWidget<'a> {
    model: &'a ChartModel,
    hover: Option<(u16, u16)>,
}

impl<'a> ChartWidget<'a> {
    pub fn new(model: &'a ChartModel) -> Self {
        Self { model, hover: None }
    }

    /// Terminal cell under the mouse, for the tooltip
    pub fn hover(mut self, pos: Option<(u16, u16)>) -> Self {
        self.hover = pos;
        self
    }
}

/// Nice y scale over one axis plus its formatted tick labels
struct YAxis {
    scale: LinearScale,
    ticks: Vec<(f64, String)>,
    width: u16,
}

impl YAxis {
    fn new(model: &ChartModel, side: AxisSide, pixel_height: usize, count: usize) -> Option<Self> {
        let domain = model.y_extent(side)?;
        let bottom = pixel_height.saturating_sub(1) as f64;
        let scale = LinearScale::new(domain, (bottom, 0.0)).nice(count);
        let ticks: Vec<(f64, String)> = scale
            .ticks(count)
            .into_iter()
            .map(|t| (t, model.format.tick(t)))
            .collect();
        let width = ticks.iter().map(|(_, s)| s.chars().count()).max().unwrap_or(0) as u16;
        Some(Self { scale, ticks, width })
    }
}

impl Widget for ChartWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let model = self.model;
        if area.height < 8 || area.width < 24 {
            buf.set_string(area.x, area.y, "window too small", AXIS_STYLE);
            return;
        }

        buf.set_string(
            area.x + area.width.saturating_sub(model.title.chars().count() as u16) / 2,
            area.y,
            &model.title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        );

        let Some(x_domain) = model.x_extent() else {
            buf.set_string(area.x, area.y + 2, "No data for this view", AXIS_STYLE);
            return;
        };

        let plot_rows = area.height - 5;
        let tick_count = (plot_rows as usize / 3).clamp(2, 10);
        let left = YAxis::new(model, AxisSide::Left, plot_rows as usize * 4, tick_count);
        let right = YAxis::new(model, AxisSide::Right, plot_rows as usize * 4, tick_count);
        let left_gutter = left.as_ref().map_or(0, |a| a.width + 1);
        let right_gutter = right.as_ref().map_or(0, |a| a.width + 1);
        if left_gutter + right_gutter + 8 > area.width {
            buf.set_string(area.x, area.y + 2, "window too small", AXIS_STYLE);
            return;
        }

        let plot = Rect::new(
            area.x + left_gutter,
            area.y + 2,
            area.width - left_gutter - right_gutter,
            plot_rows,
        );
        let (pw, ph) = (plot.width as usize * 2, plot.height as usize * 4);
        let x_scale = LinearScale::new(x_domain, (0.0, pw.saturating_sub(1) as f64));

        // Axis titles
        buf.set_string(area.x, area.y + 1, &model.y_label, AXIS_STYLE);
        if let Some(y2) = &model.y2_label {
            let len = y2.chars().count() as u16;
            buf.set_string(area.right().saturating_sub(len), area.y + 1, y2, AXIS_STYLE);
        }

        draw_y_axis(left.as_ref(), plot, plot.x.saturating_sub(1), true, buf);
        draw_y_axis(right.as_ref(), plot, plot.right(), false, buf);
        let axis_row = plot.bottom();
        draw_x_axis(&x_scale, plot, axis_row, area, buf);

        if let Some(marker) = model.marker_x {
            let col = plot.x + (x_scale.apply(marker) / 2.0) as u16;
            if col < plot.right() {
                for row in (plot.y..plot.bottom()).step_by(2) {
                    buf[(col, row)].set_char('┆').set_style(AXIS_STYLE);
                }
            }
        }

        for series in &model.series {
            let axis = match series.axis {
                AxisSide::Left => left.as_ref(),
                AxisSide::Right => right.as_ref(),
            };
            let Some(axis) = axis else { continue };
            let mut canvas = BrailleCanvas::new(plot.width as usize, plot.height as usize);
            let projected: Vec<(f64, f64)> = series
                .points
                .iter()
                .map(|&(x, y)| (x_scale.apply(x), axis.scale.apply(y)))
                .collect();
            match series.mark {
                Mark::Line => {
                    for pair in projected.windows(2) {
                        let (x0, y0) = pair[0];
                        let (x1, y1) = pair[1];
                        draw_line(&mut canvas, x0.round() as i32, y0.round() as i32, x1.round() as i32, y1.round() as i32);
                    }
                    if let [(x, y)] = projected.as_slice() {
                        canvas.set_pixel_signed(x.round() as i32, y.round() as i32);
                    }
                }
                Mark::Area => {
                    let base = axis.scale.apply(0.0).clamp(0.0, ph.saturating_sub(1) as f64).round() as i32;
                    fill_area(&mut canvas, &projected, base);
                }
            }
            render_layer(&canvas, series.color, plot, buf);
        }

        render_legend(model, area, buf);

        if let Some(pos) = self.hover.filter(|&(c, r)| plot.contains((c, r).into())) {
            render_tooltip(model, &x_scale, plot, area, pos, buf);
        }
    }
}

fn fill_area(canvas: &mut BrailleCanvas, projected: &[(f64, f64)], base: i32) {
    for pair in projected.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        let (start, end) = (x0.round() as i32, x1.round() as i32);
        for x in start..=end {
            let t = if end == start { 0.0 } else { f64::from(x - start) / f64::from(end - start) };
            let y = (y0 + (y1 - y0) * t).round() as i32;
            draw_line(canvas, x, y, x, base);
        }
    }
}

fn draw_y_axis(axis: Option<&YAxis>, plot: Rect, col: u16, left: bool, buf: &mut Buffer) {
    let Some(axis) = axis else { return };
    for row in plot.y..plot.bottom() {
        buf[(col, row)].set_char('│').set_style(AXIS_STYLE);
    }
    for (value, label) in &axis.ticks {
        let offset = (axis.scale.apply(*value) / 4.0) as u16;
        let row = plot.y + offset.min(plot.height - 1);
        buf[(col, row)].set_char(if left { '┤' } else { '├' });
        let len = label.chars().count() as u16;
        let x = if left { col.saturating_sub(len) } else { col + 1 };
        buf.set_string(x, row, label, Style::default().fg(Color::Gray));
    }
}

fn draw_x_axis(scale: &LinearScale, plot: Rect, row: u16, area: Rect, buf: &mut Buffer) {
    for col in plot.x..plot.right() {
        buf[(col, row)].set_char('─').set_style(AXIS_STYLE);
    }
    let count = (plot.width as usize / 10).clamp(2, 12);
    let mut free_from = area.x;
    for tick in scale.ticks(count).into_iter().filter(|t| t.fract() == 0.0) {
        let col = plot.x + (scale.apply(tick) / 2.0) as u16;
        if col >= plot.right() {
            continue;
        }
        buf[(col, row)].set_char('┬');
        let label = format!("{tick:.0}");
        let len = label.len() as u16;
        let x = col.saturating_sub(len / 2).max(area.x);
        if x < free_from || x + len > area.right() {
            continue;
        }
        buf.set_string(x, row + 1, &label, Style::default().fg(Color::Gray));
        free_from = x + len + 1;
    }
}

fn render_legend(model: &ChartModel, area: Rect, buf: &mut Buffer) {
    let mut spans = Vec::new();
    for series in &model.series {
        spans.push(Span::styled("■ ", Style::default().fg(series.color)));
        let suffix = match (series.axis, model.has_right_axis()) {
            (AxisSide::Right, _) => " (right)",
            (AxisSide::Left, true) => " (left)",
            _ => "",
        };
        spans.push(Span::raw(format!("{}{suffix}   ", series.label)));
    }
    if model.marker_x.is_some() {
        spans.push(Span::styled("┆ forecast", AXIS_STYLE));
    }
    buf.set_line(area.x, area.bottom() - 1, &Line::from(spans), area.width);
}

fn render_tooltip(model: &ChartModel, x_scale: &LinearScale, plot: Rect, area: Rect, pos: (u16, u16), buf: &mut Buffer) {
    let px = f64::from(pos.0 - plot.x) * 2.0 + 0.5;
    let Some(tip) = model.tooltip(x_scale.invert(px)) else { return };

    let rule = plot.x + (x_scale.apply(tip.x) / 2.0) as u16;
    if rule < plot.right() {
        for row in plot.y..plot.bottom() {
            let cell = &mut buf[(rule, row)];
            if cell.symbol() == " " {
                cell.set_char('│').set_fg(Color::Gray);
            }
        }
    }

    let mut lines = vec![Line::from(Span::styled(
        format!("Year {:.0}", tip.x),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (label, color, value) in &tip.rows {
        lines.push(Line::from(vec![
            Span::styled("■ ", Style::default().fg(*color)),
            Span::raw(format!("{label}: {}", model.format.full(*value))),
        ]));
    }

    let width = lines.iter().map(|l| l.width() as u16).max().unwrap_or(0) + 2;
    let height = lines.len() as u16 + 2;
    let mut x = pos.0 + 2;
    if x + width > area.right() {
        x = pos.0.saturating_sub(width + 1).max(area.x);
    }
    let y = pos.1.min(area.bottom().saturating_sub(height)).max(area.y);
    let rect = Rect::new(x, y, width.min(area.width), height.min(area.height)).intersection(area);

    Clear.render(rect, buf);
    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).border_style(AXIS_STYLE))
        .render(rect, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartSeries, ValueFormat};

    fn text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.y..area.bottom())
            .map(|y| (area.x..area.right()).map(|x| buf[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn population_chart() -> ChartModel {
        let mut chart = ChartModel::new("World Population", ValueFormat::Count);
        chart.series.push(ChartSeries::line(
            "Total Population",
            Color::Red,
            (1960..2030).map(|y| (f64::from(y), 3e9 + f64::from(y - 1960) * 7e7)).collect(),
        ));
        chart.marker_x = Some(2024.0);
        chart
    }

    #[test]
    fn test_renders_axes_series_and_legend() {
        let chart = population_chart();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        ChartWidget::new(&chart).render(area, &mut buf);
        let out = text(&buf);
        assert!(out.contains("World Population"));
        assert!(out.contains("Total Population"));
        assert!(out.contains("1980"));
        assert!(out.contains("8B"));
        assert!(out.contains('┆'));
        assert!(out.chars().any(|c| ('\u{2801}'..='\u{28FF}').contains(&c)));
    }

    #[test]
    fn test_hover_shows_nearest_year() {
        let chart = population_chart();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        ChartWidget::new(&chart).hover(Some((10, 10))).render(area, &mut buf);
        let out = text(&buf);
        assert!(out.contains("Year 19"));
        assert!(out.contains("Total Population: "));
    }

    #[test]
    fn test_area_and_empty_charts() {
        let mut chart = ChartModel::new("Growth", ValueFormat::Percent);
        chart.series.push(ChartSeries::area(
            "Growth rate",
            Color::Yellow,
            vec![(2000.0, 1.5), (2001.0, -0.5), (2002.0, 1.0)],
        ));
        let area = Rect::new(0, 0, 60, 16);
        let mut buf = Buffer::empty(area);
        ChartWidget::new(&chart).render(area, &mut buf);
        assert!(text(&buf).contains("%"));

        let empty = ChartModel::new("Nothing", ValueFormat::Count);
        let mut buf = Buffer::empty(area);
        ChartWidget::new(&empty).render(area, &mut buf);
        assert!(text(&buf).contains("No data"));
    }
}
