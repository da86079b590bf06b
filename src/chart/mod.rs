mod format;
mod scale;
mod widget;

use ratatui::style::Color;

pub use format::{format_compact, format_thousands};
pub use scale::LinearScale;
pub use widget::ChartWidget;

/// Series colours, one per band
pub const BAND_COLORS: [Color; 4] = [
    Color::Rgb(228, 26, 28),
    Color::Rgb(55, 126, 184),
    Color::Rgb(77, 175, 74),
    Color::Rgb(152, 78, 163),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    Line,
    /// Filled down to zero
    Area,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisSide {
    Left,
    Right,
}

/// How values are printed on ticks and in the tooltip
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueFormat {
    /// People: compact ticks, comma-separated tooltip
    Count,
    Percent,
    /// Per 1,000 people
    PerThousand,
}

impl ValueFormat {
    pub fn tick(self, value: f64) -> String {
        match self {
            ValueFormat::Count => format_compact(value),
            ValueFormat::Percent => format!("{}%", format_compact(value)),
            ValueFormat::PerThousand => format_compact(value),
        }
    }

    pub fn full(self, value: f64) -> String {
        match self {
            ValueFormat::Count => format_thousands(value),
            ValueFormat::Percent => format!("{value:.2}%"),
            ValueFormat::PerThousand => format!("{value:.1} ‰"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub color: Color,
    pub mark: Mark,
    pub axis: AxisSide,
    /// (x, y), ascending by x
    pub points: Vec<(f64, f64)>,
}

impl ChartSeries {
    pub fn line(label: impl Into<String>, color: Color, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            color,
            mark: Mark::Line,
            axis: AxisSide::Left,
            points,
        }
    }

    pub fn area(label: impl Into<String>, color: Color, points: Vec<(f64, f64)>) -> Self {
        Self {
            mark: Mark::Area,
            ..Self::line(label, color, points)
        }
    }

    pub fn on_right(mut self) -> Self {
        self.axis = AxisSide::Right;
        self
    }

    /// Point closest to `x`: bisect left, then pick the nearer neighbour
    pub fn nearest(&self, x: f64) -> Option<(f64, f64)> {
        let idx = self.points.partition_point(|p| p.0 < x);
        let after = self.points.get(idx);
        let before = idx.checked_sub(1).and_then(|i| self.points.get(i));
        match (before, after) {
            (Some(b), Some(a)) => Some(if x - b.0 > a.0 - x { *a } else { *b }),
            (Some(p), None) | (None, Some(p)) => Some(*p),
            (None, None) => None,
        }
    }
}

/// Tooltip contents for a hovered x position
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub x: f64,
    pub rows: Vec<(String, Color, f64)>,
}

/// Everything needed to draw one chart
#[derive(Clone, Debug, PartialEq)]
pub struct ChartModel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Set for dual-axis charts
    pub y2_label: Option<String>,
    pub series: Vec<ChartSeries>,
    /// Dashed vertical rule, e.g. the first forecast year
    pub marker_x: Option<f64>,
    pub format: ValueFormat,
}

impl ChartModel {
    pub fn new(title: impl Into<String>, format: ValueFormat) -> Self {
        Self {
            title: title.into(),
            x_label: "Year".to_string(),
            y_label: String::new(),
            y2_label: None,
            series: Vec::new(),
            marker_x: None,
            format,
        }
    }

    pub fn has_right_axis(&self) -> bool {
        self.series.iter().any(|s| s.axis == AxisSide::Right)
    }

    pub fn x_extent(&self) -> Option<(f64, f64)> {
        extent(self.series.iter().flat_map(|s| s.points.iter().map(|p| p.0)))
    }

    /// Value extent of one axis, always including zero
    pub fn y_extent(&self, side: AxisSide) -> Option<(f64, f64)> {
        extent(
            self.series
                .iter()
                .filter(|s| s.axis == side)
                .flat_map(|s| s.points.iter().map(|p| p.1)),
        )
        .map(|(lo, hi)| (lo.min(0.0), hi.max(0.0)))
    }

    /// Nearest point of every series to `x`
    pub fn tooltip(&self, x: f64) -> Option<Tooltip> {
        let mut rows = Vec::new();
        let mut snapped = None;
        for series in &self.series {
            if let Some((px, py)) = series.nearest(x) {
                snapped.get_or_insert(px);
                rows.push((series.label.clone(), series.color, py));
            }
        }
        snapped.map(|x| Tooltip { x, rows })
    }
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ChartModel {
        let mut chart = ChartModel::new("Births and deaths", ValueFormat::PerThousand);
        chart.series.push(ChartSeries::line(
            "Birth Rate",
            Color::Green,
            vec![(2000.0, 30.0), (2001.0, 29.0), (2005.0, 25.0)],
        ));
        chart
            .series
            .push(ChartSeries::line("Death Rate", Color::Red, vec![(2000.0, 9.0), (2005.0, 7.5)]).on_right());
        chart
    }

    #[test]
    fn test_nearest_bisects() {
        let chart = model();
        let births = &chart.series[0];
        assert_eq!(births.nearest(1990.0), Some((2000.0, 30.0)));
        assert_eq!(births.nearest(2001.4), Some((2001.0, 29.0)));
        assert_eq!(births.nearest(2003.5), Some((2005.0, 25.0)));
        assert_eq!(births.nearest(2050.0), Some((2005.0, 25.0)));
        assert_eq!(ChartSeries::line("x", Color::White, Vec::new()).nearest(1.0), None);
    }

    #[test]
    fn test_extents_per_axis() {
        let chart = model();
        assert!(chart.has_right_axis());
        assert_eq!(chart.x_extent(), Some((2000.0, 2005.0)));
        assert_eq!(chart.y_extent(AxisSide::Left), Some((0.0, 30.0)));
        assert_eq!(chart.y_extent(AxisSide::Right), Some((0.0, 9.0)));
    }

    #[test]
    fn test_tooltip_collects_every_series() {
        let tip = model().tooltip(2004.0).unwrap();
        assert_eq!(tip.x, 2005.0);
        assert_eq!(tip.rows.len(), 2);
        assert_eq!(tip.rows[1].2, 7.5);
        assert!(ChartModel::new("empty", ValueFormat::Count).tooltip(2000.0).is_none());
    }

    #[test]
    fn test_value_formats() {
        assert_eq!(ValueFormat::Count.full(1234.0), "1,234");
        assert_eq!(ValueFormat::Percent.full(1.234), "1.23%");
        assert_eq!(ValueFormat::PerThousand.tick(12.0), "12");
    }
}
