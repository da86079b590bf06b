use ratatui::style::Color;

use crate::braille::BrailleCanvas;
use crate::data::CountryShape;
use crate::map::geometry::{fill_polygon, stroke_ring};
use crate::map::projection::Viewport;

/// Sequential ramp, light to dark, one colour per bucket
pub const PALETTE: [Color; 6] = [
    Color::Rgb(254, 229, 217),
    Color::Rgb(252, 187, 161),
    Color::Rgb(252, 146, 114),
    Color::Rgb(251, 106, 74),
    Color::Rgb(222, 45, 38),
    Color::Rgb(165, 15, 21),
];

pub const NO_DATA_COLOR: Color = Color::DarkGray;

/// Quantize scale over log10(value); equal-width buckets between the
/// smallest and largest positive value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorScale {
    lo: f64,
    hi: f64,
    buckets: usize,
}

impl ColorScale {
    pub fn fit(values: impl Iterator<Item = f64>, buckets: usize) -> Self {
        let (mut lo, mut hi) = (f64::MAX, f64::MIN);
        for v in values.filter(|v| *v > 0.0) {
            let l = v.log10();
            lo = lo.min(l);
            hi = hi.max(l);
        }
        if lo > hi {
            (lo, hi) = (0.0, 0.0);
        }
        Self {
            lo,
            hi,
            buckets: buckets.max(1),
        }
    }

    pub fn buckets(&self) -> usize {
        self.buckets
    }

    /// Bucket for a value; non-positive values have none
    pub fn bucket(&self, value: f64) -> Option<usize> {
        if value <= 0.0 || !value.is_finite() {
            return None;
        }
        if self.hi <= self.lo {
            return Some(0);
        }
        let t = (value.log10() - self.lo) / (self.hi - self.lo);
        Some(((t * self.buckets as f64).floor().max(0.0) as usize).min(self.buckets - 1))
    }

    /// Lower and upper value of a bucket
    pub fn bounds(&self, bucket: usize) -> (f64, f64) {
        let step = (self.hi - self.lo) / self.buckets as f64;
        let lo = self.lo + step * bucket as f64;
        (10f64.powf(lo), 10f64.powf(lo + step))
    }
}

/// Map canvases, drawn back to front
pub struct MapLayers {
    /// One fill canvas per colour bucket
    pub fills: Vec<BrailleCanvas>,
    pub no_data: BrailleCanvas,
    pub borders: BrailleCanvas,
    pub highlight: BrailleCanvas,
}

pub struct RenderOptions {
    pub show_borders: bool,
    pub highlight: Option<usize>,
}

/// Fill every visible country into the canvas of its bucket
pub fn render_choropleth(
    shapes: &[CountryShape],
    buckets: &[Option<usize>],
    bucket_count: usize,
    options: &RenderOptions,
    width: usize,
    height: usize,
    viewport: &Viewport,
) -> MapLayers {
    let mut layers = MapLayers {
        fills: (0..bucket_count).map(|_| BrailleCanvas::new(width, height)).collect(),
        no_data: BrailleCanvas::new(width, height),
        borders: BrailleCanvas::new(width, height),
        highlight: BrailleCanvas::new(width, height),
    };
    let max_jump = viewport.width as f64 * 0.5;

    for (idx, shape) in shapes.iter().enumerate() {
        let (min_lon, min_lat, max_lon, max_lat) = shape.bbox;
        let top_left = viewport.project(min_lon, max_lat);
        let bottom_right = viewport.project(max_lon, min_lat);
        if !viewport.line_might_be_visible(top_left, bottom_right) {
            continue;
        }

        let canvas = match buckets.get(idx).copied().flatten() {
            Some(b) if b < layers.fills.len() => &mut layers.fills[b],
            _ => &mut layers.no_data,
        };

        for polygon in &shape.polygons {
            let projected: Vec<Vec<(f64, f64)>> = polygon
                .iter()
                .map(|ring| ring.iter().map(|&(lon, lat)| viewport.project_f(lon, lat)).collect())
                .collect();
            fill_polygon(canvas, &projected);
            if options.show_borders {
                for ring in &projected {
                    stroke_ring(&mut layers.borders, ring, max_jump);
                }
            }
            if options.highlight == Some(idx) {
                for ring in &projected {
                    stroke_ring(&mut layers.highlight, ring, max_jump);
                }
            }
        }
    }

    layers
}

/// Outline of a single shape, for the country panel
pub fn render_outline(shape: &CountryShape, width: usize, height: usize, viewport: &Viewport) -> BrailleCanvas {
    let mut canvas = BrailleCanvas::new(width, height);
    let max_jump = viewport.width as f64 * 0.75;
    for ring in shape.polygons.iter().flatten() {
        let projected: Vec<(f64, f64)> = ring.iter().map(|&(lon, lat)| viewport.project_f(lon, lat)).collect();
        stroke_ring(&mut canvas, &projected, max_jump);
    }
    canvas
}
