use rayon::prelude::*;
use tracing::warn;

use crate::chart::format_thousands;
use crate::data::{Band, CountryShape, PopulationTable};
use crate::error::Result;
use crate::map::{ColorScale, FeatureGrid, PALETTE};
use crate::source::DataSource;

/// Grid cell size in degrees for hover lookups
const GRID_CELL_DEG: f64 = 10.0;

/// Choropleth of the latest total population per country
pub struct MapView {
    pub shapes: Vec<CountryShape>,
    /// Latest (year, population) per shape
    pub values: Vec<Option<(i32, f64)>>,
    pub scale: ColorScale,
    /// Colour bucket per shape, `None` without data
    pub buckets: Vec<Option<usize>>,
    grid: FeatureGrid,
}

impl MapView {
    /// Boundaries are required; a missing population table only leaves the
    /// map grey.
    pub fn load(source: &dyn DataSource) -> Result<Self> {
        let (shapes, table) = rayon::join(|| source.boundaries(), || source.population(Band::Total));
        let table = table
            .map_err(|e| warn!(error = %e, "map drawn without population values"))
            .ok();
        Ok(Self::new(shapes?, table.as_ref()))
    }

    pub fn new(shapes: Vec<CountryShape>, table: Option<&PopulationTable>) -> Self {
        let values: Vec<Option<(i32, f64)>> = match table {
            Some(table) => shapes
                .par_iter()
                .map(|shape| table.find_country(&shape.name).and_then(|row| table.latest(row)))
                .collect(),
            None => vec![None; shapes.len()],
        };
        let scale = ColorScale::fit(values.iter().flatten().map(|&(_, v)| v), PALETTE.len());
        let buckets = values
            .iter()
            .map(|v| v.and_then(|(_, value)| scale.bucket(value)))
            .collect();
        let grid = FeatureGrid::build(shapes.iter().map(|s| s.bbox), GRID_CELL_DEG);
        Self {
            shapes,
            values,
            scale,
            buckets,
            grid,
        }
    }

    /// Index of the country containing the point
    pub fn country_at(&self, lon: f64, lat: f64) -> Option<usize> {
        self.grid
            .query_point(lon, lat)
            .iter()
            .copied()
            .find(|&idx| self.shapes[idx].contains(lon, lat))
    }

    pub fn name(&self, idx: usize) -> Option<&str> {
        self.shapes.get(idx).map(|s| s.name.as_str())
    }

    /// Hover text: name and latest population
    pub fn describe(&self, idx: usize) -> Option<String> {
        let name = self.name(idx)?;
        Some(match self.values.get(idx).copied().flatten() {
            Some((year, value)) => format!("{name}: {} ({year})", format_thousands(value)),
            None => format!("{name}: no data"),
        })
    }
}
