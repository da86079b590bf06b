use ratatui::style::Color;

use crate::chart::{ChartModel, ChartSeries, ValueFormat};
use crate::config::Settings;
use crate::data::Band;
use crate::error::Result;
use crate::series::Series;
use crate::source::{DataSource, Scope};

use super::{forecast_marker, load_band};

/// Year-over-year growth of the world total, history and forecast
pub struct GrowthRateView {
    pub rates: Series,
    pub chart: ChartModel,
}

impl GrowthRateView {
    pub fn load(source: &dyn DataSource, settings: &Settings) -> Result<Self> {
        let total = load_band(source, Band::Total, &Scope::World, settings)?;
        Ok(Self::from_total(&total, settings))
    }

    pub fn from_total(total: &Series, settings: &Settings) -> Self {
        let rates = total.growth_rates();
        let mut chart = ChartModel::new("World Population Growth Rate", ValueFormat::Percent);
        chart.y_label = "Annual change".to_string();
        let points = rates.points().iter().map(|p| (f64::from(p.year), p.value)).collect();
        chart.series.push(ChartSeries::area("Growth rate", Color::Rgb(55, 126, 184), points));
        chart.marker_x = forecast_marker(rates.points().iter().map(|p| p.year), settings);
        Self { rates, chart }
    }
}
