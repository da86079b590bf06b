//! View builders: one per route, each turning fetched datasets into a
//! finished model the UI can draw without further I/O.

mod bands;
mod country;
mod map;
mod rate;
mod vital;
mod world;

use tracing::info;

use crate::chart::{ChartModel, ChartSeries, ValueFormat, BAND_COLORS};
use crate::config::Settings;
use crate::data::Band;
use crate::error::Result;
use crate::router::Route;
use crate::series::AlignedRecord;
use crate::source::DataSource;

pub use bands::{load_band, load_bands};
pub use country::{iso2_code, CountryView};
pub use map::MapView;
pub use rate::GrowthRateView;
pub use vital::VitalRatesView;
pub use world::WorldView;

pub enum View {
    Map(MapView),
    Country(CountryView),
    World(WorldView),
    GrowthRate(GrowthRateView),
    VitalRates(VitalRatesView),
}

impl View {
    /// Chart drawn for this view; the map has none
    pub fn chart(&self) -> Option<&ChartModel> {
        match self {
            View::Map(_) => None,
            View::Country(v) => Some(&v.chart),
            View::World(v) => Some(&v.chart),
            View::GrowthRate(v) => Some(&v.chart),
            View::VitalRates(v) => Some(&v.chart),
        }
    }
}

/// Run the builder matching `route`
pub fn build(source: &dyn DataSource, route: &Route, settings: &Settings) -> Result<View> {
    info!(%route, "building view");
    match route {
        Route::Map => MapView::load(source).map(View::Map),
        Route::CountryChart { country } => CountryView::load(source, country, settings).map(View::Country),
        Route::World => WorldView::load(source, settings).map(View::World),
        Route::WorldPopulationRate => GrowthRateView::load(source, settings).map(View::GrowthRate),
        Route::CountryBirthDeathRate { country } => {
            VitalRatesView::load(source, country).map(View::VitalRates)
        }
    }
}

/// Line chart of the four aligned bands
fn bands_chart(title: String, records: &[AlignedRecord], settings: &Settings) -> ChartModel {
    let mut chart = ChartModel::new(title, ValueFormat::Count);
    chart.y_label = "Population".to_string();
    chart.series = Band::ALL
        .iter()
        .zip(BAND_COLORS)
        .map(|(&band, color)| {
            let points = records.iter().map(|r| (f64::from(r.year), r.value(band))).collect();
            ChartSeries::line(band.label(), color, points)
        })
        .collect();
    chart.marker_x = forecast_marker(records.iter().map(|r| r.year), settings);
    chart
}

/// The pivot year, when any point lies at or beyond it
fn forecast_marker(mut years: impl Iterator<Item = i32>, settings: &Settings) -> Option<f64> {
    years
        .any(|y| y >= settings.pivot_year)
        .then(|| f64::from(settings.pivot_year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::memory::MemorySource;
    use crate::source::Scope;

    #[test]
    fn test_every_route_builds_its_own_view() {
        let mut source = MemorySource::with_bands("Country Name,Country Code,2022,2023\nNepal,NPL,29,30\n")
            .predict(Band::Total, Scope::World, &[31.0]);
        source.vital = Some(
            crate::data::VitalRatesTable::from_reader("Country Name,Country Code,Year,Birth Rate,Death Rate\nNepal,NPL,2000,34,9\n".as_bytes())
                .unwrap(),
        );
        let settings = Settings {
            history_start: 2022,
            ..Settings::default()
        };

        let cases = [
            ("#map", "map"),
            ("#countryChart?country=Nepal", "country"),
            ("#world", "world"),
            ("#worldPopulationRate", "rate"),
            ("#country-birth-death-rate-chart?country=Nepal", "vital"),
        ];
        for (hash, expected) in cases {
            let route = Route::parse(hash).unwrap();
            let view = build(&source, &route, &settings).unwrap();
            let kind = match view {
                View::Map(_) => "map",
                View::Country(_) => "country",
                View::World(_) => "world",
                View::GrowthRate(_) => "rate",
                View::VitalRates(_) => "vital",
            };
            assert_eq!(kind, expected, "{hash}");
        }
    }

    #[test]
    fn test_bands_chart_marks_forecast() {
        let records = vec![
            AlignedRecord { year: 2023, total: 10.0, ..Default::default() },
            AlignedRecord { year: 2024, total: 11.0, ..Default::default() },
        ];
        let chart = bands_chart("Nepal".into(), &records, &Settings::default());
        assert_eq!(chart.series.len(), 4);
        assert_eq!(chart.series[0].points, vec![(2023.0, 10.0), (2024.0, 11.0)]);
        assert_eq!(chart.marker_x, Some(2024.0));

        let chart = bands_chart("Nepal".into(), &records[..1], &Settings::default());
        assert_eq!(chart.marker_x, None);
    }
}
