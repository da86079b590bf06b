use ratatui::style::Color;

use crate::chart::{ChartModel, ChartSeries, ValueFormat};
use crate::data::{VitalRate, VITAL_RATES_FILE};
use crate::error::{DashboardError, Result};
use crate::source::DataSource;

/// Birth rate on the left axis, death rate on the right
pub struct VitalRatesView {
    pub country: String,
    pub rows: Vec<VitalRate>,
    pub chart: ChartModel,
}

impl VitalRatesView {
    pub fn load(source: &dyn DataSource, country: &str) -> Result<Self> {
        let table = source.vital_rates()?;
        let rows: Vec<VitalRate> = table
            .for_country(country)
            .ok_or_else(|| DashboardError::not_found(country, VITAL_RATES_FILE))?
            .into_iter()
            .cloned()
            .collect();

        let mut chart = ChartModel::new(format!("Birth and Death Rates of {country}"), ValueFormat::PerThousand);
        chart.y_label = "Births per 1,000".to_string();
        chart.y2_label = Some("Deaths per 1,000".to_string());
        let births = rows
            .iter()
            .filter_map(|r| r.birth_rate.map(|v| (f64::from(r.year), v)))
            .collect();
        let deaths = rows
            .iter()
            .filter_map(|r| r.death_rate.map(|v| (f64::from(r.year), v)))
            .collect();
        chart.series.push(ChartSeries::line("Birth Rate", Color::Rgb(77, 175, 74), births));
        chart
            .series
            .push(ChartSeries::line("Death Rate", Color::Rgb(228, 26, 28), deaths).on_right());

        Ok(Self {
            country: country.to_string(),
            rows,
            chart,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::AxisSide;
    use crate::data::VitalRatesTable;
    use crate::source::memory::MemorySource;

    fn source() -> MemorySource {
        let csv = "Country Name,Country Code,Year,Birth Rate,Death Rate\n\
                   Nepal,NPL,2001,33.1,9.2\n\
                   Nepal,NPL,2000,34.0,\n\
                   Peru,PER,2000,22.5,5.5\n";
        MemorySource {
            vital: Some(VitalRatesTable::from_reader(csv.as_bytes()).unwrap()),
            ..MemorySource::default()
        }
    }

    #[test]
    fn test_dual_axis_series() {
        let view = VitalRatesView::load(&source(), "npl").unwrap();
        assert_eq!(view.rows.len(), 2);
        let [births, deaths] = view.chart.series.as_slice() else { panic!("two series") };
        assert_eq!(births.points, vec![(2000.0, 34.0), (2001.0, 33.1)]);
        assert_eq!(deaths.points, vec![(2001.0, 9.2)]);
        assert_eq!(deaths.axis, AxisSide::Right);
    }

    #[test]
    fn test_country_picked_on_map_resolves() {
        let csv = "Country Name,Country Code,Year,Birth Rate,Death Rate\nUnited States,USA,2020,11.0,10.3\n";
        let source = MemorySource {
            vital: Some(VitalRatesTable::from_reader(csv.as_bytes()).unwrap()),
            ..MemorySource::default()
        };
        let view = VitalRatesView::load(&source, "United States of America").unwrap();
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].death_rate, Some(10.3));
    }

    #[test]
    fn test_unknown_country() {
        let err = VitalRatesView::load(&source(), "Chile").err().unwrap();
        assert!(matches!(err, DashboardError::CountryNotFound { .. }));
        let err = VitalRatesView::load(&MemorySource::default(), "Peru").err().unwrap();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    }
}
