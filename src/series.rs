use std::ops::RangeInclusive;

use rayon::prelude::*;

use crate::data::{Band, CountryRow, PopulationTable};
use crate::error::{DashboardError, Result};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(year: i32, value: f64) -> Self {
        Self { year, value }
    }
}

/// Where appended forecast values begin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForecastStart {
    /// At the pivot year, or right after the last point if that is later
    Pivot(i32),
    /// Right after the last point
    AfterLast,
}

/// Yearly values for one metric, strictly ascending by year
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Series {
    points: Vec<SeriesPoint>,
}

impl Series {
    /// Sorts by year; a repeated year keeps its first value.
    pub fn from_points(mut points: Vec<SeriesPoint>) -> Self {
        points.sort_by_key(|p| p.year);
        points.dedup_by_key(|p| p.year);
        Self { points }
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_year(&self) -> Option<i32> {
        self.points.last().map(|p| p.year)
    }

    pub fn value_at(&self, year: i32) -> Option<f64> {
        self.points
            .binary_search_by_key(&year, |p| p.year)
            .ok()
            .map(|idx| self.points[idx].value)
    }

    /// Append one point per prediction, one year apart. Values are truncated to
    /// whole people. With `AfterLast` an empty series has no anchor year and
    /// nothing is appended.
    pub fn append_forecast(&mut self, predictions: &[f64], start: ForecastStart) {
        let first = match (start, self.last_year()) {
            (ForecastStart::Pivot(pivot), Some(last)) => pivot.max(last + 1),
            (ForecastStart::Pivot(pivot), None) => pivot,
            (ForecastStart::AfterLast, Some(last)) => last + 1,
            (ForecastStart::AfterLast, None) => return,
        };
        self.points.extend(
            predictions
                .iter()
                .zip(first..)
                .map(|(&value, year)| SeriesPoint::new(year, value.trunc())),
        );
    }

    /// Annualised year-over-year change in percent. Gaps between points are
    /// spread evenly over the missing years; non-positive bases are skipped.
    pub fn growth_rates(&self) -> Series {
        let points = self
            .points
            .windows(2)
            .filter(|w| w[0].value > 0.0 && w[1].value >= 0.0)
            .map(|w| {
                let span = f64::from(w[1].year - w[0].year);
                let rate = ((w[1].value / w[0].value).powf(1.0 / span) - 1.0) * 100.0;
                SeriesPoint::new(w[1].year, rate)
            })
            .collect();
        Series { points }
    }
}

/// One country's (or the world's) series for `dataset`, non-numeric cells
/// dropped.
pub fn country_series(table: &PopulationTable, country: &str, dataset: &str) -> Result<Series> {
    let row = table
        .find_country(country)
        .ok_or_else(|| DashboardError::not_found(country, dataset))?;
    Ok(row_series(table, row))
}

/// Series for a row already found in `table`
pub fn row_series(table: &PopulationTable, row: &CountryRow) -> Series {
    let points = table
        .years()
        .iter()
        .zip(row.cells())
        .filter_map(|(&year, cell)| cell.map(|value| SeriesPoint::new(year, value)))
        .collect();
    Series::from_points(points)
}

/// Per-year sum over every row of the table, non-numeric cells as 0
pub fn aggregate(table: &PopulationTable, years: RangeInclusive<i32>) -> Series {
    let points = years
        .into_par_iter()
        .map(|year| SeriesPoint::new(year, table.year_total(year)))
        .collect();
    Series::from_points(points)
}

/// The four bands for one year
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AlignedRecord {
    pub year: i32,
    pub total: f64,
    pub age0_14: f64,
    pub age15_64: f64,
    pub age65: f64,
}

impl AlignedRecord {
    pub fn value(&self, band: Band) -> f64 {
        match band {
            Band::Total => self.total,
            Band::Age0To14 => self.age0_14,
            Band::Age15To64 => self.age15_64,
            Band::Age65Plus => self.age65,
        }
    }

    pub fn max(&self) -> f64 {
        Band::ALL.iter().map(|&b| self.value(b)).fold(0.0, f64::max)
    }
}

/// Join the age bands onto the years of the total series. A band with no
/// value for a year contributes 0.
pub fn align_bands(total: &Series, age0_14: &Series, age15_64: &Series, age65: &Series) -> Vec<AlignedRecord> {
    total
        .points()
        .iter()
        .map(|p| AlignedRecord {
            year: p.year,
            total: p.value,
            age0_14: age0_14.value_at(p.year).unwrap_or(0.0),
            age15_64: age15_64.value_at(p.year).unwrap_or(0.0),
            age65: age65.value_at(p.year).unwrap_or(0.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::table;

    fn years(series: &Series) -> Vec<i32> {
        series.points().iter().map(|p| p.year).collect()
    }

    fn pairs(series: &Series) -> Vec<(i32, f64)> {
        series.points().iter().map(|p| (p.year, p.value)).collect()
    }

    #[test]
    fn test_country_series_never_mixes_rows() {
        let t = table("Country Name,Country Code,2000,2001\nAlpha,AAA,1,2\nBeta,BBB,100,200\n");
        let alpha = country_series(&t, "alpha", "test").unwrap();
        assert_eq!(pairs(&alpha), vec![(2000, 1.0), (2001, 2.0)]);
        let beta = country_series(&t, "Beta", "test").unwrap();
        assert_eq!(pairs(&beta), vec![(2000, 100.0), (2001, 200.0)]);
    }

    #[test]
    fn test_absent_country_is_an_error() {
        let t = table("Country Name,Country Code,2000\nAlpha,AAA,1\n");
        let err = country_series(&t, "Gamma", "population_total.csv").unwrap_err();
        assert!(matches!(err, DashboardError::CountryNotFound { ref country, .. } if country == "Gamma"));
    }

    #[test]
    fn test_series_sorted_and_non_numeric_dropped() {
        let t = table("Country Name,2002,2000,2001\nFoo,3,1,x\n");
        let s = country_series(&t, "Foo", "test").unwrap();
        assert_eq!(pairs(&s), vec![(2000, 1.0), (2002, 3.0)]);
    }

    #[test]
    fn test_pivot_scenario_leaves_gap() {
        let t = table("Country Name,2020,2021\nFoo,100,110\n");
        let mut s = country_series(&t, "Foo", "test").unwrap();
        s.append_forecast(&[120.0, 130.0], ForecastStart::Pivot(2024));
        assert_eq!(
            pairs(&s),
            vec![(2020, 100.0), (2021, 110.0), (2024, 120.0), (2025, 130.0)]
        );
    }

    #[test]
    fn test_forecast_after_last_has_no_gaps() {
        let mut s = Series::from_points(vec![SeriesPoint::new(1999, 5.0), SeriesPoint::new(2000, 6.0)]);
        s.append_forecast(&[7.9, 8.2, 9.0], ForecastStart::AfterLast);
        assert_eq!(years(&s), vec![1999, 2000, 2001, 2002, 2003]);
        assert_eq!(s.value_at(2001), Some(7.0));
    }

    #[test]
    fn test_pivot_before_last_year_stays_increasing() {
        let mut s = Series::from_points(vec![SeriesPoint::new(2023, 1.0), SeriesPoint::new(2025, 1.0)]);
        s.append_forecast(&[2.0, 3.0], ForecastStart::Pivot(2024));
        assert_eq!(years(&s), vec![2023, 2025, 2026, 2027]);
    }

    #[test]
    fn test_forecast_on_empty_series() {
        let mut s = Series::default();
        s.append_forecast(&[1.0], ForecastStart::AfterLast);
        assert!(s.is_empty());
        s.append_forecast(&[1.0, 2.0], ForecastStart::Pivot(2024));
        assert_eq!(years(&s), vec![2024, 2025]);
    }

    #[test]
    fn test_aggregate_treats_bad_cells_as_zero() {
        let t = table("Country Name,2000\nA,10\nB,bad\nC,20\n");
        let s = aggregate(&t, 2000..=2000);
        assert_eq!(pairs(&s), vec![(2000, 30.0)]);
    }

    #[test]
    fn test_aggregate_covers_whole_range() {
        let t = table("Country Name,2000,2001\nA,1,2\nB,3,\n");
        let s = aggregate(&t, 1999..=2002);
        assert_eq!(pairs(&s), vec![(1999, 0.0), (2000, 4.0), (2001, 2.0), (2002, 0.0)]);
    }

    #[test]
    fn test_align_zero_fills_missing_bands() {
        let total = Series::from_points(vec![SeriesPoint::new(2000, 10.0), SeriesPoint::new(2001, 11.0)]);
        let young = Series::from_points(vec![SeriesPoint::new(2000, 3.0)]);
        let mid = Series::from_points(vec![SeriesPoint::new(2000, 6.0), SeriesPoint::new(2001, 7.0)]);
        let old = Series::from_points(vec![SeriesPoint::new(2001, 1.5)]);
        let records = align_bands(&total, &young, &mid, &old);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], AlignedRecord { year: 2000, total: 10.0, age0_14: 3.0, age15_64: 6.0, age65: 0.0 });
        assert_eq!(records[1], AlignedRecord { year: 2001, total: 11.0, age0_14: 0.0, age15_64: 7.0, age65: 1.5 });
        assert_eq!(records[1].max(), 11.0);
    }

    #[test]
    fn test_growth_rates() {
        let s = Series::from_points(vec![
            SeriesPoint::new(2000, 100.0),
            SeriesPoint::new(2001, 110.0),
            SeriesPoint::new(2003, 133.1),
        ]);
        let g = s.growth_rates();
        assert_eq!(years(&g), vec![2001, 2003]);
        assert!((g.points()[0].value - 10.0).abs() < 1e-9);
        assert!((g.points()[1].value - 10.0).abs() < 1e-9);
    }
}
