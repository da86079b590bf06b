use tracing::warn;

use crate::chart::ChartModel;
use crate::config::Settings;
use crate::data::{same_country, CountryShape};
use crate::error::Result;
use crate::series::AlignedRecord;
use crate::source::{DataSource, Scope};

use super::{bands_chart, load_bands};

/// ISO 3166-1 alpha-2 codes for the countries with a flag
const ISO2: [(&str, &str); 17] = [
    ("United States", "us"),
    ("United Kingdom", "gb"),
    ("India", "in"),
    ("China", "cn"),
    ("Russia", "ru"),
    ("Japan", "jp"),
    ("Nepal", "np"),
    ("Ukraine", "ua"),
    ("Indonesia", "id"),
    ("Canada", "ca"),
    ("Brazil", "br"),
    ("Germany", "de"),
    ("France", "fr"),
    ("Mexico", "mx"),
    ("Nigeria", "ng"),
    ("Bangladesh", "bd"),
    ("Ethiopia", "et"),
];

/// Two-letter code for a country, `un` when unknown
pub fn iso2_code(country: &str) -> &'static str {
    ISO2.iter()
        .find(|(name, _)| same_country(name, country))
        .map_or("un", |&(_, code)| code)
}

/// Age bands of one country with its outline
pub struct CountryView {
    pub country: String,
    pub records: Vec<AlignedRecord>,
    pub chart: ChartModel,
    pub iso2: &'static str,
    /// `None` when boundaries could not be loaded or have no such country
    pub outline: Option<CountryShape>,
}

impl CountryView {
    pub fn load(source: &dyn DataSource, country: &str, settings: &Settings) -> Result<Self> {
        let scope = Scope::Country(country.to_string());
        let (records, shapes) = rayon::join(|| load_bands(source, &scope, settings), || source.boundaries());
        let records = records?;

        let outline = match shapes {
            Ok(shapes) => shapes.into_iter().find(|s| same_country(&s.name, country)),
            Err(e) => {
                warn!(error = %e, country, "country outline unavailable");
                None
            }
        };

        let chart = bands_chart(format!("Population of {country}"), &records, settings);
        Ok(Self {
            country: country.to_string(),
            records,
            chart,
            iso2: iso2_code(country),
            outline,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use crate::source::memory::MemorySource;

    #[test]
    fn test_iso2_codes() {
        assert_eq!(iso2_code("nepal"), "np");
        assert_eq!(iso2_code("Russian Federation"), "ru");
        assert_eq!(iso2_code("Peru"), "un");
    }

    #[test]
    fn test_outline_found_through_alias() {
        let mut source = MemorySource::with_bands("Country Name,Country Code,2020\nUnited States,USA,331\n");
        let ring = vec![(-100.0, 30.0), (-90.0, 30.0), (-90.0, 40.0), (-100.0, 30.0)];
        source.shapes = vec![CountryShape::new("United States of America".into(), Some("840".into()), vec![vec![ring]])];

        let view = CountryView::load(&source, "United States", &Settings::default()).unwrap();
        assert_eq!(view.iso2, "us");
        assert_eq!(view.outline.map(|s| s.id), Some(Some("840".to_string())));
        assert_eq!(view.records.len(), 1);
        assert_eq!(view.chart.title, "Population of United States");
    }

    #[test]
    fn test_unknown_country() {
        let source = MemorySource::with_bands("Country Name,2020\nNepal,29\n");
        let err = CountryView::load(&source, "Atlantis", &Settings::default()).err().unwrap();
        assert!(matches!(err, DashboardError::CountryNotFound { .. }));
    }
}
