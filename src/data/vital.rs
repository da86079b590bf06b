use std::io;
use std::path::Path;

use serde::Deserialize;

use super::{alternate_name, code_matches, name_matches, TableError};

/// Birth and death rate (per 1,000 people) for one country-year
#[derive(Clone, Debug, PartialEq)]
pub struct VitalRate {
    pub country: String,
    pub code: String,
    pub year: i32,
    pub birth_rate: Option<f64>,
    pub death_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct VitalRecord {
    #[serde(rename = "Country Name")]
    country: String,
    #[serde(rename = "Country Code", default)]
    code: String,
    #[serde(rename = "Year", deserialize_with = "csv::invalid_option")]
    year: Option<i32>,
    #[serde(rename = "Birth Rate", deserialize_with = "csv::invalid_option")]
    birth_rate: Option<f64>,
    #[serde(rename = "Death Rate", deserialize_with = "csv::invalid_option")]
    death_rate: Option<f64>,
}

/// Long-format table keyed by country and year
#[derive(Clone, Debug, Default)]
pub struct VitalRatesTable {
    rows: Vec<VitalRate>,
}

impl VitalRatesTable {
    pub fn load(path: &Path) -> Result<Self, TableError> {
        Self::from_csv(csv::Reader::from_path(path)?)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, TableError> {
        Self::from_csv(csv::Reader::from_reader(reader))
    }

    fn from_csv<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self, TableError> {
        let mut rows = Vec::new();
        for record in reader.deserialize::<VitalRecord>() {
            let record = record?;
            // Rows without a usable year cannot be placed on the chart
            let Some(year) = record.year else { continue };
            rows.push(VitalRate {
                country: record.country.trim().to_string(),
                code: record.code.trim().to_string(),
                year,
                birth_rate: record.birth_rate.filter(|v| v.is_finite()),
                death_rate: record.death_rate.filter(|v| v.is_finite()),
            });
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[VitalRate] {
        &self.rows
    }

    /// All years for one country, ascending. Matching follows
    /// `PopulationTable::find_country`: name, then ISO-3 code, then the
    /// alternate spelling. `None` when the country has no rows.
    pub fn for_country(&self, query: &str) -> Option<Vec<&VitalRate>> {
        let mut found = self.select(|r| name_matches(&r.country, query));
        if found.is_empty() {
            found = self.select(|r| code_matches(&r.code, query));
        }
        if found.is_empty() {
            if let Some(alt) = alternate_name(query) {
                found = self.select(|r| name_matches(&r.country, alt));
            }
        }
        if found.is_empty() {
            return None;
        }
        found.sort_by_key(|r| r.year);
        found.dedup_by_key(|r| r.year);
        Some(found)
    }

    fn select(&self, matches: impl Fn(&VitalRate) -> bool) -> Vec<&VitalRate> {
        self.rows.iter().filter(|r| matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Country Name,Country Code,Year,Birth Rate,Death Rate
Nepal,NPL,2001,33.1,9.2
Nepal,NPL,2000,34.0,
Peru,PER,2000,22.5,5.5
Peru,PER,n/a,1,1
";

    #[test]
    fn test_rows_for_country_sorted() {
        let t = VitalRatesTable::from_reader(SAMPLE.as_bytes()).unwrap();
        let nepal = t.for_country("NEPAL").unwrap();
        assert_eq!(nepal.len(), 2);
        assert_eq!(nepal[0].year, 2000);
        assert_eq!(nepal[0].death_rate, None);
        assert_eq!(nepal[1].birth_rate, Some(33.1));
    }

    #[test]
    fn test_bad_year_rows_skipped() {
        let t = VitalRatesTable::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(t.rows().len(), 3);
        assert_eq!(t.for_country("per").unwrap().len(), 1);
        assert!(t.for_country("Chile").is_none());
    }

    #[test]
    fn test_map_spelling_finds_dataset_row() {
        let csv = "Country Name,Country Code,Year,Birth Rate,Death Rate\nUnited States,USA,2020,11.0,10.3\n";
        let t = VitalRatesTable::from_reader(csv.as_bytes()).unwrap();
        let rows = t.for_country("United States of America").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].birth_rate, Some(11.0));
    }
}
