mod aliases;
mod boundaries;
pub(crate) mod table;
mod topology;
mod vital;

pub use aliases::alternate_name;
pub use boundaries::{parse_boundaries, BoundaryError, CountryShape, Ring};
pub use table::{CountryRow, PopulationTable, TableError};
pub use vital::{VitalRate, VitalRatesTable};

/// An age-group partition of the population datasets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Band {
    Total,
    Age0To14,
    Age15To64,
    Age65Plus,
}

impl Band {
    pub const ALL: [Band; 4] = [Band::Total, Band::Age0To14, Band::Age15To64, Band::Age65Plus];

    /// CSV file holding this band, relative to the data directory
    pub fn file_name(self) -> &'static str {
        match self {
            Band::Total => "population_total.csv",
            Band::Age0To14 => "population_total_0-14.csv",
            Band::Age15To64 => "population_total_15-64.csv",
            Band::Age65Plus => "population_total_65_n_above.csv",
        }
    }

    /// Path segment used by the prediction API
    pub fn api_segment(self) -> &'static str {
        match self {
            Band::Total => "all",
            Band::Age0To14 => "0",
            Band::Age15To64 => "15",
            Band::Age65Plus => "65",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Band::Total => "Total Population",
            Band::Age0To14 => "Age 0–14",
            Band::Age15To64 => "Age 15–64",
            Band::Age65Plus => "Age 65+",
        }
    }

    /// Column name used when exporting aligned records
    pub fn key(self) -> &'static str {
        match self {
            Band::Total => "total",
            Band::Age0To14 => "age0_14",
            Band::Age15To64 => "age15_64",
            Band::Age65Plus => "age65",
        }
    }
}

/// File name of the merged birth/death-rate dataset
pub const VITAL_RATES_FILE: &str = "birth_death_rate.csv";

/// Country matching used by every lookup: case-insensitive on the trimmed
/// name, then case-insensitive on the ISO-3 code, then a known alternate name.
pub fn name_matches(name: &str, query: &str) -> bool {
    name.trim().to_lowercase() == query.trim().to_lowercase()
}

/// Name match directly or through the alternate spelling
pub fn same_country(name: &str, query: &str) -> bool {
    name_matches(name, query) || alternate_name(query).is_some_and(|alt| name_matches(name, alt))
}

pub fn code_matches(code: &str, query: &str) -> bool {
    let code = code.trim();
    !code.is_empty() && code.eq_ignore_ascii_case(query.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_matching_ignores_case() {
        assert!(name_matches("Nepal", "nepal"));
        assert!(name_matches(" Côte d'Ivoire", "CÔTE D'IVOIRE"));
        assert!(!name_matches("Niger", "Nigeria"));
        assert!(code_matches("NPL", "npl"));
        assert!(!code_matches("", ""));
    }
}
