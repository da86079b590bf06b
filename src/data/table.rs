use std::io;
use std::path::Path;

use thiserror::Error;

use super::{alternate_name, code_matches, name_matches};

#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("missing column \"{0}\"")]
    MissingColumn(&'static str),
}

/// One country's row: name, ISO-3 code and a cell per year column
#[derive(Clone, Debug)]
pub struct CountryRow {
    pub name: String,
    pub code: String,
    cells: Vec<Option<f64>>,
}

impl CountryRow {
    pub fn cells(&self) -> &[Option<f64>] {
        &self.cells
    }
}

/// Wide-format population table: `Country Name`, `Country Code`, then one
/// column per year. Columns whose header is not a year are ignored.
#[derive(Clone, Debug, Default)]
pub struct PopulationTable {
    years: Vec<i32>,
    rows: Vec<CountryRow>,
}

impl PopulationTable {
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        Self::from_csv(reader)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, TableError> {
        let reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        Self::from_csv(reader)
    }

    fn from_csv<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self, TableError> {
        let headers = reader.headers()?.clone();
        let column = |wanted: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == wanted)
                .ok_or(TableError::MissingColumn(wanted))
        };
        let name_col = column("Country Name")?;
        let code_col = column("Country Code").ok();

        // (column index, year) for every header that parses as a year
        let year_cols: Vec<(usize, i32)> = headers
            .iter()
            .enumerate()
            .filter_map(|(idx, h)| h.trim().parse::<i32>().ok().map(|year| (idx, year)))
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let name = record.get(name_col).unwrap_or("").trim();
            if name.is_empty() {
                continue;
            }
            let code = code_col.and_then(|c| record.get(c)).unwrap_or("").trim();
            let cells = year_cols
                .iter()
                .map(|&(idx, _)| record.get(idx).and_then(parse_cell))
                .collect();
            rows.push(CountryRow {
                name: name.to_string(),
                code: code.to_string(),
                cells,
            });
        }

        Ok(Self {
            years: year_cols.into_iter().map(|(_, year)| year).collect(),
            rows,
        })
    }

    /// Year of each cell column, in file order
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn rows(&self) -> &[CountryRow] {
        &self.rows
    }

    /// Find a country by name, falling back to its ISO-3 code and then to
    /// the alternate spelling of the name
    pub fn find_country(&self, query: &str) -> Option<&CountryRow> {
        self.rows
            .iter()
            .find(|row| name_matches(&row.name, query))
            .or_else(|| self.rows.iter().find(|row| code_matches(&row.code, query)))
            .or_else(|| {
                let alt = alternate_name(query)?;
                self.rows.iter().find(|row| name_matches(&row.name, alt))
            })
    }

    /// Sum of one year's column over every row, non-numeric cells as 0
    pub fn year_total(&self, year: i32) -> f64 {
        match self.years.iter().position(|&y| y == year) {
            Some(col) => self.rows.iter().filter_map(|row| row.cells[col]).sum(),
            None => 0.0,
        }
    }

    /// Most recent numeric value in a row, with its year
    pub fn latest(&self, row: &CountryRow) -> Option<(i32, f64)> {
        self.years
            .iter()
            .zip(&row.cells)
            .filter_map(|(&year, cell)| cell.map(|v| (year, v)))
            .max_by_key(|&(year, _)| year)
    }
}

/// Numeric cell value; empty or non-numeric cells are `None`
pub fn parse_cell(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
pub(crate) fn table(csv: &str) -> PopulationTable {
    PopulationTable::from_reader(csv.as_bytes()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
Country Name,Country Code,Indicator Name,1960,1961,1962
Aruba,ABW,Population,54608,55811,
Nepal,NPL,Population,10105060,10267260,10433824
\"Korea, Rep.\",KOR,Population,25012374,n/a,26261871
";

    #[test]
    fn test_parse_year_columns() {
        let t = table(SAMPLE);
        assert_eq!(t.years(), &[1960, 1961, 1962]);
        assert_eq!(t.rows().len(), 3);
        assert_eq!(t.rows()[2].name, "Korea, Rep.");
        assert_eq!(t.rows()[0].cells(), &[Some(54608.0), Some(55811.0), None]);
        assert_eq!(t.rows()[2].cells()[1], None);
    }

    #[test]
    fn test_find_country() {
        let t = table(SAMPLE);
        assert_eq!(t.find_country("nepal").unwrap().code, "NPL");
        assert_eq!(t.find_country("kor").unwrap().name, "Korea, Rep.");
        assert!(t.find_country("Atlantis").is_none());
        assert_eq!(t.find_country("South Korea").unwrap().code, "KOR");
    }

    #[test]
    fn test_year_total_skips_non_numeric() {
        let t = table(SAMPLE);
        assert_eq!(t.year_total(1961), 55811.0 + 10267260.0);
        assert_eq!(t.year_total(1999), 0.0);
    }

    #[test]
    fn test_latest() {
        let t = table(SAMPLE);
        assert_eq!(t.latest(&t.rows()[0]), Some((1961, 55811.0)));
    }

    #[test]
    fn test_missing_name_column() {
        let err = PopulationTable::from_reader("Name,1960\nX,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::MissingColumn("Country Name")));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let t = PopulationTable::load(file.path()).unwrap();
        assert_eq!(t.rows().len(), 3);
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell(" 12.5 "), Some(12.5));
        assert_eq!(parse_cell(""), None);
        assert_eq!(parse_cell("bad"), None);
        assert_eq!(parse_cell("NaN"), None);
    }
}
