use std::io::Write;

use crate::data::Band;
use crate::series::AlignedRecord;
use crate::views::View;

/// Write the data behind a view as CSV
pub fn write_view<W: Write>(view: &View, writer: W) -> csv::Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    match view {
        View::Map(map) => {
            out.write_record(["country", "year", "population"])?;
            for (shape, value) in map.shapes.iter().zip(&map.values) {
                match value {
                    Some((year, population)) => {
                        out.write_record([shape.name.clone(), year.to_string(), population.to_string()])?
                    }
                    None => out.write_record([shape.name.as_str(), "", ""])?,
                }
            }
        }
        View::Country(country) => write_bands(&mut out, &country.records)?,
        View::World(world) => write_bands(&mut out, &world.records)?,
        View::GrowthRate(rate) => {
            out.write_record(["year", "growth_rate_percent"])?;
            for p in rate.rates.points() {
                out.write_record([p.year.to_string(), p.value.to_string()])?;
            }
        }
        View::VitalRates(vital) => {
            out.write_record(["year", "birth_rate", "death_rate"])?;
            for row in &vital.rows {
                out.write_record([row.year.to_string(), optional(row.birth_rate), optional(row.death_rate)])?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn write_bands<W: Write>(out: &mut csv::Writer<W>, records: &[AlignedRecord]) -> csv::Result<()> {
    let mut header = vec!["year"];
    header.extend(Band::ALL.iter().map(|b| b.key()));
    out.write_record(&header)?;
    for record in records {
        let mut row = vec![record.year.to_string()];
        row.extend(Band::ALL.iter().map(|&b| record.value(b).to_string()));
        out.write_record(&row)?;
    }
    Ok(())
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::router::Route;
    use crate::source::memory::MemorySource;
    use crate::source::Scope;
    use crate::views;

    fn export(route: &str, source: &MemorySource) -> String {
        let settings = Settings {
            history_start: 2022,
            ..Settings::default()
        };
        let view = views::build(source, &Route::parse(route).unwrap(), &settings).unwrap();
        let mut buf = Vec::new();
        write_view(&view, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_world_export() {
        let source = MemorySource::with_bands("Country Name,2022,2023\nA,1,2\nB,3,4\n")
            .predict(Band::Total, Scope::World, &[7.6]);
        assert_eq!(
            export("#world", &source),
            "year,total,age0_14,age15_64,age65\n2022,4,4,4,4\n2023,6,6,6,6\n2024,7,0,0,0\n"
        );
    }

    #[test]
    fn test_vital_export_leaves_missing_blank() {
        let mut source = MemorySource::default();
        source.vital = Some(
            crate::data::VitalRatesTable::from_reader(
                "Country Name,Country Code,Year,Birth Rate,Death Rate\nPeru,PER,2000,22.5,\n".as_bytes(),
            )
            .unwrap(),
        );
        assert_eq!(
            export("#country-birth-death-rate-chart?country=Peru", &source),
            "year,birth_rate,death_rate\n2000,22.5,\n"
        );
    }
}
