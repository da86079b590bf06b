use tracing::debug;

use crate::config::Settings;
use crate::data::Band;
use crate::error::{DashboardError, Result};
use crate::series::{aggregate, align_bands, row_series, AlignedRecord, Series};
use crate::source::{DataSource, Scope};

/// All four bands for a country or the world, each extended with its
/// forecast and joined onto the total series' years.
pub fn load_bands(source: &dyn DataSource, scope: &Scope, settings: &Settings) -> Result<Vec<AlignedRecord>> {
    let load = |band| load_band(source, band, scope, settings);
    let ((total, age0_14), (age15_64, age65)) = rayon::join(
        || rayon::join(|| load(Band::Total), || load(Band::Age0To14)),
        || rayon::join(|| load(Band::Age15To64), || load(Band::Age65Plus)),
    );
    Ok(align_bands(&total?, &age0_14?, &age15_64?, &age65?))
}

/// One band. The country is resolved against the table first so the
/// forecast is requested under the dataset's own spelling of its name.
pub fn load_band(source: &dyn DataSource, band: Band, scope: &Scope, settings: &Settings) -> Result<Series> {
    let table = source.population(band)?;
    let (mut series, scope) = match scope {
        Scope::Country(name) => {
            let row = table
                .find_country(name)
                .ok_or_else(|| DashboardError::not_found(name.as_str(), band.file_name()))?;
            (row_series(&table, row), Scope::Country(row.name.clone()))
        }
        Scope::World => (aggregate(&table, settings.history()), Scope::World),
    };
    let predictions = source.predictions(band, &scope)?;
    debug!(?band, ?scope, history = series.len(), forecast = predictions.len(), "band loaded");
    series.append_forecast(&predictions, settings.forecast_start());
    Ok(series)
}
