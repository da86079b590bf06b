use crate::chart::ChartModel;
use crate::config::Settings;
use crate::error::Result;
use crate::series::AlignedRecord;
use crate::source::{DataSource, Scope};

use super::{bands_chart, load_bands};

pub struct WorldView {
    pub records: Vec<AlignedRecord>,
    pub chart: ChartModel,
}

impl WorldView {
    pub fn load(source: &dyn DataSource, settings: &Settings) -> Result<Self> {
        let records = load_bands(source, &Scope::World, settings)?;
        let chart = bands_chart("World Population".to_string(), &records, settings);
        Ok(Self { records, chart })
    }
}
