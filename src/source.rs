use std::fs;
use std::io;
use std::path::PathBuf;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::{Settings, LOCAL_TOPOLOGY, WORLD_ATLAS_URL};
use crate::data::{parse_boundaries, Band, CountryShape, PopulationTable, VitalRatesTable, VITAL_RATES_FILE};
use crate::error::{DashboardError, Result};

/// Whose forecast to request
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    Country(String),
    World,
}

/// Everything a view builder may fetch. Implementations are shared across
/// loader threads.
pub trait DataSource: Send + Sync {
    fn population(&self, band: Band) -> Result<PopulationTable>;
    fn vital_rates(&self) -> Result<VitalRatesTable>;
    fn predictions(&self, band: Band, scope: &Scope) -> Result<Vec<f64>>;
    fn boundaries(&self) -> Result<Vec<CountryShape>>;
}

#[derive(Deserialize)]
struct PredictionResponse {
    predictions: Vec<f64>,
}

/// Client for `GET {base}/predict/total_population/{band}/{country}`
pub struct PredictionClient {
    base: String,
    http: Client,
}

impl PredictionClient {
    pub fn new(base: &str, http: Client) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// The world scope uses an empty country segment
    pub fn endpoint(&self, band: Band, scope: &Scope) -> String {
        let country = match scope {
            Scope::Country(name) => urlencoding::encode(name).into_owned(),
            Scope::World => String::new(),
        };
        format!("{}/predict/total_population/{}/{}", self.base, band.api_segment(), country)
    }

    pub fn fetch(&self, band: Band, scope: &Scope) -> Result<Vec<f64>> {
        let url = self.endpoint(band, scope);
        debug!(%url, "fetching predictions");
        self.http
            .get(&url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<PredictionResponse>())
            .map(|body| body.predictions)
            .map_err(|source| DashboardError::NetworkFailure { url, source })
    }
}

/// CSV files from a data directory, predictions over HTTP, boundaries from a
/// file or URL
pub struct FileSource {
    data_dir: PathBuf,
    topology: Option<String>,
    predictions: Option<PredictionClient>,
    http: Client,
}

impl FileSource {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|source| DashboardError::NetworkFailure {
                url: settings.api_url.clone(),
                source,
            })?;
        let predictions = settings
            .forecast
            .then(|| PredictionClient::new(&settings.api_url, http.clone()));
        Ok(Self {
            data_dir: settings.data_dir.clone(),
            topology: settings.topology.clone(),
            predictions,
            http,
        })
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        info!(%url, "downloading boundaries");
        self.http
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.bytes())
            .map(|bytes| bytes.to_vec())
            .map_err(|source| DashboardError::NetworkFailure {
                url: url.to_string(),
                source,
            })
    }

    fn topology_bytes(&self) -> Result<Vec<u8>> {
        match &self.topology {
            Some(loc) if is_url(loc) => self.fetch_bytes(loc),
            Some(path) => fs::read(path).map_err(|e| DashboardError::unavailable(path.as_str(), e)),
            None => {
                let local = self.data_dir.join(LOCAL_TOPOLOGY);
                match fs::read(&local) {
                    Ok(bytes) => Ok(bytes),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => self.fetch_bytes(WORLD_ATLAS_URL),
                    Err(e) => Err(DashboardError::unavailable(local.display().to_string(), e)),
                }
            }
        }
    }
}

impl DataSource for FileSource {
    fn population(&self, band: Band) -> Result<PopulationTable> {
        let path = self.data_dir.join(band.file_name());
        debug!(path = %path.display(), "reading population table");
        PopulationTable::load(&path).map_err(|e| DashboardError::unavailable(band.file_name(), e))
    }

    fn vital_rates(&self) -> Result<VitalRatesTable> {
        let path = self.data_dir.join(VITAL_RATES_FILE);
        VitalRatesTable::load(&path).map_err(|e| DashboardError::unavailable(VITAL_RATES_FILE, e))
    }

    fn predictions(&self, band: Band, scope: &Scope) -> Result<Vec<f64>> {
        match &self.predictions {
            Some(client) => client.fetch(band, scope),
            None => Ok(Vec::new()),
        }
    }

    fn boundaries(&self) -> Result<Vec<CountryShape>> {
        let bytes = self.topology_bytes()?;
        parse_boundaries(bytes).map_err(|e| DashboardError::unavailable("country boundaries", e))
    }
}

fn is_url(loc: &str) -> bool {
    loc.starts_with("http://") || loc.starts_with("https://")
}
