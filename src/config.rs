use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::series::ForecastStart;

/// Remote world-atlas topology used when no local file is present
pub const WORLD_ATLAS_URL: &str = "https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json";

/// Local topology file looked up in the data directory first
pub const LOCAL_TOPOLOGY: &str = "countries-110m.json";

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal population dashboard: world map and demographic charts")]
pub struct Cli {
    /// Directory holding the population and birth/death-rate CSV files
    #[arg(long, env = "POPMAP_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Base URL of the population prediction API
    #[arg(long, env = "POPMAP_API_URL", default_value = "http://127.0.0.1:5000")]
    pub api_url: String,

    /// Country boundaries: TopoJSON/GeoJSON path or URL
    /// (default: <data-dir>/countries-110m.json, then the world-atlas CDN)
    #[arg(long, env = "POPMAP_TOPOLOGY")]
    pub topology: Option<String>,

    /// First forecast year
    #[arg(long, default_value_t = 2024)]
    pub pivot_year: i32,

    /// First year of the world aggregate
    #[arg(long, default_value_t = 1960)]
    pub history_start: i32,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Do not call the prediction API
    #[arg(long)]
    pub no_forecast: bool,

    /// Initial route, e.g. '#world' or '#countryChart?country=Nepal'
    #[arg(long, default_value = "#map")]
    pub route: String,

    /// Log file for the interactive dashboard (filter with RUST_LOG)
    #[arg(long, env = "POPMAP_LOG_FILE", default_value = "popmap.log")]
    pub log_file: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the data behind a route as CSV
    Export {
        /// Route to export, e.g. '#world'
        #[arg(long)]
        route: String,
    },
    /// List the recognised routes
    Routes,
}

/// Options the data source and view builders need
#[derive(Clone, Debug)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub api_url: String,
    pub topology: Option<String>,
    pub pivot_year: i32,
    pub history_start: i32,
    pub timeout: Duration,
    pub forecast: bool,
}

impl Settings {
    /// Years covered by the world aggregate: history start up to the year
    /// before the pivot
    pub fn history(&self) -> RangeInclusive<i32> {
        self.history_start..=self.pivot_year - 1
    }

    pub fn forecast_start(&self) -> ForecastStart {
        ForecastStart::Pivot(self.pivot_year)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            api_url: "http://127.0.0.1:5000".to_string(),
            topology: None,
            pivot_year: 2024,
            history_start: 1960,
            timeout: Duration::from_secs(10),
            forecast: true,
        }
    }
}

impl From<&Cli> for Settings {
    fn from(cli: &Cli) -> Self {
        Self {
            data_dir: cli.data_dir.clone(),
            api_url: cli.api_url.clone(),
            topology: cli.topology.clone(),
            pivot_year: cli.pivot_year,
            history_start: cli.history_start,
            timeout: Duration::from_secs(cli.timeout_secs),
            forecast: !cli.no_forecast,
        }
    }
}
