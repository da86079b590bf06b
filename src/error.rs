use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a view could not be built.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A dataset could not be read or parsed.
    #[error("{dataset} is unavailable: {source}")]
    DataUnavailable {
        dataset: String,
        #[source]
        source: BoxError,
    },

    /// The requested country has no row in a dataset.
    #[error("no data for \"{country}\" in {dataset}")]
    CountryNotFound { country: String, dataset: String },

    /// A remote request failed (connect, timeout, non-2xx status or bad body).
    #[error("request to {url} failed: {source}")]
    NetworkFailure {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl DashboardError {
    pub fn unavailable(dataset: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::DataUnavailable {
            dataset: dataset.into(),
            source: source.into(),
        }
    }

    pub fn not_found(country: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self::CountryNotFound {
            country: country.into(),
            dataset: dataset.into(),
        }
    }

    /// Short panel title for the fallback view
    pub fn title(&self) -> &'static str {
        match self {
            Self::DataUnavailable { .. } => "Data unavailable",
            Self::CountryNotFound { .. } => "Country not found",
            Self::NetworkFailure { .. } => "Network failure",
        }
    }

    /// What the user can do about it
    pub fn hint(&self) -> &'static str {
        match self {
            Self::DataUnavailable { .. } => "Check --data-dir and the CSV/topology files it points at.",
            Self::CountryNotFound { .. } => "Pick a country on the map, or type a route with ':'.",
            Self::NetworkFailure { .. } => {
                "Is the prediction API running? Use --api-url, or --no-forecast to skip it."
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
