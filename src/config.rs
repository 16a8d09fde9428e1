use std::path::PathBuf;

use thiserror::Error;

use crate::analysis::quantile::{DEFAULT_QUANTILES, DuplicatePolicy, UnknownPolicy};

// ---------------------------------------------------------------------------
// Environment variables
// ---------------------------------------------------------------------------

pub const ENV_DATABASE_URL: &str = "CENSUS_DATABASE_URL";
/// Consulted when [`ENV_DATABASE_URL`] is unset.
pub const ENV_DATABASE_URL_FALLBACK: &str = "DATABASE_URL";
pub const ENV_DATA_FILE: &str = "CENSUS_DATA_FILE";
pub const ENV_QUANTILES: &str = "CENSUS_QUANTILES";
pub const ENV_DUPLICATES: &str = "CENSUS_DUPLICATES";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("CENSUS_QUANTILES must be a positive integer, got '{0}'")]
    InvalidQuantiles(String),

    #[error("CENSUS_DUPLICATES: {0}")]
    Policy(#[from] UnknownPolicy),
}

// ---------------------------------------------------------------------------
// Startup configuration
// ---------------------------------------------------------------------------

/// Where to read data from and how to classify it.
///
/// Loaded once in `main`. A database URL wins over a data file; with
/// neither set the app starts empty and waits for File → Open.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// libpq-style connection string or `postgres://` URL.
    pub database_url: Option<String>,
    pub data_file: Option<PathBuf>,
    pub quantiles: usize,
    pub duplicates: DuplicatePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            data_file: None,
            quantiles: DEFAULT_QUANTILES,
            duplicates: DuplicatePolicy::Raise,
        }
    }
}

impl Config {
    /// Read `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Config {
            database_url: get(ENV_DATABASE_URL).or_else(|| get(ENV_DATABASE_URL_FALLBACK)),
            data_file: get(ENV_DATA_FILE).map(PathBuf::from),
            ..Config::default()
        };

        if let Some(raw) = get(ENV_QUANTILES) {
            config.quantiles = match raw.parse::<usize>() {
                Ok(k) if k >= 1 => k,
                _ => return Err(ConfigError::InvalidQuantiles(raw)),
            };
        }
        if let Some(raw) = get(ENV_DUPLICATES) {
            config.duplicates = raw.parse()?;
        }

        Ok(config)
    }
}
