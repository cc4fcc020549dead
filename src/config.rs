//! Run configuration
//!
//! Everything the dashboard needs is resolved once, up front, into a
//! [`Config`] value. Environment lookups go through a caller-supplied
//! function so the resolution rules can be exercised without touching the
//! process environment.

use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use rand::Rng;
use tracing::info;

use crate::constants::{
    BUCKET_PREFIX, BUCKET_SUFFIX_LEN, DEFAULT_CITIES, DEFAULT_REGION, ENV_API_BASE, ENV_API_KEY,
    ENV_BUCKET_NAME, ENV_ENDPOINT_URL, ENV_REGION, OPENWEATHER_API_BASE,
};
use crate::error::ConfigError;

const BUCKET_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Unit system requested from the weather API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Units {
    /// Kelvin
    Standard,
    /// Celsius
    Metric,
    /// Fahrenheit
    #[default]
    Imperial,
}

impl Units {
    /// Value of the `units` query parameter, `None` for the API default
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            Units::Standard => None,
            Units::Metric => Some("metric"),
            Units::Imperial => Some("imperial"),
        }
    }

    /// Suffix printed after temperatures
    pub fn temperature_suffix(self) -> &'static str {
        match self {
            Units::Standard => "K",
            Units::Metric => "\u{00b0}C",
            Units::Imperial => "\u{00b0}F",
        }
    }
}

/// Options that come from the command line rather than the environment
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub cities: Vec<String>,
    pub units: Units,
    pub output_dir: PathBuf,
    pub show_charts: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            cities: DEFAULT_CITIES.iter().map(|c| c.to_string()).collect(),
            units: Units::default(),
            output_dir: PathBuf::from("."),
            show_charts: true,
        }
    }
}

/// Fully resolved configuration for one run
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub bucket_name: String,
    pub api_base_url: String,
    pub units: Units,
    pub region: String,
    /// Custom S3-compatible endpoint (MinIO, LocalStack, ...)
    pub endpoint: Option<String>,
    pub output_dir: PathBuf,
    pub show_charts: bool,
    pub cities: Vec<String>,
}

impl Config {
    /// Resolve configuration from `lookup` and `options`.
    ///
    /// The API key is checked first; when it is missing nothing else is
    /// read or written. When no bucket name is configured a new one is
    /// generated and appended to `settings_path` so later runs reuse it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] when the key is unset or empty,
    /// and [`ConfigError::PersistBucket`] when a generated name cannot be
    /// written to the settings file.
    pub fn resolve<F>(settings_path: &Path, lookup: F, options: RunOptions) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(ENV_API_KEY).ok_or(ConfigError::MissingApiKey)?;

        let bucket_name = match non_empty(ENV_BUCKET_NAME) {
            Some(name) => name,
            None => {
                let name = generate_bucket_name(BUCKET_PREFIX);
                persist_bucket_name(settings_path, &name)?;
                info!(bucket = %name, settings = %settings_path.display(), "Generated bucket name");
                name
            }
        };

        Ok(Self {
            api_key,
            bucket_name,
            api_base_url: non_empty(ENV_API_BASE).unwrap_or_else(|| OPENWEATHER_API_BASE.to_string()),
            units: options.units,
            region: non_empty(ENV_REGION).unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint: non_empty(ENV_ENDPOINT_URL),
            output_dir: options.output_dir,
            show_charts: options.show_charts,
            cities: options.cities,
        })
    }
}

/// Generate `<prefix>-` followed by random lowercase alphanumerics.
///
/// Nothing checks the name against buckets that already exist.
pub fn generate_bucket_name(prefix: &str) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..BUCKET_SUFFIX_LEN)
        .map(|_| BUCKET_CHARSET[rng.random_range(0..BUCKET_CHARSET.len())] as char)
        .collect();
    format!("{prefix}-{suffix}")
}

/// Append `AWS_BUCKET_NAME=<name>` to the settings file, creating it if needed.
pub fn persist_bucket_name(path: &Path, name: &str) -> Result<(), ConfigError> {
    let persist_err = |e| ConfigError::PersistBucket(path.to_path_buf(), e);

    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)
        .map_err(persist_err)?;

    // Keep the new entry on its own line
    let len = file.metadata().map_err(persist_err)?.len();
    let mut needs_newline = false;
    if len > 0 {
        let mut last = [0u8; 1];
        file.seek(SeekFrom::Start(len - 1)).map_err(persist_err)?;
        file.read_exact(&mut last).map_err(persist_err)?;
        needs_newline = last[0] != b'\n';
    }

    let prefix = if needs_newline { "\n" } else { "" };
    writeln!(file, "{prefix}{ENV_BUCKET_NAME}={name}").map_err(persist_err)
}
