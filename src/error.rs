use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key must be set in the OPENWEATHER_API_KEY environment variable")]
    MissingApiKey,

    #[error("Failed to persist bucket name to '{0}'")]
    PersistBucket(PathBuf, #[source] std::io::Error),
}

/// Errors raised by the weather client
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The request never produced a response
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body was not valid JSON
    #[error("Failed to decode response body: {0}")]
    Decode(String),
}

/// Errors raised by the object store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage configuration: {0}")]
    Config(String),

    #[error("S3 request failed: {0}")]
    S3(#[from] s3::error::S3Error),

    #[error("S3 returned status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised while mapping API responses onto the data model
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Malformed current conditions for {city}: {source}")]
    Conditions {
        city: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Current conditions for {0} contain no weather description")]
    MissingDescription(String),

    #[error("Malformed forecast response: {0}")]
    Forecast(#[source] serde_json::Error),

    #[error("Forecast timestamp {0} is out of range")]
    Timestamp(i64),
}

/// Errors raised while drawing a forecast chart
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to draw chart '{path}': {message}")]
    Draw { path: PathBuf, message: String },
}

/// Fatal errors that stop a dashboard run
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Failed to write status output: {0}")]
    Output(#[from] std::io::Error),
}
