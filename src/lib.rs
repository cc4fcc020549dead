//! Weather dashboard
//!
//! Fetches current conditions and forecasts from OpenWeather, stores the raw
//! JSON in S3, and renders a forecast chart per city.

pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod formatters;
pub mod models;
pub mod render;
pub mod service;
pub mod storage;

pub use config::{Config, RunOptions, Units};
pub use dashboard::{CityReport, Dashboard};
pub use error::{ConfigError, DashboardError, ModelError, RenderError, StorageError, WeatherError};
pub use models::{ForecastPoint, ForecastSeries, WeatherReading};
pub use render::{ChartRenderer, PngChartRenderer};
pub use service::{OpenWeatherClient, WeatherSource};
pub use storage::{BucketStatus, ObjectStore, S3Store};
