//! Per-city orchestration
//!
//! Cities are processed one at a time, in list order. A city whose current
//! conditions cannot be fetched is skipped; malformed payloads and chart
//! failures stop the run.

use std::io::Write;
use std::path::PathBuf;

use serde_json::Value;
use tracing::{info, warn};

use crate::config::Units;
use crate::error::DashboardError;
use crate::formatters::format_reading;
use crate::models::{ForecastSeries, WeatherReading};
use crate::render::ChartRenderer;
use crate::service::WeatherSource;
use crate::storage::{save_weather, BucketStatus, ObjectStore};

/// What happened for one city
#[derive(Debug, Clone, PartialEq)]
pub struct CityReport {
    pub city: String,
    pub reading: Option<WeatherReading>,
    pub saved: bool,
    pub chart: Option<PathBuf>,
}

impl CityReport {
    fn skipped(city: &str) -> Self {
        Self {
            city: city.to_string(),
            reading: None,
            saved: false,
            chart: None,
        }
    }
}

/// Fetches, stores, and charts weather for a list of cities
#[derive(Debug)]
pub struct Dashboard<W, S, R> {
    weather: W,
    store: S,
    renderer: R,
    units: Units,
}

impl<W, S, R> Dashboard<W, S, R>
where
    W: WeatherSource,
    S: ObjectStore,
    R: ChartRenderer,
{
    pub fn new(weather: W, store: S, renderer: R, units: Units) -> Self {
        Self {
            weather,
            store,
            renderer,
            units,
        }
    }

    /// Make sure the bucket exists. Failures are reported and ignored.
    pub async fn provision(&self, out: &mut impl Write) -> Result<(), DashboardError> {
        let bucket = self.store.bucket_name();
        match self.store.ensure_bucket().await {
            Ok(BucketStatus::Exists) => writeln!(out, "Bucket {bucket} exists")?,
            Ok(BucketStatus::Created) => writeln!(out, "Bucket {bucket} created")?,
            Err(e) => {
                warn!(bucket = %bucket, error = %e, "Bucket provisioning failed");
                writeln!(out, "Error checking/creating bucket: {e}")?;
            }
        }
        Ok(())
    }

    /// Fetch, print, store, and chart one city
    pub async fn process_city(
        &self,
        city: &str,
        out: &mut impl Write,
    ) -> Result<CityReport, DashboardError> {
        writeln!(out, "\nFetching weather for {city}...")?;

        let body = match self.weather.fetch_weather(city).await {
            Ok(Some(body)) if has_content(&body) => body,
            Ok(_) => {
                writeln!(out, "Failed to fetch weather data for {city}")?;
                return Ok(CityReport::skipped(city));
            }
            Err(e) => {
                warn!(city = %city, error = %e, "Weather request failed");
                writeln!(out, "Failed to fetch weather data for {city}")?;
                return Ok(CityReport::skipped(city));
            }
        };

        let reading = WeatherReading::from_response(city, &body)?;
        write!(out, "{}", format_reading(&reading, self.units))?;

        let saved = save_weather(&self.store, city, &reading.raw).await;
        if saved {
            writeln!(out, "Successfully saved data for {city} to S3")?;
            writeln!(out, "Weather data for {city} saved to S3!")?;
        }

        let chart = match self.weather.fetch_forecast(city).await {
            Ok(Some(forecast)) if has_content(&forecast) => {
                let series = ForecastSeries::from_response(&forecast)?;
                Some(self.renderer.render(city, &series)?)
            }
            Ok(_) => None,
            Err(e) => {
                warn!(city = %city, error = %e, "Forecast request failed");
                None
            }
        };

        Ok(CityReport {
            city: city.to_string(),
            reading: Some(reading),
            saved,
            chart,
        })
    }

    /// Process every city in order
    pub async fn run<C>(
        &self,
        cities: &[C],
        out: &mut impl Write,
    ) -> Result<Vec<CityReport>, DashboardError>
    where
        C: AsRef<str>,
    {
        let mut reports = Vec::with_capacity(cities.len());
        for city in cities {
            reports.push(self.process_city(city.as_ref(), out).await?);
        }

        let fetched = reports.iter().filter(|r| r.reading.is_some()).count();
        info!(cities = cities.len(), fetched, "Dashboard run complete");
        Ok(reports)
    }
}

/// Whether a response body carries anything; null, false, zero, and empty
/// strings, arrays, or objects count as no data
fn has_content(body: &Value) -> bool {
    match body {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}
