use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ModelError;

// ============================================================================
// OpenWeather API Models
// ============================================================================

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    main: MainBlock,
    weather: Vec<ConditionBlock>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    description: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: ForecastMain,
}

#[derive(Debug, Deserialize)]
struct ForecastMain {
    temp: f64,
}

// ============================================================================
// Dashboard Models
// ============================================================================

/// Current conditions for one city
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub city: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub description: String,
    /// Response body exactly as received
    pub raw: Value,
}

impl WeatherReading {
    /// Extracts the summary fields from a current conditions body
    pub fn from_response(city: &str, body: &Value) -> Result<Self, ModelError> {
        let parsed = CurrentResponse::deserialize(body).map_err(|source| ModelError::Conditions {
            city: city.to_string(),
            source,
        })?;

        let description = parsed
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or_else(|| ModelError::MissingDescription(city.to_string()))?;

        Ok(Self {
            city: city.to_string(),
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity: parsed.main.humidity,
            description,
            raw: body.clone(),
        })
    }
}

/// A single forecast sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub time: DateTime<Utc>,
    pub temperature: f64,
}

/// Temperature samples in the order the API listed them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastSeries {
    pub points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    /// Builds one point per `list` entry of a forecast body
    pub fn from_response(body: &Value) -> Result<Self, ModelError> {
        let parsed = ForecastResponse::deserialize(body).map_err(ModelError::Forecast)?;

        let points = parsed
            .list
            .into_iter()
            .map(|entry| {
                let time =
                    DateTime::from_timestamp(entry.dt, 0).ok_or(ModelError::Timestamp(entry.dt))?;
                Ok(ForecastPoint {
                    time,
                    temperature: entry.main.temp,
                })
            })
            .collect::<Result<Vec<_>, ModelError>>()?;

        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Lowest and highest temperature, `None` when empty
    pub fn temperature_bounds(&self) -> Option<(f64, f64)> {
        self.points.iter().fold(None, |acc, p| match acc {
            None => Some((p.temperature, p.temperature)),
            Some((lo, hi)) => Some((lo.min(p.temperature), hi.max(p.temperature))),
        })
    }

    /// Earliest and latest timestamp as Unix seconds, `None` when empty
    pub fn time_bounds(&self) -> Option<(i64, i64)> {
        let earliest = self.points.iter().map(|p| p.time.timestamp()).min()?;
        let latest = self.points.iter().map(|p| p.time.timestamp()).max()?;
        Some((earliest, latest))
    }
}
