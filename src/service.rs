use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{Config, Units};
use crate::constants::USER_AGENT;
use crate::error::WeatherError;

/// Source of current conditions and forecasts
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Current conditions for `city`, `None` when the API did not answer 200
    async fn fetch_weather(&self, city: &str) -> Result<Option<Value>, WeatherError>;

    /// 5-day / 3-hour forecast for `city`, `None` when the API did not answer 200
    async fn fetch_forecast(&self, city: &str) -> Result<Option<Value>, WeatherError>;
}

/// OpenWeather HTTP client
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    units: Units,
}

impl OpenWeatherClient {
    /// Creates a client for the API described by `config`
    pub fn new(config: &Config) -> Result<Self, WeatherError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            units: config.units,
        })
    }

    /// Makes a GET request against `endpoint` for `city`.
    ///
    /// Only a 200 response yields a body; it is returned exactly as parsed.
    async fn make_request(
        &self,
        endpoint: &str,
        city: &str,
        what: &str,
    ) -> Result<Option<Value>, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut query = vec![("q", city), ("appid", self.api_key.as_str())];
        if let Some(units) = self.units.query_value() {
            query.push(("units", units));
        }

        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            warn!(city = %city, status = status.as_u16(), "Failed to fetch {what} data");
            return Ok(None);
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| WeatherError::Decode(e.to_string()))?;
        debug!(city = %city, "Fetched {what} data");

        Ok(Some(body))
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch_weather(&self, city: &str) -> Result<Option<Value>, WeatherError> {
        self.make_request("weather", city, "weather").await
    }

    async fn fetch_forecast(&self, city: &str) -> Result<Option<Value>, WeatherError> {
        self.make_request("forecast", city, "forecast").await
    }
}
