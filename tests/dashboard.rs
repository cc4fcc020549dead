//! Orchestrator scenarios with in-memory weather, storage, and chart fakes

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use weather_dashboard::{
    BucketStatus, ChartRenderer, Dashboard, DashboardError, ForecastSeries, ObjectStore,
    RenderError, StorageError, Units, WeatherError, WeatherSource,
};

// ============================================================================
// Fakes
// ============================================================================

#[derive(Default, Clone)]
struct FakeWeather {
    current: HashMap<String, Option<Value>>,
    forecast: HashMap<String, Option<Value>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeWeather {
    fn with_current(mut self, city: &str, body: Option<Value>) -> Self {
        self.current.insert(city.to_string(), body);
        self
    }

    fn with_forecast(mut self, city: &str, body: Option<Value>) -> Self {
        self.forecast.insert(city.to_string(), body);
        self
    }
}

#[async_trait]
impl WeatherSource for FakeWeather {
    async fn fetch_weather(&self, city: &str) -> Result<Option<Value>, WeatherError> {
        self.calls.lock().unwrap().push(format!("weather:{city}"));
        Ok(self.current.get(city).cloned().flatten())
    }

    async fn fetch_forecast(&self, city: &str) -> Result<Option<Value>, WeatherError> {
        self.calls.lock().unwrap().push(format!("forecast:{city}"));
        Ok(self.forecast.get(city).cloned().flatten())
    }
}

#[derive(Clone)]
struct RecordingStore {
    uploads: Arc<Mutex<Vec<(String, Value)>>>,
    ensure_result: Result<BucketStatus, String>,
    fail_uploads: bool,
}

impl RecordingStore {
    fn new() -> Self {
        Self {
            uploads: Arc::default(),
            ensure_result: Ok(BucketStatus::Exists),
            fail_uploads: false,
        }
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    fn bucket_name(&self) -> &str {
        "mybucket-test0001"
    }

    async fn ensure_bucket(&self) -> Result<BucketStatus, StorageError> {
        self.ensure_result.clone().map_err(StorageError::Config)
    }

    async fn put_json(&self, key: &str, body: &Value) -> Result<(), StorageError> {
        if self.fail_uploads {
            return Err(StorageError::Status {
                code: 403,
                body: "AccessDenied".to_string(),
            });
        }
        self.uploads
            .lock()
            .unwrap()
            .push((key.to_string(), body.clone()));
        Ok(())
    }
}

#[derive(Default, Clone)]
struct RecordingRenderer {
    rendered: Arc<Mutex<Vec<(String, usize)>>>,
}

impl ChartRenderer for RecordingRenderer {
    fn render(&self, city: &str, series: &ForecastSeries) -> Result<PathBuf, RenderError> {
        self.rendered
            .lock()
            .unwrap()
            .push((city.to_string(), series.len()));
        Ok(PathBuf::from(format!("{city}_forecast.png")))
    }
}

fn berlin_current() -> Value {
    json!({
        "main": {"temp": 50, "feels_like": 48, "humidity": 80},
        "weather": [{"description": "cloudy"}]
    })
}

fn forecast(n: usize) -> Value {
    let list: Vec<Value> = (0..n)
        .map(|i| json!({"dt": 1_705_320_000 + (i as i64) * 10_800, "main": {"temp": 40.0 + i as f64}}))
        .collect();
    json!({ "list": list })
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_berlin_prints_summary_and_uploads_once() {
    let weather = FakeWeather::default()
        .with_current("Berlin", Some(berlin_current()))
        .with_forecast("Berlin", Some(forecast(3)));
    let store = RecordingStore::new();
    let uploads = store.uploads.clone();
    let renderer = RecordingRenderer::default();
    let rendered = renderer.rendered.clone();

    let dashboard = Dashboard::new(weather, store, renderer, Units::Imperial);
    let mut out = Vec::new();
    let reports = dashboard.run(&["Berlin"], &mut out).await.unwrap();

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Fetching weather for Berlin..."));
    assert!(printed.contains("Temperature: 50\u{00b0}F"));
    assert!(printed.contains("Feels like: 48\u{00b0}F"));
    assert!(printed.contains("Humidity: 80%"));
    assert!(printed.contains("Conditions: cloudy"));
    assert!(printed.contains("Successfully saved data for Berlin to S3"));
    assert!(printed.contains("Weather data for Berlin saved to S3!"));

    let uploads = uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].0, "Berlin_weather.json");
    assert_eq!(uploads[0].1, berlin_current());

    assert_eq!(*rendered.lock().unwrap(), vec![("Berlin".to_string(), 3)]);
    assert_eq!(reports.len(), 1);
    assert!(reports[0].saved);
    assert_eq!(reports[0].chart, Some(PathBuf::from("Berlin_forecast.png")));
}

#[tokio::test]
async fn test_failed_fetch_skips_upload_and_forecast() {
    let weather = FakeWeather::default()
        .with_current("X", None)
        .with_current("Berlin", Some(berlin_current()))
        .with_forecast("X", Some(forecast(2)))
        .with_forecast("Berlin", Some(forecast(2)));
    let calls = weather.calls.clone();
    let store = RecordingStore::new();
    let uploads = store.uploads.clone();
    let renderer = RecordingRenderer::default();
    let rendered = renderer.rendered.clone();

    let dashboard = Dashboard::new(weather, store, renderer, Units::Imperial);
    let mut out = Vec::new();
    let reports = dashboard.run(&["X", "Berlin"], &mut out).await.unwrap();

    assert_eq!(
        *calls.lock().unwrap(),
        vec!["weather:X", "weather:Berlin", "forecast:Berlin"]
    );
    let uploads = uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].0, "Berlin_weather.json");
    assert_eq!(rendered.lock().unwrap().len(), 1);

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Failed to fetch weather data for X"));
    assert!(reports[0].reading.is_none());
    assert!(!reports[0].saved);
    assert!(reports[1].reading.is_some());
}

#[tokio::test]
async fn test_empty_body_counts_as_failed_fetch() {
    let weather = FakeWeather::default()
        .with_current("X", Some(json!({})))
        .with_current("Berlin", Some(berlin_current()))
        .with_forecast("Berlin", Some(json!(null)));
    let calls = weather.calls.clone();
    let store = RecordingStore::new();
    let uploads = store.uploads.clone();
    let renderer = RecordingRenderer::default();
    let rendered = renderer.rendered.clone();

    let dashboard = Dashboard::new(weather, store, renderer, Units::Imperial);
    let mut out = Vec::new();
    let reports = dashboard.run(&["X", "Berlin"], &mut out).await.unwrap();

    assert_eq!(
        *calls.lock().unwrap(),
        vec!["weather:X", "weather:Berlin", "forecast:Berlin"]
    );
    assert!(String::from_utf8(out)
        .unwrap()
        .contains("Failed to fetch weather data for X"));
    assert!(reports[0].reading.is_none());
    assert!(reports[1].reading.is_some());
    assert!(reports[1].chart.is_none());
    assert_eq!(uploads.lock().unwrap().len(), 1);
    assert!(rendered.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_failure_is_not_fatal() {
    let weather = FakeWeather::default()
        .with_current("Berlin", Some(berlin_current()))
        .with_forecast("Berlin", Some(forecast(1)));
    let mut store = RecordingStore::new();
    store.fail_uploads = true;
    let renderer = RecordingRenderer::default();
    let rendered = renderer.rendered.clone();

    let dashboard = Dashboard::new(weather, store, renderer, Units::Imperial);
    let mut out = Vec::new();
    let reports = dashboard.run(&["Berlin"], &mut out).await.unwrap();

    assert!(!reports[0].saved);
    assert!(!String::from_utf8(out).unwrap().contains("saved to S3!"));
    assert_eq!(rendered.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_forecast_skips_chart() {
    let weather = FakeWeather::default()
        .with_current("Berlin", Some(berlin_current()))
        .with_forecast("Berlin", None);
    let renderer = RecordingRenderer::default();
    let rendered = renderer.rendered.clone();

    let dashboard = Dashboard::new(weather, RecordingStore::new(), renderer, Units::Imperial);
    let mut out = Vec::new();
    let reports = dashboard.run(&["Berlin"], &mut out).await.unwrap();

    assert!(reports[0].chart.is_none());
    assert!(rendered.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_forecast_stops_the_run() {
    let weather = FakeWeather::default()
        .with_current("Berlin", Some(berlin_current()))
        .with_forecast("Berlin", Some(json!({"list": [{"dt": 1}]})))
        .with_current("Seattle", Some(berlin_current()));
    let calls = weather.calls.clone();

    let dashboard = Dashboard::new(
        weather,
        RecordingStore::new(),
        RecordingRenderer::default(),
        Units::Imperial,
    );
    let mut out = Vec::new();
    let result = dashboard.run(&["Berlin", "Seattle"], &mut out).await;

    assert!(matches!(result, Err(DashboardError::Model(_))));
    assert!(!calls.lock().unwrap().iter().any(|c| c.ends_with("Seattle")));
}

#[tokio::test]
async fn test_provision_reports_created_bucket() {
    let mut store = RecordingStore::new();
    store.ensure_result = Ok(BucketStatus::Created);

    let dashboard = Dashboard::new(
        FakeWeather::default(),
        store,
        RecordingRenderer::default(),
        Units::Imperial,
    );
    let mut out = Vec::new();
    dashboard.provision(&mut out).await.unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Bucket mybucket-test0001 created\n"
    );
}

#[tokio::test]
async fn test_provision_failure_is_not_fatal() {
    let mut store = RecordingStore::new();
    store.ensure_result = Err("access denied".to_string());

    let dashboard = Dashboard::new(
        FakeWeather::default(),
        store,
        RecordingRenderer::default(),
        Units::Imperial,
    );
    let mut out = Vec::new();
    dashboard.provision(&mut out).await.unwrap();

    assert!(String::from_utf8(out)
        .unwrap()
        .starts_with("Error checking/creating bucket:"));
}
