use std::path::{Path, PathBuf};

use chrono::DateTime;
use plotters::prelude::*;
use tracing::{debug, warn};

use crate::config::Units;
use crate::constants::CHART_SIZE;
use crate::error::RenderError;
use crate::models::ForecastSeries;

/// Turns a forecast series into a chart on disk
pub trait ChartRenderer: Send + Sync {
    /// Draws `series` for `city` and returns the written file
    fn render(&self, city: &str, series: &ForecastSeries) -> Result<PathBuf, RenderError>;
}

/// Time labels are formatted in UTC
const X_AXIS_LABEL: &str = "Date (UTC)";

fn y_axis_label(units: Units) -> String {
    format!("Temperature ({})", units.temperature_suffix())
}

/// File a city's forecast chart is written to
pub fn chart_path(output_dir: &Path, city: &str) -> PathBuf {
    output_dir.join(format!("{city}_forecast.png"))
}

/// PNG line chart renderer
#[derive(Debug, Clone)]
pub struct PngChartRenderer {
    output_dir: PathBuf,
    units: Units,
    show: bool,
}

impl PngChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, units: Units, show: bool) -> Self {
        Self {
            output_dir: output_dir.into(),
            units,
            show,
        }
    }

    fn draw(&self, path: &Path, city: &str, series: &ForecastSeries) -> Result<(), String> {
        let (x_range, y_range) = axis_ranges(series);

        let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("5-Day Weather Forecast for {city}"), ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)
            .map_err(|e| e.to_string())?;

        let format_time = |ts: &i64| {
            DateTime::from_timestamp(*ts, 0)
                .map(|t| t.format("%m-%d %H:%M").to_string())
                .unwrap_or_default()
        };

        chart
            .configure_mesh()
            .x_desc(X_AXIS_LABEL)
            .y_desc(y_axis_label(self.units))
            .x_labels(8)
            .x_label_formatter(&format_time)
            .draw()
            .map_err(|e| e.to_string())?;

        let points: Vec<(i64, f64)> = series
            .points
            .iter()
            .map(|p| (p.time.timestamp(), p.temperature))
            .collect();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
            .map_err(|e| e.to_string())?;
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&point| Circle::new(point, 4, BLUE.filled())),
            )
            .map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())
    }
}

impl ChartRenderer for PngChartRenderer {
    fn render(&self, city: &str, series: &ForecastSeries) -> Result<PathBuf, RenderError> {
        let path = chart_path(&self.output_dir, city);

        self.draw(&path, city, series)
            .map_err(|message| RenderError::Draw {
                path: path.clone(),
                message,
            })?;
        debug!(city = %city, path = %path.display(), points = series.len(), "Rendered forecast chart");

        if self.show {
            if let Err(e) = open::that(&path) {
                warn!(path = %path.display(), error = %e, "Failed to open chart viewer");
            }
        }

        Ok(path)
    }
}

/// Axis ranges for `series`, padded so flat or empty series still draw
fn axis_ranges(series: &ForecastSeries) -> (std::ops::Range<i64>, std::ops::Range<f64>) {
    let (start, end) = match series.time_bounds() {
        Some((start, end)) if start < end => (start, end),
        Some((start, _)) => (start - 3600, start + 3600),
        None => (0, 1),
    };

    let (lo, hi) = match series.temperature_bounds() {
        Some((lo, hi)) => {
            let pad = ((hi - lo) * 0.1).max(1.0);
            (lo - pad, hi + pad)
        }
        None => (0.0, 1.0),
    };

    (start..end, lo..hi)
}
