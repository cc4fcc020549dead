use crate::config::Units;
use crate::models::WeatherReading;

/// Formats current conditions as the dashboard's summary lines
pub fn format_reading(reading: &WeatherReading, units: Units) -> String {
    let suffix = units.temperature_suffix();
    format!(
        "Temperature: {}{suffix}\nFeels like: {}{suffix}\nHumidity: {}%\nConditions: {}\n",
        reading.temperature, reading.feels_like, reading.humidity, reading.description
    )
}
