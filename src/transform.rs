use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use crate::manager_weather::models::CurrentWeather;
use crate::models::{NormalizedWeatherRow, RawWeatherRecord};

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Converts a temperature in Kelvin to Fahrenheit
///
/// # Arguments
///
/// * 'k' - temperature in Kelvin
pub fn kelvin_to_fahrenheit(k: f64) -> f64 {
    (k - 273.15) * 9.0 / 5.0 + 32.0
}

/// Returns the object key for a CSV written at the given instant
///
/// # Arguments
///
/// * 'now' - wall clock time of the transform step
pub fn storage_key(now: DateTime<Utc>) -> String {
    format!("weather/weather_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

impl NormalizedWeatherRow {
    /// Builds a normalized row from a raw weather document.
    /// Every referenced field must be present, there is no default substitution.
    ///
    /// # Arguments
    ///
    /// * 'raw' - the document as fetched from the weather API
    pub fn from_raw(raw: &RawWeatherRecord) -> Result<NormalizedWeatherRow, TransformError> {
        let current = CurrentWeather::deserialize(&raw.0)
            .map_err(|e| TransformError::MalformedData(e.to_string()))?;

        let description = current.weather
            .into_iter()
            .next()
            .ok_or(TransformError::MalformedData("weather condition list is empty".into()))?
            .description;

        let time = DateTime::from_timestamp(current.dt, 0)
            .ok_or(TransformError::Timestamp(current.dt))?;

        Ok(NormalizedWeatherRow {
            city: current.name,
            description,
            temp_f: kelvin_to_fahrenheit(current.main.temp),
            feels_like_f: kelvin_to_fahrenheit(current.main.feels_like),
            min_temp_f: kelvin_to_fahrenheit(current.main.temp_min),
            max_temp_f: kelvin_to_fahrenheit(current.main.temp_max),
            pressure: current.main.pressure,
            humidity: current.main.humidity,
            wind_speed: current.wind.speed,
            time,
        })
    }

    /// Serializes the row as CSV with a header line
    ///
    pub fn to_csv(&self) -> Result<String, TransformError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(self)
            .map_err(|e| TransformError::SerializeError(e.to_string()))?;

        let bytes = writer.into_inner()
            .map_err(|e| TransformError::SerializeError(e.to_string()))?;

        String::from_utf8(bytes)
            .map_err(|e| TransformError::SerializeError(e.to_string()))
    }
}

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("MalformedData: {0}")]
    MalformedData(String),
    #[error("TimestampError: epoch {0} out of range")]
    Timestamp(i64),
    #[error("SerializeError: {0}")]
    SerializeError(String),
}
