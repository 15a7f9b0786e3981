use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// The weather document as returned by the weather API, untouched
///
#[derive(Clone, Debug, PartialEq)]
pub struct RawWeatherRecord(pub Value);

/// One normalized, unit converted weather observation
///
/// Field order here is the column order in the stored CSV.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NormalizedWeatherRow {
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Temp_F")]
    pub temp_f: f64,
    #[serde(rename = "Feels_Like_F")]
    pub feels_like_f: f64,
    #[serde(rename = "Min_Temp_F")]
    pub min_temp_f: f64,
    #[serde(rename = "Max_Temp_F")]
    pub max_temp_f: f64,
    #[serde(rename = "Pressure")]
    pub pressure: Number,
    #[serde(rename = "Humidity")]
    pub humidity: Number,
    #[serde(rename = "Wind_Speed")]
    pub wind_speed: Number,
    #[serde(rename = "Time")]
    pub time: DateTime<Utc>,
}
