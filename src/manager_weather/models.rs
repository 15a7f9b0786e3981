use serde::Deserialize;
use serde_json::Number;

/// One entry of the weather condition list
#[derive(Deserialize, Debug)]
pub struct Condition {
    pub description: String,
}

/// Temperatures (Kelvin), pressure and humidity
#[derive(Deserialize, Debug)]
pub struct MainMetrics {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: Number,
    pub humidity: Number,
}

/// Wind measurements
#[derive(Deserialize, Debug)]
pub struct Wind {
    pub speed: Number,
}

/// The parts of an OpenWeatherMap current weather document that we care about
#[derive(Deserialize, Debug)]
pub struct CurrentWeather {
    pub name: String,
    pub weather: Vec<Condition>,
    pub main: MainMetrics,
    pub wind: Wind,
    pub dt: i64,
}
