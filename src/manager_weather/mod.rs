pub mod models;

use std::thread;
use std::time::{Duration, Instant};
use log::{debug, info};
use reqwest::blocking::{Client, Response};
use thiserror::Error;
use crate::config::{Readiness, WeatherApi};
use crate::models::RawWeatherRecord;

/// Struct for probing and fetching current weather from the weather API
pub struct Weather {
    client: Client,
    url: String,
    city: String,
    api_key: String,
    log_response: bool,
}

impl Weather {
    /// Returns a Weather struct ready for probing and fetching current weather
    ///
    /// # Arguments
    ///
    /// * 'config' - weather API configuration
    pub fn new(config: &WeatherApi) -> Result<Weather, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Weather {
            client,
            url: format!("{}{}", config.base_url.trim_end_matches('/'), config.endpoint),
            city: config.city.clone(),
            api_key: config.api_key.clone(),
            log_response: config.log_response,
        })
    }

    /// Blocks until the weather API answers with a success status.
    /// The API is poked every poke interval until the readiness timeout has elapsed,
    /// at least one poke is always made.
    ///
    /// # Arguments
    ///
    /// * 'readiness' - poke interval and timeout
    pub fn wait_until_ready(&self, readiness: &Readiness) -> Result<(), WeatherError> {
        let started = Instant::now();
        let timeout = Duration::from_secs(readiness.timeout_secs);
        let mut pokes: u32 = 0;

        loop {
            pokes += 1;
            let reason = match self.request() {
                Ok(response) if response.status().is_success() => {
                    info!("weather API for {} is ready after {} poke(s)", self.city, pokes);
                    return Ok(());
                }
                Ok(response) => format!("status {}", response.status().as_u16()),
                Err(e) => e.to_string(),
            };
            debug!("weather API not ready ({}), poke {}", reason, pokes);

            if started.elapsed() >= timeout {
                return Err(WeatherError::NotReady(format!("{} after {} poke(s)", reason, pokes)));
            }
            thread::sleep(Duration::from_secs(readiness.poke_interval_secs));
        }
    }

    /// Retrieves the current weather for the configured city
    ///
    pub fn fetch(&self) -> Result<RawWeatherRecord, WeatherError> {
        let response = self.request()?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::StatusError(status.as_u16()));
        }

        let json = response.text()?;
        if self.log_response {
            info!("weather API response: {}", json);
        }

        let value = serde_json::from_str(&json)
            .map_err(|e| WeatherError::DocumentError(e.to_string()))?;

        Ok(RawWeatherRecord(value))
    }

    /// Issues the current weather GET request. The api key only travels in the query.
    ///
    fn request(&self) -> Result<Response, WeatherError> {
        let response = self.client
            .get(&self.url)
            .query(&[("q", self.city.as_str()), ("appid", self.api_key.as_str())])
            .send()?;

        Ok(response)
    }
}

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("NotReady: {0}")]
    NotReady(String),
    #[error("StatusError: unexpected status {0}")]
    StatusError(u16),
    #[error("DocumentError: {0}")]
    DocumentError(String),
    #[error("NetworkError: {0}")]
    NetworkError(#[source] reqwest::Error),
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full url, which includes the api key
        WeatherError::NetworkError(e.without_url())
    }
}
