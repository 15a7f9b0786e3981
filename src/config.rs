use std::fs;
use std::time::Duration;
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

#[derive(Deserialize)]
pub struct WeatherApi {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_city")]
    pub city: String,
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_log_response")]
    pub log_response: bool,
}

/// Polling behaviour of the readiness check
#[derive(Deserialize, Clone, Debug)]
pub struct Readiness {
    #[serde(default = "default_poke_interval_secs")]
    pub poke_interval_secs: u64,
    #[serde(default = "default_readiness_timeout_secs")]
    pub timeout_secs: u64,
}

/// Retry policy applied to every step of a run
#[derive(Deserialize, Clone, Debug)]
pub struct RetryPolicy {
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
}

impl RetryPolicy {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

#[derive(Deserialize)]
pub struct S3Parameters {
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

#[derive(Deserialize)]
pub struct LocalParameters {
    pub root: String,
}

#[derive(Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum Storage {
    S3(S3Parameters),
    Local(LocalParameters),
}

#[derive(Deserialize)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
}

#[derive(Deserialize)]
pub struct Config {
    pub general: General,
    pub weather: WeatherApi,
    #[serde(default)]
    pub readiness: Readiness,
    #[serde(default)]
    pub retry: RetryPolicy,
    pub storage: Storage,
}

impl Default for Readiness {
    fn default() -> Self {
        Readiness {
            poke_interval_secs: default_poke_interval_secs(),
            timeout_secs: default_readiness_timeout_secs(),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            retries: default_retries(),
            delay_secs: default_delay_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_endpoint() -> String {
    "/data/2.5/weather".to_string()
}

fn default_city() -> String {
    "Portland".to_string()
}

fn default_bucket() -> String {
    "weather-api-airflow-mhk".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

const fn default_timeout_secs() -> u64 { 30 }
const fn default_log_response() -> bool { true }
const fn default_poke_interval_secs() -> u64 { 60 }
const fn default_readiness_timeout_secs() -> u64 { 600 }
const fn default_retries() -> u32 { 2 }
const fn default_delay_secs() -> u64 { 120 }

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, LoadConfigurationError> {
    let toml = fs::read_to_string(config_path)?;
    parse_config(&toml)
}

/// Parses configuration from a TOML document
///
/// # Arguments
///
/// * 'toml' - the configuration document
fn parse_config(toml: &str) -> Result<Config, LoadConfigurationError> {
    let config: Config = toml::from_str(toml)?;

    Ok(config)
}

/// Error depicting errors that occur while loading the configuration
///
#[derive(Debug, Error)]
pub enum LoadConfigurationError {
    #[error("FileError: {0}")]
    FileError(#[from] std::io::Error),
    #[error("ParseError: {0}")]
    ParseError(#[from] toml::de::Error),
}
