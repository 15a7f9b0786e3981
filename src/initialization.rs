use std::env;
use log::info;
use thiserror::Error;
use crate::config::{load_config, Config, LoadConfigurationError};
use crate::logging::{setup_logger, LoggerError};
use crate::manager_storage::{from_config, ObjectStore, StorageError};
use crate::manager_weather::{Weather, WeatherError};

pub struct Mgr {
    pub weather: Weather,
    pub store: Box<dyn ObjectStore>,
}

/// Initializes and returns configuration and a Mgr struct holding the weather client and object store
///
pub fn init() -> Result<(Config, Mgr), InitializationError> {
    let args: Vec<String> = env::args().collect();
    let config_path = config_path(&args)?;

    // Load configuration
    let config = load_config(config_path)?;

    // Setup logging
    let _ = setup_logger(&config.general.log_path, config.general.log_level, config.general.log_to_stdout)?;

    // Print version
    info!("starting weather loader version: {}", env!("CARGO_PKG_VERSION"));

    // Instantiate structs
    let weather = Weather::new(&config.weather)?;
    let store = from_config(&config.storage)?;

    let mgr = Mgr {
        weather,
        store,
    };

    Ok((config, mgr))
}

/// Picks the configuration file path out of the '--config=<path>' argument
///
/// # Arguments
///
/// * 'args' - command line arguments
fn config_path(args: &[String]) -> Result<&str, InitializationError> {
    args.iter()
        .find_map(|p| p.strip_prefix("--config="))
        .filter(|p| !p.is_empty())
        .ok_or(InitializationError::ArgumentError("usage: weather_loader --config=<path>".into()))
}

/// Error depicting errors that occur while initializing the weather loader
///
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("ArgumentError: {0}")]
    ArgumentError(String),
    #[error("ConfigurationError: {0}")]
    ConfigurationError(#[from] LoadConfigurationError),
    #[error("SetupLoggerError: {0}")]
    SetupLoggerError(#[from] LoggerError),
    #[error("WeatherSetupError: {0}")]
    WeatherSetupError(#[from] WeatherError),
    #[error("StorageSetupError: {0}")]
    StorageSetupError(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(a: &[&str]) -> Vec<String> {
        a.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn finds_config_argument() {
        let a = args(&["weather_loader", "--verbose", "--config=/etc/weather/loader.toml"]);

        assert_eq!(config_path(&a).unwrap(), "/etc/weather/loader.toml");
    }

    #[test]
    fn missing_or_empty_config_argument() {
        assert!(matches!(config_path(&args(&["weather_loader"])), Err(InitializationError::ArgumentError(_))));
        assert!(matches!(config_path(&args(&["weather_loader", "--config="])), Err(InitializationError::ArgumentError(_))));
    }
}
