use thiserror::Error;

/// Error depicting a failed weather load, as reported to whoever triggered the run
///
#[derive(Debug, Error)]
#[error("weather load failed: {0}")]
pub struct LoadError(pub String);
