use anyhow::Result;
use log::{error, info};
use crate::errors::LoadError;
use crate::initialization::init;
use crate::worker::run;

mod errors;
mod config;
mod initialization;
mod logging;
mod macros;
mod manager_storage;
mod manager_weather;
mod transform;
pub mod models;
mod worker;

fn main() -> Result<()> {
    // Load config and set up all managers. If initialization fails, we are pretty much out of luck
    // and can't even log.
    let (config, mgr) = match init() {
        Ok((c, m)) => (c, m),
        Err(e) => {
            return Err(LoadError(format!("Initialization failed: {}", e)).into());
        }
    };

    // Readiness check, fetch, transform and store
    match run(&mgr, &config.readiness, &config.retry, None) {
        Ok(key) => {
            info!("Successfully stored weather as {}", key);
        },
        Err(e) => {
            error!("Run failed: {}", e);
            return Err(LoadError(e.to_string()).into());
        }
    }

    Ok(())
}
