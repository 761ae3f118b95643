//! Configuration utilities - loading, reloading, and access helpers
//!
//! - Loading configuration from disk (defaults when the file is missing)
//! - Thread-safe access through `with_config`

use super::schemas::Config;
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::RwLock;

use crate::errors::{ConfigurationError, CurvepadError};
use crate::logger::{self, LogTag};

/// Global configuration instance
///
/// Single source of truth for all configuration values.
/// Access it using the helper functions below.
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

/// Default configuration file path
pub const CONFIG_FILE_PATH: &str = "data/config.toml";

/// Load configuration from the default path and initialize the global CONFIG
pub fn load_config() -> Result<(), CurvepadError> {
    load_config_from_path(CONFIG_FILE_PATH)
}

/// Load configuration from a specific file path
///
/// A missing file is not an error: defaults are used and a warning is logged.
/// Loading twice is an error, use `reload_config_from_path` instead.
pub fn load_config_from_path(path: &str) -> Result<(), CurvepadError> {
    let config = read_config_file(path)?;

    CONFIG.set(RwLock::new(config)).map_err(|_| {
        CurvepadError::Configuration(ConfigurationError::Generic {
            message: "Config already initialized".to_string(),
        })
    })?;

    Ok(())
}

/// Reload configuration from a specific file path
///
/// The configuration is atomically replaced, so reads are always consistent.
pub fn reload_config_from_path(path: &str) -> Result<(), CurvepadError> {
    let new_config = read_config_file(path)?;

    match CONFIG.get() {
        Some(config_lock) => {
            let mut config = config_lock.write().map_err(|e| {
                CurvepadError::Configuration(ConfigurationError::Generic {
                    message: format!("Failed to acquire config write lock: {}", e),
                })
            })?;
            *config = new_config;
            Ok(())
        }
        None => Err(CurvepadError::Configuration(ConfigurationError::Generic {
            message: "Config not initialized. Call load_config() first.".to_string(),
        })),
    }
}

/// Parse and validate a config file without touching the global instance
pub fn read_config_file(path: &str) -> Result<Config, CurvepadError> {
    let config = if Path::new(path).exists() {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CurvepadError::Configuration(ConfigurationError::FileUnreadable {
                path: path.to_string(),
                error: e.to_string(),
            })
        })?;

        toml::from_str::<Config>(&contents).map_err(|e| {
            CurvepadError::Configuration(ConfigurationError::ParseFailed {
                path: path.to_string(),
                error: e.to_string(),
            })
        })?
    } else {
        logger::warning(
            LogTag::Config,
            &format!("Config file '{}' not found, using default values", path),
        );
        Config::default()
    };

    config.validate()?;
    Ok(config)
}

/// Execute a function with read access to the configuration
///
/// Falls back to defaults when the global config was never loaded (library use, tests).
///
/// # Example
/// ```
/// use curvepad::config::with_config;
///
/// let chunk = with_config(|cfg| cfg.scan.chunk_size);
/// assert!(chunk > 0);
/// ```
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&Config) -> R,
{
    match CONFIG.get() {
        Some(lock) => match lock.read() {
            Ok(config) => f(&*config),
            Err(poisoned) => f(&*poisoned.into_inner()),
        },
        None => f(&Config::default()),
    }
}

/// Snapshot of the whole configuration
pub fn get_config_clone() -> Config {
    with_config(|cfg| cfg.clone())
}
