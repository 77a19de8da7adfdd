//! Runtime configuration for stores and the command line.
//!
//! Values are read from the process environment, after loading a `.env`
//! file from the working directory when one exists:
//!
//! - `WIZ_STORE_DIR`: directory holding the `<name>.db` files (default `.`)
//! - `WIZ_STORE_LOG`: log level filter (default `info`)

use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
};

use log::LevelFilter;
use thiserror::Error;

pub const DATA_DIR_VAR: &str = "WIZ_STORE_DIR";
pub const LOG_LEVEL_VAR: &str = "WIZ_STORE_LOG";

const DATABASE_EXTENSION: &str = "db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config: {var} has unknown log level '{value}'")]
    LogLevel { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub log_level: LevelFilter,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            data_dir: PathBuf::from("."),
            log_level: LevelFilter::Info,
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Result<StoreConfig, ConfigError> {
        //! Build a configuration from `.env` and the environment, falling
        //! back to defaults for unset variables.

        let _ = dotenvy::dotenv();
        Self::from_lookup(|var| env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<StoreConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = StoreConfig::default();

        if let Some(dir) = lookup(DATA_DIR_VAR).filter(|dir| !dir.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(level) = lookup(LOG_LEVEL_VAR) {
            config.log_level =
                LevelFilter::from_str(level.trim()).map_err(|_| ConfigError::LogLevel {
                    var: LOG_LEVEL_VAR,
                    value: level,
                })?;
        }

        Ok(config)
    }

    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> StoreConfig {
        self.data_dir = data_dir.as_ref().to_path_buf();
        self
    }

    pub fn with_log_level(mut self, log_level: LevelFilter) -> StoreConfig {
        self.log_level = log_level;
        self
    }

    pub fn resolve(&self, name: &str) -> PathBuf {
        //! Path of the database file backing the store called `name`.

        self.data_dir.join(name).with_extension(DATABASE_EXTENSION)
    }
}
