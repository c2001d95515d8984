use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

use crate::notifier::DEFAULT_VIEWER_BUFFER;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
    /// `None` disables the REST API
    pub api_token: Option<String>,
    pub store_timeout: Duration,
    pub viewer_buffer: usize,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `load` uses the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = lookup("API_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        if api_token.is_none() {
            warn!("API_TOKEN not set, REST API disabled");
        }

        let store_timeout_ms: u64 = try_load(&lookup, "STORE_TIMEOUT_MS", "5000")?;
        let viewer_buffer: usize =
            try_load(&lookup, "VIEWER_BUFFER", &DEFAULT_VIEWER_BUFFER.to_string())?;
        if viewer_buffer == 0 {
            return Err(ConfigError::Invalid {
                key: "VIEWER_BUFFER",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            port: try_load(&lookup, "PORT", "3000")?,
            db_path: try_load(&lookup, "DB_PATH", "./shopping.db")?,
            api_token,
            store_timeout: Duration::from_millis(store_timeout_ms),
            viewer_buffer,
        })
    }

    pub fn api_enabled(&self) -> bool {
        self.api_token.is_some()
    }
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}
