//! Connector configuration, built in code or read from the environment.

use crate::remote::client::DEFAULT_TIMEOUT;
use crate::remote::endpoint::{Endpoints, DEFAULT_GLOBAL_BASE_URL, DEFAULT_NATIONAL_BASE_URL};
use crate::utils::default_cache_dir;
use bon::Builder;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONNECTOR_NAME: &str = "noaa-climate";
pub const DEFAULT_RUN_ID: &str = "local-run";
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Configuration value '{0}' must not be empty")]
    MissingValue(&'static str),

    #[error("Unsupported storage backend '{0}', only 'local' is available")]
    UnsupportedBackend(String),

    #[error("'{field}' must be an http(s) URL, got '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("Request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("Environment variable {var} has invalid value '{value}'")]
    InvalidEnvValue { var: &'static str, value: String },
}

/// Where run state and output tables are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    /// Files under the configured data directory.
    #[default]
    Local,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(StorageBackend::Local),
            _ => Err(ConfigError::UnsupportedBackend(s.to_string())),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Local => f.write_str("local"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct ConnectorConfig {
    #[builder(into, default = DEFAULT_CONNECTOR_NAME.to_string())]
    pub connector_name: String,
    #[builder(into, default = DEFAULT_RUN_ID.to_string())]
    pub run_id: String,
    #[builder(into, default = DEFAULT_GLOBAL_BASE_URL.to_string())]
    pub global_base_url: String,
    #[builder(into, default = DEFAULT_NATIONAL_BASE_URL.to_string())]
    pub national_base_url: String,
    #[builder(default = DEFAULT_TIMEOUT)]
    pub request_timeout: Duration,
    #[builder(default)]
    pub enable_http_cache: bool,
    /// Overrides the default cache location.
    #[builder(into)]
    pub http_cache_dir: Option<PathBuf>,
    #[builder(default)]
    pub storage_backend: StorageBackend,
    #[builder(into, default = PathBuf::from(DEFAULT_DATA_DIR))]
    pub data_dir: PathBuf,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ConnectorConfig {
    /// Reads the process environment; unset variables fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`ConnectorConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let request_timeout = match lookup("HTTP_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidEnvValue {
                    var: "HTTP_TIMEOUT_SECS",
                    value,
                })?,
            None => DEFAULT_TIMEOUT,
        };
        let enable_http_cache = match lookup("ENABLE_HTTP_CACHE") {
            Some(value) => parse_flag(&value).ok_or(ConfigError::InvalidEnvValue {
                var: "ENABLE_HTTP_CACHE",
                value,
            })?,
            None => false,
        };
        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::default(),
        };

        Ok(Self {
            connector_name: lookup("CONNECTOR_NAME")
                .unwrap_or_else(|| DEFAULT_CONNECTOR_NAME.to_string()),
            run_id: lookup("RUN_ID").unwrap_or_else(|| DEFAULT_RUN_ID.to_string()),
            global_base_url: lookup("NOAA_GLOBAL_URL")
                .unwrap_or_else(|| DEFAULT_GLOBAL_BASE_URL.to_string()),
            national_base_url: lookup("NOAA_NATIONAL_URL")
                .unwrap_or_else(|| DEFAULT_NATIONAL_BASE_URL.to_string()),
            request_timeout,
            enable_http_cache,
            http_cache_dir: lookup("HTTP_CACHE_DIR").map(PathBuf::from),
            storage_backend,
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connector_name.trim().is_empty() {
            return Err(ConfigError::MissingValue("connector_name"));
        }
        if self.run_id.trim().is_empty() {
            return Err(ConfigError::MissingValue("run_id"));
        }
        for (field, value) in [
            ("global_base_url", &self.global_base_url),
            ("national_base_url", &self.national_base_url),
        ] {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl {
                    field,
                    value: value.clone(),
                });
            }
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.global_base_url, &self.national_base_url)
    }

    /// Cache directory to use, or `None` when caching is off.
    pub fn http_cache_dir(&self) -> Option<PathBuf> {
        if !self.enable_http_cache {
            return None;
        }
        self.http_cache_dir.clone().or_else(default_cache_dir)
    }

    pub fn state_dir(&self) -> PathBuf {
        self.data_dir.join("state")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
