//! Configuration schema definitions

use crate::error::{LocationError, Result};
use crate::retry::RetryConfig;
use dealzsta_geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Public Nominatim instance
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// Root configuration schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    #[serde(default)]
    pub position: PositionConfig,

    #[serde(default)]
    pub telemetry: LoggingConfig,
}

impl ConfigSchema {
    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.geocoder.validate()?;
        self.position.coordinate()?;
        Ok(())
    }
}

/// Which geocoder backs address lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GeocoderProvider {
    /// HTTP, Nominatim-compatible
    #[default]
    Nominatim,
    /// JSON address table on disk
    Table,
}

/// Geocoder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default)]
    pub provider: GeocoderProvider,

    /// Base URL of the search API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent sent with every request (Nominatim requires one)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Results requested per lookup; only the first is used for distances
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Address table for the `table` provider
    #[serde(default)]
    pub table_path: Option<PathBuf>,

    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            provider: GeocoderProvider::default(),
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_results: default_max_results(),
            table_path: None,
            retry: RetryConfig::default(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_GEOCODER_URL.to_string()
}

fn default_user_agent() -> String {
    format!("dealzsta-location/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_results() -> u32 {
    5
}

impl GeocoderConfig {
    /// Builder-style method to set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.provider == GeocoderProvider::Nominatim {
            if self.base_url.is_empty() {
                return Err(LocationError::config("geocoder.base_url cannot be empty"));
            }
            if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
                return Err(LocationError::config(
                    "geocoder.base_url must start with http:// or https://",
                ));
            }
        }

        if self.timeout_secs == 0 {
            return Err(LocationError::config("geocoder.timeout_secs cannot be zero"));
        }

        if self.max_results == 0 {
            return Err(LocationError::config("geocoder.max_results cannot be zero"));
        }

        Ok(())
    }
}

/// Fallback user position, for hosts without a positioning device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PositionConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl PositionConfig {
    /// The configured position, if both parts are present and in range
    pub fn coordinate(&self) -> Result<Option<Coordinate>> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Coordinate::try_new(lat, lng)
                .map(Some)
                .map_err(|e| LocationError::config(format!("position: {e}"))),
            (None, None) => Ok(None),
            _ => Err(LocationError::config(
                "position needs both latitude and longitude",
            )),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON lines instead of the compact format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
