//! Error types for location acquisition and geocoding

use thiserror::Error;

/// Result type alias for location operations
pub type Result<T> = std::result::Result<T, LocationError>;

/// Failures surfaced by [`LocationService`](crate::LocationService).
///
/// Only `acquire_user_location` and `geocode_address` return these.
/// `distance_to_shop` and `enrich` degrade to a missing distance instead.
#[derive(Error, Debug)]
pub enum LocationError {
    /// The user has not granted location permission
    #[error("Location permission denied")]
    PermissionDenied,

    /// The device could not produce a position fix
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    /// The address could not be resolved to a coordinate
    #[error("Could not geocode '{address}': {reason}")]
    GeocodeFailed {
        /// Address that was looked up
        address: String,
        /// Why the lookup failed
        reason: String,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LocationError {
    /// Create a geocode failure
    pub fn geocode_failed(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::GeocodeFailed {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> LocationErrorCode {
        match self {
            Self::PermissionDenied => LocationErrorCode::PermissionDenied,
            Self::LocationUnavailable(_) => LocationErrorCode::LocationUnavailable,
            Self::GeocodeFailed { .. } => LocationErrorCode::GeocodeFailed,
            Self::Config(_) => LocationErrorCode::Config,
        }
    }

    /// Whether asking the user again (retry dialog) can help
    pub fn is_user_recoverable(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::LocationUnavailable(_))
    }
}

/// Error codes for location errors.
/// Range: 11xxx, next to the geo crate's 10xxx.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationErrorCode {
    /// Permission denied
    PermissionDenied = 11001,
    /// No position fix
    LocationUnavailable = 11002,
    /// Geocoding failed
    GeocodeFailed = 11003,
    /// Configuration error
    Config = 11004,
}

/// Failures reported by positioning and geocoding providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned a non-success status
    #[error("Provider error ({status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Provider payload could not be interpreted
    #[error("Unexpected provider response: {0}")]
    Parse(String),

    /// Positioning could not get a fix
    #[error("No position fix: {0}")]
    NoFix(String),

    /// Reading provider data from disk failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Provider data was not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProviderError {
    /// Check if retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_timeout(),
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Parse(_) | Self::NoFix(_) | Self::Io(_) | Self::Json(_) => false,
        }
    }
}
