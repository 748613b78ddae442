//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeoError {
    /// Coordinate outside the valid latitude/longitude ranges
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Text could not be parsed as a coordinate
    #[error("Coordinate parse error: {0}")]
    Parse(String),
}

/// Error code for integration with the location crate's error codes.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Invalid coordinate values
    InvalidCoordinate = 10001,
    /// Unparseable coordinate text
    Parse = 10002,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidCoordinate(_) => GeoErrorCode::InvalidCoordinate,
            GeoError::Parse(_) => GeoErrorCode::Parse,
        }
    }
}
