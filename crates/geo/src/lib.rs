//! Geodesic math for Dealzsta.
//!
//! This crate provides:
//! - Haversine distance calculations
//! - Distance formatting for display ("450m", "3.3km", "13km")
//! - Batch distance calculation and ranking with optional parallelism
//!
//! # Example
//!
//! ```
//! use dealzsta_geo::{format_distance, haversine_distance, Coordinate};
//!
//! let berlin = Coordinate::new(52.5200, 13.4050);
//! let paris = Coordinate::new(48.8566, 2.3522);
//!
//! let distance_km = haversine_distance(&berlin, &paris);
//! assert!((distance_km - 878.0).abs() < 10.0);
//! assert_eq!(format_distance(Some(distance_km)), "877km");
//! ```

mod error;
mod format;
mod haversine;
pub mod batch;

use std::fmt;
use std::str::FromStr;

pub use batch::{
    calculate_distances, calculate_distances_sorted, calculate_distances_within_radius,
    compare_distances, DistanceResult, LocatedItem,
};
pub use error::{GeoError, GeoErrorCode, Result};
pub use format::{format_distance, NOT_AVAILABLE};
pub use haversine::{
    approximate_distance, haversine_distance, haversine_distance_meters, EARTH_RADIUS_KM,
    EARTH_RADIUS_M,
};

/// A geographic coordinate with latitude and longitude.
///
/// `new` does not range-check; distances between out-of-range coordinates are
/// mathematically defined but have no geographic meaning. Use [`Coordinate::try_new`]
/// or [`Coordinate::is_valid`] at trust boundaries.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate without validation.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a coordinate, rejecting values outside the valid ranges.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let coord = Self::new(latitude, longitude);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(GeoError::InvalidCoordinate(format!(
                "({latitude}, {longitude}) is outside [-90, 90] x [-180, 180]"
            )))
        }
    }

    /// Returns true if the coordinate has valid values.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Parses `"lat,lng"` (whitespace around either part is ignored).
impl FromStr for Coordinate {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| GeoError::Parse(format!("expected 'lat,lng', got '{s}'")))?;

        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| GeoError::Parse(format!("invalid latitude '{}'", lat.trim())))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| GeoError::Parse(format!("invalid longitude '{}'", lng.trim())))?;

        Self::try_new(lat, lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_creation() {
        let coord = Coordinate::new(52.5200, 13.4050);
        assert_eq!(coord.latitude, 52.5200);
        assert_eq!(coord.longitude, 13.4050);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(Coordinate::new(-90.0, -180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_try_new_rejects_out_of_range() {
        assert!(Coordinate::try_new(45.0, 90.0).is_ok());
        let err = Coordinate::try_new(-95.0, 0.0).unwrap_err();
        assert_eq!(err.code(), GeoErrorCode::InvalidCoordinate);
    }

    #[test]
    fn test_coordinate_from_tuple() {
        let coord: Coordinate = (52.5200, 13.4050).into();
        assert_eq!(coord.latitude, 52.5200);
    }

    #[test]
    fn test_parse_lat_lng() {
        let coord: Coordinate = " 48.8566 , 2.3522".parse().unwrap();
        assert_eq!(coord, Coordinate::new(48.8566, 2.3522));

        assert!("48.8566".parse::<Coordinate>().is_err());
        assert!("north,2.0".parse::<Coordinate>().is_err());
        assert!("120.0,2.0".parse::<Coordinate>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let coord = Coordinate::new(-33.8688, 151.2093);
        let parsed: Coordinate = coord.to_string().parse().unwrap();
        assert_eq!(parsed, coord);
    }
}
