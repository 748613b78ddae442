//! Location acquisition, geocoding and distance enrichment for Dealzsta
//!
//! The pieces, from the device up:
//!
//! - **Capabilities**: [`Positioning`] and [`Geocoder`] traits the platform implements
//! - **Service**: [`LocationService`] acquires the user position, geocodes shop
//!   addresses and computes cached per-shop distances
//! - **Enrichment**: [`enrich`] annotates a post list with distances, concurrently
//!   and with per-post failure isolation
//! - **Hook**: [`NearbyPosts`] wraps the above with loading/error state and
//!   stale-result discarding
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use dealzsta_geo::Coordinate;
//! use dealzsta_location::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let positioning = FixedPositioning::granted(Coordinate::new(52.5219, 13.4132));
//! let geocoder = TableGeocoder::new()
//!     .with("Pariser Platz 1, Berlin", Coordinate::new(52.5163, 13.3777));
//! let service = LocationService::new(Arc::new(positioning), Arc::new(geocoder));
//!
//! let user = service.acquire_user_location(false).await.ok();
//! let posts = vec![
//!     Post::new("p1", "Pariser Platz 1, Berlin"),
//!     Post::new("p2", "Somewhere unknown"),
//! ];
//!
//! let posts = enrich(&service, user.as_ref(), posts).await;
//! assert_eq!(posts[0].shopkm, "2.5km");
//! assert_eq!(posts[1].shopkm, "N/A");
//! # }
//! ```

#![warn(clippy::all)]

pub mod cache;
pub mod capability;
pub mod config;
pub mod enrich;
pub mod error;
pub mod hook;
pub mod providers;
pub mod retry;
pub mod service;
pub mod state;

#[cfg(test)]
mod testing;

pub use capability::{Geocoder, PermissionStatus, Positioning};
pub use enrich::{enrich, rank_by_distance, within_radius, Post};
pub use error::{LocationError, LocationErrorCode, ProviderError, Result};
pub use hook::{LoadError, NearbyPosts, RequestToken};
pub use service::{LocationService, UserLocation};
pub use state::SessionState;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::capability::{Geocoder, PermissionStatus, Positioning};
    pub use crate::config::{Config, ConfigSchema, GeocoderConfig};
    pub use crate::enrich::{enrich, rank_by_distance, within_radius, Post};
    pub use crate::error::{LocationError, ProviderError, Result};
    pub use crate::hook::NearbyPosts;
    pub use crate::providers::{build_geocoder, FixedPositioning, NominatimGeocoder, TableGeocoder};
    pub use crate::service::LocationService;
    pub use crate::state::SessionState;
}
