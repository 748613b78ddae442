//! Location service: bridges device positioning and geocoding to distance math
//!
//! `acquire_user_location` and `geocode_address` report failures to the caller.
//! `distance_to_shop` never does: a missing distance is an expected state and
//! degrades to `None`.

use crate::cache::DistanceCache;
use crate::capability::{Geocoder, Positioning};
use crate::error::{LocationError, Result};
use crate::state::SessionState;
use chrono::{DateTime, Utc};
use dealzsta_geo::{haversine_distance, Coordinate};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// The user's last acquired position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub coordinate: Coordinate,
    pub acquired_at: DateTime<Utc>,
    pub permission_granted: bool,
}

/// Session-scoped location state plus the per-shop distance cache.
///
/// Every instance owns its own state, so tests and independent sessions never
/// share cached distances. Share one instance across tasks with `Arc`.
///
/// Acquisitions are serialized: overlapping calls to
/// [`LocationService::acquire_user_location`] run one after the other, so the
/// session state only ever follows the transitions [`SessionState`] allows.
pub struct LocationService {
    positioning: Arc<dyn Positioning>,
    geocoder: Arc<dyn Geocoder>,
    acquisition: Mutex<()>,
    state: RwLock<SessionState>,
    user_location: RwLock<Option<UserLocation>>,
    cache: DistanceCache,
}

impl LocationService {
    /// Create a service over the given capabilities
    pub fn new(positioning: Arc<dyn Positioning>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            positioning,
            geocoder,
            acquisition: Mutex::new(()),
            state: RwLock::new(SessionState::Unrequested),
            user_location: RwLock::new(None),
            cache: DistanceCache::new(),
        }
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Last acquired user location, if any
    pub fn user_location(&self) -> Option<UserLocation> {
        *self.user_location.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Ask the device for a fresh position.
    ///
    /// Without permission this fails with [`LocationError::PermissionDenied`],
    /// prompting first when `force_permission_prompt` is set. A failed or
    /// out-of-range fix yields [`LocationError::LocationUnavailable`]. Any
    /// attempt that gets past the permission check invalidates the distance
    /// cache; a failure also discards the stored location.
    #[instrument(skip(self))]
    pub async fn acquire_user_location(&self, force_permission_prompt: bool) -> Result<Coordinate> {
        let _guard = self.acquisition.lock().await;
        let previous = self.state();
        let status = self.positioning.permission_status().await;

        if status.is_granted()
            && matches!(previous, SessionState::Available | SessionState::Unavailable)
        {
            self.transition(SessionState::Refreshing);
        } else {
            self.transition(SessionState::Requesting);

            let status = if !status.is_granted() && force_permission_prompt {
                debug!("Prompting for location permission");
                self.positioning.request_permission().await
            } else {
                status
            };

            if !status.is_granted() {
                self.transition(SessionState::Denied);
                self.discard_location();
                info!("Location permission denied");
                return Err(LocationError::PermissionDenied);
            }

            self.transition(SessionState::Granted);
            self.transition(SessionState::Acquiring);
        }

        self.cache.clear();

        let failure = match self.positioning.current_position().await {
            Ok(coordinate) if coordinate.is_valid() => {
                self.store_location(coordinate);
                self.transition(SessionState::Available);
                info!(
                    latitude = coordinate.latitude,
                    longitude = coordinate.longitude,
                    "User location acquired"
                );
                return Ok(coordinate);
            }
            Ok(coordinate) => format!("position {coordinate} is out of range"),
            Err(e) => e.to_string(),
        };

        self.discard_location();
        self.transition(SessionState::Unavailable);
        warn!(reason = %failure, "User location unavailable");
        Err(LocationError::LocationUnavailable(failure))
    }

    /// Re-acquire the position without prompting for permission.
    pub async fn refresh_user_location(&self) -> Result<Coordinate> {
        self.acquire_user_location(false).await
    }

    /// Record that the user revoked location permission.
    pub fn revoke_permission(&self) {
        self.transition(SessionState::Requesting);
        self.transition(SessionState::Denied);
        self.discard_location();
        info!("Location permission revoked");
    }

    /// Resolve `address` to the first coordinate the geocoder returns.
    ///
    /// Fails with [`LocationError::GeocodeFailed`] for blank addresses,
    /// geocoder errors, and empty result lists.
    #[instrument(skip(self))]
    pub async fn geocode_address(&self, address: &str) -> Result<Coordinate> {
        let address = address.trim();
        if address.is_empty() {
            return Err(LocationError::geocode_failed(address, "address is empty"));
        }

        let results = self
            .geocoder
            .geocode(address)
            .await
            .map_err(|e| LocationError::geocode_failed(address, e.to_string()))?;

        if results.len() > 1 {
            debug!(candidates = results.len(), "Several geocode results, using the first");
        }

        results
            .into_iter()
            .next()
            .ok_or_else(|| LocationError::geocode_failed(address, "no results"))
    }

    /// Distance in km from `user_location` to the shop at `shop_address`.
    ///
    /// Returns `None` without geocoding when `user_location` is `None`, and
    /// `None` when geocoding fails. With a `shop_id`, resolved distances are
    /// cached until the user location is refreshed; the cache is keyed by shop
    /// only, so callers must pass the service's current location. A lookup
    /// that overlaps a refresh still returns its distance but does not cache it.
    pub async fn distance_to_shop(
        &self,
        user_location: Option<&Coordinate>,
        shop_address: &str,
        shop_id: Option<&str>,
    ) -> Option<f64> {
        let user = user_location?;
        let epoch = self.cache.epoch();

        if let Some(id) = shop_id {
            if let Some(distance) = self.cache.get(id) {
                debug!(shop_id = id, distance_km = distance, "Distance cache hit");
                return Some(distance);
            }
        }

        match self.geocode_address(shop_address).await {
            Ok(shop) => {
                let distance = haversine_distance(user, &shop);
                if let Some(id) = shop_id {
                    if !self.cache.insert_if_epoch(id, distance, epoch) {
                        debug!(shop_id = id, "User location changed during lookup, not caching");
                    }
                }
                Some(distance)
            }
            Err(e) => {
                warn!(shop_id = ?shop_id, error = %e, "Distance unavailable");
                None
            }
        }
    }

    /// Cached distance for `shop_id`, without geocoding
    pub fn cached_distance(&self, shop_id: &str) -> Option<f64> {
        self.cache.get(shop_id)
    }

    /// Number of shops with a cached distance
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop all cached distances
    pub fn invalidate_cache(&self) {
        self.cache.clear();
    }

    fn store_location(&self, coordinate: Coordinate) {
        self.cache.clear();
        *self.user_location.write().unwrap_or_else(PoisonError::into_inner) = Some(UserLocation {
            coordinate,
            acquired_at: Utc::now(),
            permission_granted: true,
        });
    }

    fn discard_location(&self) {
        *self.user_location.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.cache.clear();
    }

    fn transition(&self, next: SessionState) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        // Only reachable when revoke_permission races an acquisition.
        if !state.can_transition_to(next) {
            warn!(from = %*state, to = %next, "Unexpected location state transition");
        }
        debug!(from = %*state, to = %next, "Location state transition");
        *state = next;
    }
}
