//! Consuming layer for the presentation side
//!
//! `NearbyPosts` runs acquisition plus enrichment and keeps the loading flag,
//! the last error and the last applied result. Results are tagged with a
//! generation so a reload or [`NearbyPosts::cancel`] makes older in-flight
//! results inert.

use crate::enrich::{enrich, Post};
use crate::error::{LocationError, LocationErrorCode};
use crate::service::LocationService;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// Identifies one load; only the latest token may apply results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Location failure as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    pub code: LocationErrorCode,
    pub message: String,
    /// Whether offering the user a retry (with a permission prompt) can help
    pub recoverable: bool,
}

impl From<&LocationError> for LoadError {
    fn from(err: &LocationError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            recoverable: err.is_user_recoverable(),
        }
    }
}

#[derive(Debug, Default)]
struct View {
    generation: u64,
    loading: bool,
    error: Option<LoadError>,
    posts: Vec<Post>,
}

/// Loading/error/result state around a shared [`LocationService`].
pub struct NearbyPosts {
    service: Arc<LocationService>,
    view: RwLock<View>,
}

impl NearbyPosts {
    /// Create a hook over `service`
    pub fn new(service: Arc<LocationService>) -> Self {
        Self {
            service,
            view: RwLock::new(View::default()),
        }
    }

    /// Acquire the user location and enrich `posts` with distances.
    ///
    /// A location failure is reported through [`NearbyPosts::error`] and the
    /// posts are still published, every distance showing "N/A". Returns
    /// whether the result was applied (false if superseded meanwhile).
    pub async fn load(&self, posts: Vec<Post>, force_permission_prompt: bool) -> bool {
        let token = self.begin();

        let (user, error) = match self.service.acquire_user_location(force_permission_prompt).await {
            Ok(coordinate) => (Some(coordinate), None),
            Err(e) => {
                warn!(error = %e, "Showing posts without distances");
                (None, Some(LoadError::from(&e)))
            }
        };

        let enriched = enrich(&self.service, user.as_ref(), posts).await;
        self.apply(token, enriched, error)
    }

    /// Start a new load, superseding any in flight.
    pub fn begin(&self) -> RequestToken {
        let mut view = self.write();
        view.generation += 1;
        view.loading = true;
        view.error = None;
        RequestToken(view.generation)
    }

    /// Publish results for `token` if it is still current.
    pub fn apply(&self, token: RequestToken, posts: Vec<Post>, error: Option<LoadError>) -> bool {
        let mut view = self.write();
        if token.0 != view.generation {
            debug!(token = token.0, current = view.generation, "Discarding stale result");
            return false;
        }

        view.loading = false;
        view.error = error;
        view.posts = posts;
        true
    }

    /// Abandon the current load; its results will be discarded.
    pub fn cancel(&self) {
        let mut view = self.write();
        view.generation += 1;
        view.loading = false;
    }

    /// Whether a load is in flight
    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    /// Location error of the last applied load
    pub fn error(&self) -> Option<LoadError> {
        self.read().error.clone()
    }

    /// Posts of the last applied load
    pub fn posts(&self) -> Vec<Post> {
        self.read().posts.clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, View> {
        self.view.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, View> {
        self.view.write().unwrap_or_else(PoisonError::into_inner)
    }
}
