//! Distance enrichment of post lists
//!
//! Attaches `calculatedDistance` and `shopkm` to every post. Both are derived
//! display values and are recomputed whenever the user location changes.

use crate::service::LocationService;
use dealzsta_geo::{compare_distances, format_distance, Coordinate};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A deal/shop post as far as distance display is concerned.
///
/// Fields other than the ones below are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    /// Free-text shop address
    pub location: String,
    #[serde(default)]
    pub calculated_distance: Option<f64>,
    #[serde(default)]
    pub shopkm: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Post {
    /// Create a post with no distance attached yet
    pub fn new(id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            location: location.into(),
            calculated_distance: None,
            shopkm: String::new(),
            extra: Map::new(),
        }
    }

    /// Set the derived distance fields
    #[must_use]
    pub fn with_distance(mut self, distance_km: Option<f64>) -> Self {
        self.calculated_distance = distance_km;
        self.shopkm = format_distance(distance_km);
        self
    }
}

/// Annotate `posts` with distances from `user_location`.
///
/// The result has the same length and order as the input. Lookups run
/// concurrently and fail independently: a post whose address cannot be
/// geocoded gets `None`/`"N/A"` without affecting the others. Without a user
/// location every post gets `None`/`"N/A"` and nothing is geocoded.
///
/// Each post's `id` is used as the shop id for the service's distance cache.
pub async fn enrich(
    service: &LocationService,
    user_location: Option<&Coordinate>,
    posts: Vec<Post>,
) -> Vec<Post> {
    let Some(user) = user_location else {
        return posts.into_iter().map(|post| post.with_distance(None)).collect();
    };

    let lookups = posts.into_iter().map(|post| async move {
        let distance = service
            .distance_to_shop(Some(user), &post.location, Some(&post.id))
            .await;
        post.with_distance(distance)
    });

    join_all(lookups).await
}

/// Sort nearest first; posts without a distance go last. Ties keep their
/// original order.
pub fn rank_by_distance(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by(|a, b| compare_distances(a.calculated_distance, b.calculated_distance));
    posts
}

/// Keep posts whose resolved distance is at most `radius_km`.
pub fn within_radius(posts: Vec<Post>, radius_km: f64) -> Vec<Post> {
    posts
        .into_iter()
        .filter(|post| post.calculated_distance.is_some_and(|d| d <= radius_km))
        .collect()
}
