//! Batch distance calculations with optional parallelism.
//!
//! These helpers work on items whose coordinates are already resolved (or
//! known to be unresolvable). Address geocoding lives in the location crate.

use crate::{haversine_distance, Coordinate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Result of a distance calculation for a single item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceResult {
    /// The item ID
    pub id: String,
    /// Distance in kilometers, `None` if the item has no usable coordinate
    pub distance_km: Option<f64>,
}

/// Input item for batch distance calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatedItem {
    /// Item ID
    pub id: String,
    /// Resolved coordinate, if any
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
}

impl LocatedItem {
    /// Creates an item with a resolved coordinate.
    pub fn new(id: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            coordinate: Some(coordinate),
        }
    }

    /// Creates an item whose location could not be resolved.
    pub fn unresolved(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            coordinate: None,
        }
    }
}

/// Total order over optional distances: nearest first, unresolved last.
pub fn compare_distances(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Calculate distances from `origin` to every item, in input order.
///
/// # Example
/// ```
/// use dealzsta_geo::{calculate_distances, Coordinate, LocatedItem};
///
/// let items = vec![
///     LocatedItem::new("berlin", Coordinate::new(52.5200, 13.4050)),
///     LocatedItem::unresolved("nowhere"),
/// ];
///
/// let results = calculate_distances(&Coordinate::new(50.0, 10.0), &items);
/// assert_eq!(results.len(), 2);
/// assert!(results[1].distance_km.is_none());
/// ```
pub fn calculate_distances(origin: &Coordinate, items: &[LocatedItem]) -> Vec<DistanceResult> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items
            .par_iter()
            .map(|item| calculate_single_distance(origin, item))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        items
            .iter()
            .map(|item| calculate_single_distance(origin, item))
            .collect()
    }
}

/// Calculate distances and return them nearest first.
///
/// Unresolved items sort last. `max_results` truncates after sorting.
pub fn calculate_distances_sorted(
    origin: &Coordinate,
    items: &[LocatedItem],
    max_results: Option<usize>,
) -> Vec<DistanceResult> {
    let mut results = calculate_distances(origin, items);
    results.sort_by(|a, b| compare_distances(a.distance_km, b.distance_km));

    if let Some(max) = max_results {
        results.truncate(max);
    }

    results
}

/// Calculate distances for items within `radius_km`, nearest first.
pub fn calculate_distances_within_radius(
    origin: &Coordinate,
    items: &[LocatedItem],
    radius_km: f64,
) -> Vec<DistanceResult> {
    let mut results = calculate_distances(origin, items);
    results.retain(|r| r.distance_km.is_some_and(|d| d <= radius_km));
    results.sort_by(|a, b| compare_distances(a.distance_km, b.distance_km));
    results
}

#[inline]
fn calculate_single_distance(origin: &Coordinate, item: &LocatedItem) -> DistanceResult {
    DistanceResult {
        id: item.id.clone(),
        distance_km: item
            .coordinate
            .map(|coord| haversine_distance(origin, &coord)),
    }
}
