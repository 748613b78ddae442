//! Per-shop distance cache
//!
//! Maps shop id to the last resolved distance in kilometers. Entries are
//! replaced whole, never mutated in place. Concurrent lookups for the same
//! shop are not coalesced: each may geocode and the last write wins.
//!
//! Every [`DistanceCache::clear`] starts a new epoch. A lookup records the
//! epoch before geocoding and writes back through
//! [`DistanceCache::insert_if_epoch`], so a result computed against a user
//! location that has since been refreshed is never stored.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Entries {
    epoch: u64,
    distances: HashMap<String, f64>,
}

/// In-memory shop id -> distance (km) map shared by concurrent lookups.
#[derive(Debug, Default)]
pub struct DistanceCache {
    entries: RwLock<Entries>,
}

impl DistanceCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached distance for `shop_id`
    pub fn get(&self, shop_id: &str) -> Option<f64> {
        self.read().distances.get(shop_id).copied()
    }

    /// Current epoch; changes on every [`DistanceCache::clear`]
    pub fn epoch(&self) -> u64 {
        self.read().epoch
    }

    /// Store the distance for `shop_id` if no clear happened since `epoch`
    /// was read. Returns whether the value was stored.
    pub fn insert_if_epoch(&self, shop_id: &str, distance_km: f64, epoch: u64) -> bool {
        let mut entries = self.write();
        if entries.epoch != epoch {
            return false;
        }
        entries.distances.insert(shop_id.to_string(), distance_km);
        true
    }

    /// Drop every entry and start a new epoch
    pub fn clear(&self) {
        let mut entries = self.write();
        entries.distances.clear();
        entries.epoch = entries.epoch.wrapping_add(1);
    }

    /// Number of cached shops
    pub fn len(&self) -> usize {
        self.read().distances.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
