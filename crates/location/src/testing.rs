//! Test doubles and deterministic fixtures shared by unit tests.

use crate::capability::{Geocoder, PermissionStatus, Positioning};
use crate::error::ProviderError;
use crate::providers::TableGeocoder;
use async_trait::async_trait;
use dealzsta_geo::Coordinate;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Wraps a [`TableGeocoder`], counting calls and injecting failures or delays.
pub(crate) struct CountingGeocoder {
    table: TableGeocoder,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
}

impl CountingGeocoder {
    pub(crate) fn new(table: TableGeocoder) -> Self {
        Self {
            table,
            failing: HashSet::new(),
            delays: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing_on(mut self, address: &str) -> Self {
        self.failing.insert(address.to_string());
        self
    }

    pub(crate) fn delayed(mut self, address: &str, delay: Duration) -> Self {
        self.delays.insert(address.to_string(), delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for CountingGeocoder {
    async fn geocode(&self, address: &str) -> Result<Vec<Coordinate>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(address) {
            tokio::time::sleep(*delay).await;
        }

        if self.failing.contains(address) {
            return Err(ProviderError::Status {
                status: 503,
                message: "geocoder unavailable".to_string(),
            });
        }

        self.table.geocode(address).await
    }
}

/// Always-granted positioning that takes `delay` per fix and records how many
/// fixes were requested at the same time.
pub(crate) struct SlowPositioning {
    position: Coordinate,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl SlowPositioning {
    pub(crate) fn new(position: Coordinate, delay: Duration) -> Self {
        Self {
            position,
            delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Positioning for SlowPositioning {
    async fn permission_status(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn request_permission(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn current_position(&self) -> Result<Coordinate, ProviderError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(self.position)
    }
}

pub(crate) mod fixtures {
    use super::*;

    pub(crate) const ALEXANDERPLATZ: Coordinate = Coordinate::new(52.5219, 13.4132);
    pub(crate) const BRANDENBURGER_TOR: Coordinate = Coordinate::new(52.5163, 13.3777);
    pub(crate) const POTSDAM: Coordinate = Coordinate::new(52.3906, 13.0645);

    pub(crate) const BRANDENBURGER_TOR_ADDRESS: &str = "Pariser Platz 1, Berlin";
    pub(crate) const POTSDAM_ADDRESS: &str = "Alter Markt, Potsdam";
    pub(crate) const BROKEN_ADDRESS: &str = "Unterm Regenbogen 7";

    /// Brandenburger Tor is ~2.5 km from Alexanderplatz, Potsdam ~28 km.
    pub(crate) fn berlin_table() -> TableGeocoder {
        TableGeocoder::new()
            .with(BRANDENBURGER_TOR_ADDRESS, BRANDENBURGER_TOR)
            .with(POTSDAM_ADDRESS, POTSDAM)
    }
}
