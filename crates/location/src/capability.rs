//! Device capabilities the location service consumes.
//!
//! Platforms plug in their own positioning and geocoding by implementing
//! these traits. Ready-made implementations live in [`crate::providers`].

use crate::error::ProviderError;
use async_trait::async_trait;
use dealzsta_geo::Coordinate;
use serde::{Deserialize, Serialize};

/// Outcome of a permission check or prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    /// Location access allowed
    Granted,
    /// Location access refused or not yet granted
    Denied,
}

impl PermissionStatus {
    /// Returns true for [`PermissionStatus::Granted`].
    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

/// Access to the device position.
#[async_trait]
pub trait Positioning: Send + Sync {
    /// Current permission state, without prompting the user.
    async fn permission_status(&self) -> PermissionStatus;

    /// Prompt the user for location permission.
    async fn request_permission(&self) -> PermissionStatus;

    /// A fresh position fix. Fails when no fix is available.
    async fn current_position(&self) -> Result<Coordinate, ProviderError>;
}

/// Forward geocoding of free-text addresses.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve `address` to candidate coordinates, best first according to
    /// the provider. An empty list means the address is unresolvable.
    async fn geocode(&self, address: &str) -> Result<Vec<Coordinate>, ProviderError>;
}
