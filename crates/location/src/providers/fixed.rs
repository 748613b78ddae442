//! Positioning backed by a settable position.
//!
//! Used by the CLI (position from flags or config) and by tests that need to
//! move the user or revoke permission between calls.

use crate::capability::{PermissionStatus, Positioning};
use crate::error::ProviderError;
use async_trait::async_trait;
use dealzsta_geo::Coordinate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

/// A [`Positioning`] whose fix and permission are set by the owner.
#[derive(Debug)]
pub struct FixedPositioning {
    position: RwLock<Option<Coordinate>>,
    granted: AtomicBool,
    grant_on_request: bool,
}

impl FixedPositioning {
    /// Permission granted, always reporting `position`.
    pub fn granted(position: Coordinate) -> Self {
        Self {
            position: RwLock::new(Some(position)),
            granted: AtomicBool::new(true),
            grant_on_request: true,
        }
    }

    /// Permission not yet granted. A prompt grants it when `grant_on_request` is set.
    pub fn prompting(position: Coordinate, grant_on_request: bool) -> Self {
        Self {
            position: RwLock::new(Some(position)),
            granted: AtomicBool::new(false),
            grant_on_request,
        }
    }

    /// Permission granted but the device never gets a fix.
    pub fn without_fix() -> Self {
        Self {
            position: RwLock::new(None),
            granted: AtomicBool::new(true),
            grant_on_request: true,
        }
    }

    /// Move the device. `None` simulates losing the fix.
    pub fn set_position(&self, position: Option<Coordinate>) {
        *self.position.write().unwrap_or_else(PoisonError::into_inner) = position;
    }

    /// Change the permission as if the user toggled it in system settings.
    pub fn set_permission(&self, status: PermissionStatus) {
        self.granted.store(status.is_granted(), Ordering::SeqCst);
    }
}

#[async_trait]
impl Positioning for FixedPositioning {
    async fn permission_status(&self) -> PermissionStatus {
        if self.granted.load(Ordering::SeqCst) {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }

    async fn request_permission(&self) -> PermissionStatus {
        if self.grant_on_request {
            self.granted.store(true, Ordering::SeqCst);
        }
        self.permission_status().await
    }

    async fn current_position(&self) -> Result<Coordinate, ProviderError> {
        let position = *self.position.read().unwrap_or_else(PoisonError::into_inner);
        position.ok_or_else(|| ProviderError::NoFix("no position configured".to_string()))
    }
}
