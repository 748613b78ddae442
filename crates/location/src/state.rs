//! Session-level location state machine
//!
//! ```text
//! Unrequested -> Requesting -> {Granted, Denied}
//! Granted     -> Acquiring  -> {Available, Unavailable}
//! Available   -> Refreshing -> {Available, Unavailable}
//! ```
//!
//! Nothing is terminal: any state may re-enter `Requesting`, and
//! `Available`/`Unavailable` may enter `Refreshing` on an explicit refresh.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the session is in acquiring the user's location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Unrequested,
    Requesting,
    Granted,
    Denied,
    Acquiring,
    Available,
    Unavailable,
    Refreshing,
}

impl SessionState {
    /// Whether moving from `self` to `next` is allowed.
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;

        match (self, next) {
            (_, Requesting) => true,
            (Requesting, Granted | Denied) => true,
            (Granted, Acquiring) => true,
            (Acquiring | Refreshing, Available | Unavailable) => true,
            (Available | Unavailable, Refreshing) => true,
            _ => false,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Unrequested => "unrequested",
            SessionState::Requesting => "requesting",
            SessionState::Granted => "granted",
            SessionState::Denied => "denied",
            SessionState::Acquiring => "acquiring",
            SessionState::Available => "available",
            SessionState::Unavailable => "unavailable",
            SessionState::Refreshing => "refreshing",
        };
        f.write_str(name)
    }
}
