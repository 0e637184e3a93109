//! Call status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of the call widget.
///
/// `idle → connecting → active → ended → idle`, with `error` reachable from
/// any status and left again by starting a new call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    /// No call; ready to start one.
    #[default]
    Idle,
    /// Start requested, waiting for the vendor's session-start event.
    Connecting,
    /// Call in progress.
    Active,
    /// Call finished; returns to idle after the reset delay.
    Ended,
    /// Something failed; a new start is allowed.
    Error,
}

impl CallStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [CallStatus; 5] = [
        CallStatus::Idle,
        CallStatus::Connecting,
        CallStatus::Active,
        CallStatus::Ended,
        CallStatus::Error,
    ];

    /// Returns `true` if a call is being set up or running.
    pub fn is_in_call(&self) -> bool {
        matches!(self, CallStatus::Connecting | CallStatus::Active)
    }

    /// Returns `true` if a new call may be started from this status.
    pub fn can_start(&self) -> bool {
        matches!(self, CallStatus::Idle | CallStatus::Ended | CallStatus::Error)
    }

    /// Lowercase name, as used in markup attributes.
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Idle => "idle",
            CallStatus::Connecting => "connecting",
            CallStatus::Active => "active",
            CallStatus::Ended => "ended",
            CallStatus::Error => "error",
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(CallStatus::default(), CallStatus::Idle);
    }

    #[test]
    fn test_predicates() {
        assert!(CallStatus::Connecting.is_in_call());
        assert!(CallStatus::Active.is_in_call());
        assert!(!CallStatus::Ended.is_in_call());

        assert!(CallStatus::Idle.can_start());
        assert!(CallStatus::Ended.can_start());
        assert!(CallStatus::Error.can_start());
        assert!(!CallStatus::Connecting.can_start());
        assert!(!CallStatus::Active.can_start());
    }

    #[test]
    fn test_in_call_and_can_start_are_exclusive() {
        for status in CallStatus::ALL {
            assert_ne!(status.is_in_call(), status.can_start(), "{status}");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(CallStatus::Idle.to_string(), "idle");
        assert_eq!(CallStatus::Connecting.to_string(), "connecting");
        assert_eq!(CallStatus::Active.to_string(), "active");
        assert_eq!(CallStatus::Ended.to_string(), "ended");
        assert_eq!(CallStatus::Error.to_string(), "error");
    }
}
