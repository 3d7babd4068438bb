//! Error types for Courtside.

use thiserror::Error;

use crate::Lifecycle;

/// Rule violations reported by the match kernel.
///
/// Every variant is raised before any mutation happens, so a rejected
/// operation leaves the match state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// Side argument was not A or B.
    #[error("invalid side selector: {0:?}")]
    InvalidSideSelector(String),

    /// Mutating operation attempted after the match completed.
    #[error("match is already completed")]
    AlreadyCompleted,

    /// Scoring attempted while the match is paused.
    #[error("match is paused")]
    PausedStateViolation,

    /// Manual correction attempted during a live rally.
    #[error("manual changes are not allowed during play")]
    ManualChangeDuringPlayViolation,

    /// Score removal requested for a side that has nothing to remove.
    #[error("no points to undo")]
    NoPointsToUndo,

    /// Doubles-only operation invoked on a singles match.
    #[error("operation not available for this match configuration")]
    InvalidOperationForConfiguration,

    /// Server index outside 1..=2.
    #[error("invalid server index: {0}")]
    InvalidServerIndex(u8),

    /// Ruleset failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Lifecycle change that the current state does not allow.
    #[error("cannot move from {from:?} to {to:?}")]
    InvalidLifecycleTransition {
        /// Lifecycle before the attempted change.
        from: Lifecycle,
        /// Requested lifecycle.
        to: Lifecycle,
    },
}

/// Errors from encoding or decoding deltas for transport.
#[derive(Debug, Error)]
pub enum WireError {
    /// MessagePack serialization failed
    #[error("serialization failed: {0}")]
    Serialization(#[source] rmp_serde::encode::Error),

    /// MessagePack deserialization failed
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] rmp_serde::decode::Error),

    /// Envelope version this build does not understand
    #[error("unsupported envelope version: {0}")]
    UnsupportedVersion(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = MatchError::InvalidServerIndex(3);
        assert_eq!(err.to_string(), "invalid server index: 3");

        let err = MatchError::InvalidSideSelector("c".into());
        assert_eq!(err.to_string(), "invalid side selector: \"c\"");
    }

    #[test]
    fn lifecycle_transition_display_names_both_states() {
        let err = MatchError::InvalidLifecycleTransition {
            from: Lifecycle::Playing,
            to: Lifecycle::Serving,
        };
        assert_eq!(err.to_string(), "cannot move from Playing to Serving");
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MatchError>();
        assert_send_sync::<WireError>();
    }
}
