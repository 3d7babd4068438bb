//! Synchronization deltas.
//!
//! A delta is one discrete event against a match. Paired devices exchange
//! deltas (wrapped in a [`DeltaEnvelope`](crate::DeltaEnvelope)) and every
//! device replays them, in sequence order, through the same kernel
//! operations. Identical ordered deltas yield identical match state.

use serde::{Deserialize, Serialize};

use crate::{Lifecycle, Side, WireError};

/// All events a device can publish for a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Delta {
    /// A rally won by `side`.
    Score {
        /// Side that scored.
        side: Side,
    },
    /// Take one point away from `side`.
    DecrementScore {
        /// Side losing the point.
        side: Side,
    },
    /// Operator set the serving side.
    SetServingSide {
        /// New serving side.
        side: Side,
    },
    /// Operator set the serving partner (doubles).
    SetServerIndex {
        /// Raw index, validated on apply.
        index: u8,
    },
    /// Move the match to a lifecycle state (pause, resume, complete, reset).
    SetLifecycle {
        /// Target state.
        lifecycle: Lifecycle,
    },
    /// Match clock update from the device running the timer.
    SetElapsedTime {
        /// Elapsed playing time in milliseconds.
        elapsed_ms: u64,
        /// Whether the clock is currently running.
        running: bool,
    },
    /// Service fault: serve passes according to the rotation rules.
    Fault,
    /// Heuristic undo of the last point.
    Undo,
}

impl Delta {
    /// Serialize to MessagePack bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        rmp_serde::to_vec_named(self).map_err(WireError::Serialization)
    }

    /// Deserialize from MessagePack bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        rmp_serde::from_slice(bytes).map_err(WireError::Deserialization)
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Delta::Score { .. } => "score",
            Delta::DecrementScore { .. } => "decrement_score",
            Delta::SetServingSide { .. } => "set_serving_side",
            Delta::SetServerIndex { .. } => "set_server_index",
            Delta::SetLifecycle { .. } => "set_lifecycle",
            Delta::SetElapsedTime { .. } => "set_elapsed_time",
            Delta::Fault => "fault",
            Delta::Undo => "undo",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_msgpack_roundtrip() {
        let deltas = vec![
            Delta::Score { side: Side::B },
            Delta::SetLifecycle {
                lifecycle: Lifecycle::Paused,
            },
            Delta::SetElapsedTime {
                elapsed_ms: 90_000,
                running: true,
            },
            Delta::Fault,
        ];

        for delta in deltas {
            let bytes = delta.to_bytes().unwrap();
            assert_eq!(Delta::from_bytes(&bytes).unwrap(), delta);
        }
    }

    #[test]
    fn delta_json_uses_type_tag() {
        let json = serde_json::to_string(&Delta::Score { side: Side::A }).unwrap();
        assert_eq!(json, r#"{"type":"Score","side":"A"}"#);

        let parsed: Delta = serde_json::from_str(r#"{"type":"Undo"}"#).unwrap();
        assert_eq!(parsed, Delta::Undo);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            Delta::from_bytes(&[0xc1, 0x00]),
            Err(WireError::Deserialization(_))
        ));
    }
}
