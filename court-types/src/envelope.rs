//! Envelope - the transport wrapper for match deltas.

use serde::{Deserialize, Serialize};

use crate::{Delta, DeviceId, MatchId, Sequence, WireError};

/// Current envelope format version.
pub const ENVELOPE_VERSION: u8 = 1;

/// Wraps a [`Delta`] with the routing and ordering metadata the
/// transport needs to deliver it to every device of a match in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaEnvelope {
    /// Format version (currently 1)
    pub version: u8,
    /// Match this delta belongs to
    pub match_id: MatchId,
    /// Device that produced the delta
    pub sender_id: DeviceId,
    /// Position in the match's delta stream
    pub sequence: Sequence,
    /// Unix timestamp (seconds) when the sender produced the delta.
    /// Ordering uses `sequence`; replay uses this as the event time.
    pub timestamp: u64,
    /// The event itself
    pub delta: Delta,
}

impl DeltaEnvelope {
    /// Create a new envelope stamped with the current wall-clock time.
    pub fn new(match_id: MatchId, sender_id: DeviceId, sequence: Sequence, delta: Delta) -> Self {
        Self {
            version: ENVELOPE_VERSION,
            match_id,
            sender_id,
            sequence,
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            delta,
        }
    }

    /// Serialize to MessagePack bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        rmp_serde::to_vec_named(self).map_err(WireError::Serialization)
    }

    /// Deserialize from MessagePack bytes.
    ///
    /// Envelopes from a newer format version are rejected rather than
    /// half-understood.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        let envelope: Self = rmp_serde::from_slice(bytes).map_err(WireError::Deserialization)?;
        if envelope.version != ENVELOPE_VERSION {
            return Err(WireError::UnsupportedVersion(envelope.version));
        }
        Ok(envelope)
    }
}
