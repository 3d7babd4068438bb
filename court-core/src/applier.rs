//! In-order delta application.
//!
//! Devices of a match can receive deltas out of order or twice. The kernel
//! is order-sensitive, so the [`OrderedApplier`] holds envelopes back until
//! every lower sequence number has been applied:
//! - Envelopes at or below the applied sequence are duplicates and dropped
//! - Envelopes above the next expected sequence wait in a buffer
//! - Gaps are reported so the transport can request the missing deltas
//!
//! A delta the kernel rejects still consumes its sequence number. Every
//! device rejects it the same way, so the states stay identical.

use court_types::{DeltaEnvelope, MatchError, MatchId, Sequence};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::{Clock, MatchKernel};

/// What happened to an envelope handed to [`OrderedApplier::receive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receipt {
    /// Buffered until its turn comes.
    Queued,
    /// Already applied or already waiting.
    Duplicate,
    /// Belongs to a different match.
    ForeignMatch,
}

/// Outcome of one [`OrderedApplier::apply_ready`] pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    /// Deltas the kernel accepted.
    pub applied: usize,
    /// Deltas the kernel rejected, with the reason.
    pub rejected: Vec<(Sequence, MatchError)>,
}

/// Releases deltas for one match strictly in sequence order.
#[derive(Debug, Clone)]
pub struct OrderedApplier {
    match_id: MatchId,
    /// Highest sequence handed to the kernel.
    applied: u64,
    /// Envelopes waiting for a gap to close.
    pending: BTreeMap<u64, DeltaEnvelope>,
}

impl OrderedApplier {
    /// Largest gap enumerated by [`missing`](Self::missing).
    const MAX_GAP: u64 = 10_000;

    /// Applier for a match with nothing applied yet.
    pub fn new(match_id: MatchId) -> Self {
        Self::resume_from(match_id, Sequence::zero())
    }

    /// Applier that continues after a persisted sequence.
    pub fn resume_from(match_id: MatchId, applied: Sequence) -> Self {
        Self {
            match_id,
            applied: applied.value(),
            pending: BTreeMap::new(),
        }
    }

    /// Hand over one received envelope.
    pub fn receive(&mut self, envelope: DeltaEnvelope) -> Receipt {
        if envelope.match_id != self.match_id {
            warn!(
                expected = %self.match_id,
                got = %envelope.match_id,
                "dropping delta for another match"
            );
            return Receipt::ForeignMatch;
        }
        let seq = envelope.sequence.value();
        if seq <= self.applied || self.pending.contains_key(&seq) {
            return Receipt::Duplicate;
        }
        self.pending.insert(seq, envelope);
        Receipt::Queued
    }

    /// Remove and return the envelopes that are next in line, in order.
    pub fn drain_ready(&mut self) -> Vec<DeltaEnvelope> {
        let mut ready = Vec::new();
        while let Some(envelope) = self.pending.remove(&(self.applied + 1)) {
            self.applied += 1;
            ready.push(envelope);
        }
        ready
    }

    /// Apply every envelope that is next in line to `kernel`.
    ///
    /// Each delta is stamped with its envelope's timestamp, not the local
    /// clock.
    pub fn apply_ready<C: Clock>(&mut self, kernel: &mut MatchKernel<C>) -> ApplyReport {
        let mut report = ApplyReport::default();
        for envelope in self.drain_ready() {
            match kernel.apply_delta_at(&envelope.delta, envelope.timestamp) {
                Ok(()) => report.applied += 1,
                Err(e) => {
                    debug!(
                        sequence = %envelope.sequence,
                        kind = envelope.delta.kind(),
                        error = %e,
                        "delta rejected during replay"
                    );
                    report.rejected.push((envelope.sequence, e));
                }
            }
        }
        report
    }

    /// Highest sequence already released.
    pub fn last_applied(&self) -> Sequence {
        Sequence::new(self.applied)
    }

    /// Whether envelopes are waiting on missing ones.
    pub fn has_gaps(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Sequence numbers still missing before the buffered envelopes can go.
    ///
    /// Returns empty if the gap is larger than `MAX_GAP`, so a bogus
    /// sequence number cannot force a huge allocation.
    pub fn missing(&self) -> Vec<Sequence> {
        let Some(&highest) = self.pending.keys().next_back() else {
            return Vec::new();
        };
        if highest.saturating_sub(self.applied) > Self::MAX_GAP {
            return Vec::new();
        }
        ((self.applied + 1)..highest)
            .filter(|seq| !self.pending.contains_key(seq))
            .map(Sequence::new)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedClock, MatchConfiguration};
    use court_types::{Delta, DeviceId, Side};

    fn envelope(match_id: MatchId, seq: u64, delta: Delta) -> DeltaEnvelope {
        DeltaEnvelope {
            version: court_types::ENVELOPE_VERSION,
            match_id,
            sender_id: DeviceId::from_bytes(&[1u8; 32]).unwrap(),
            sequence: Sequence::new(seq),
            timestamp: 0,
            delta,
        }
    }

    fn score(match_id: MatchId, seq: u64, side: Side) -> DeltaEnvelope {
        envelope(match_id, seq, Delta::Score { side })
    }

    #[test]
    fn releases_in_order() {
        let id = MatchId::new();
        let mut applier = OrderedApplier::new(id);

        applier.receive(score(id, 2, Side::B));
        assert!(applier.drain_ready().is_empty());
        assert_eq!(applier.missing(), vec![Sequence::new(1)]);

        applier.receive(score(id, 1, Side::A));
        let ready: Vec<u64> = applier
            .drain_ready()
            .iter()
            .map(|e| e.sequence.value())
            .collect();
        assert_eq!(ready, vec![1, 2]);
        assert_eq!(applier.last_applied(), Sequence::new(2));
        assert!(!applier.has_gaps());
    }

    #[test]
    fn duplicates_and_foreign_matches_are_dropped() {
        let id = MatchId::new();
        let mut applier = OrderedApplier::new(id);

        assert_eq!(applier.receive(score(id, 1, Side::A)), Receipt::Queued);
        assert_eq!(applier.receive(score(id, 1, Side::A)), Receipt::Duplicate);
        applier.drain_ready();
        assert_eq!(applier.receive(score(id, 1, Side::A)), Receipt::Duplicate);
        assert_eq!(
            applier.receive(score(MatchId::new(), 2, Side::A)),
            Receipt::ForeignMatch
        );
    }

    #[test]
    fn missing_lists_every_hole() {
        let id = MatchId::new();
        let mut applier = OrderedApplier::new(id);
        applier.receive(score(id, 3, Side::A));
        applier.receive(score(id, 5, Side::A));
        assert_eq!(
            applier.missing(),
            vec![Sequence::new(1), Sequence::new(2), Sequence::new(4)]
        );
    }

    #[test]
    fn huge_gap_is_not_enumerated() {
        let id = MatchId::new();
        let mut applier = OrderedApplier::new(id);
        applier.receive(score(id, 50_000, Side::A));
        assert!(applier.has_gaps());
        assert!(applier.missing().is_empty());
    }

    #[test]
    fn resume_skips_already_applied() {
        let id = MatchId::new();
        let mut applier = OrderedApplier::resume_from(id, Sequence::new(10));
        assert_eq!(applier.receive(score(id, 9, Side::A)), Receipt::Duplicate);
        applier.receive(score(id, 11, Side::B));
        assert_eq!(applier.drain_ready().len(), 1);
    }

    #[test]
    fn out_of_order_devices_converge() {
        let id = MatchId::new();
        let deltas = vec![
            score(id, 1, Side::A),
            score(id, 2, Side::B),
            envelope(id, 3, Delta::Fault),
            score(id, 4, Side::A),
            envelope(id, 5, Delta::Undo),
            score(id, 6, Side::B),
        ];

        let mut forward = MatchKernel::with_clock(id, MatchConfiguration::doubles(), FixedClock(7)).unwrap();
        let mut shuffled = forward.clone();

        let mut a = OrderedApplier::new(id);
        for e in deltas.iter().cloned() {
            a.receive(e);
        }
        a.apply_ready(&mut forward);

        let mut b = OrderedApplier::new(id);
        for e in deltas.iter().rev().cloned() {
            b.receive(e);
        }
        let report = b.apply_ready(&mut shuffled);

        assert_eq!(report.applied, 6);
        assert_eq!(forward.state(), shuffled.state());
        assert_eq!(forward.state().fingerprint(), shuffled.state().fingerprint());
    }

    #[test]
    fn devices_with_different_clocks_agree() {
        let id = MatchId::new();
        let config = MatchConfiguration::singles().with_winning_score(2);
        let mut deltas = vec![score(id, 1, Side::A), score(id, 2, Side::A)];
        for e in &mut deltas {
            e.timestamp = 1_700_000_000;
        }

        let mut first = MatchKernel::with_clock(id, config.clone(), FixedClock(1_700_000_005)).unwrap();
        let mut second = MatchKernel::with_clock(id, config, FixedClock(1_700_000_009)).unwrap();
        for kernel in [&mut first, &mut second] {
            let mut applier = OrderedApplier::new(id);
            for e in deltas.iter().cloned() {
                applier.receive(e);
            }
            assert_eq!(applier.apply_ready(kernel).applied, 2);
        }

        assert!(first.state().is_completed());
        assert_eq!(first.state().completed_at(), Some(1_700_000_000));
        assert_eq!(first.state(), second.state());
        assert_eq!(first.state().fingerprint(), second.state().fingerprint());
    }

    #[test]
    fn rejected_delta_still_consumes_sequence() {
        let id = MatchId::new();
        let mut kernel = MatchKernel::with_clock(id, MatchConfiguration::singles(), FixedClock(0)).unwrap();
        let mut applier = OrderedApplier::new(id);

        applier.receive(envelope(id, 1, Delta::DecrementScore { side: Side::A }));
        applier.receive(score(id, 2, Side::A));
        let report = applier.apply_ready(&mut kernel);

        assert_eq!(report.applied, 1);
        assert_eq!(
            report.rejected,
            vec![(Sequence::new(1), MatchError::NoPointsToUndo)]
        );
        assert_eq!(applier.last_applied(), Sequence::new(2));
        assert_eq!(kernel.state().score_a(), 1);
    }
}
