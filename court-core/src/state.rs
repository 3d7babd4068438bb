//! Match state.
//!
//! [`MatchState`] is the single mutable value the kernel works on. Its
//! fields are only written by the rule modules of this crate (scoring,
//! faults, corrections, undo, lifecycle), each of which checks every
//! precondition before touching anything.

use court_types::{Lifecycle, MatchError, ServePosition, ServerIndex, Side, TeamSize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{MatchConfiguration, SideSwitchPolicy};

/// Score, serve and court state of one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub(crate) score_a: u32,
    pub(crate) score_b: u32,
    pub(crate) is_completed: bool,
    /// Unix seconds.
    pub(crate) completed_at: Option<u64>,
    pub(crate) serving_side: Side,
    pub(crate) server_index: ServerIndex,
    pub(crate) serve_position: ServePosition,
    /// Logical side standing at the court end side A started on.
    pub(crate) active_side: Side,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) is_first_service_sequence: bool,
    pub(crate) total_rallies: u32,
    pub(crate) configuration: MatchConfiguration,
}

impl MatchState {
    /// Start a match under the given rules.
    pub fn new(configuration: MatchConfiguration) -> Result<Self, MatchError> {
        configuration.validate()?;
        let mut state = Self {
            score_a: 0,
            score_b: 0,
            is_completed: false,
            completed_at: None,
            serving_side: configuration.starting_side,
            server_index: ServerIndex::FIRST,
            serve_position: ServePosition::Right,
            active_side: Side::A,
            lifecycle: Lifecycle::Initial,
            is_first_service_sequence: false,
            total_rallies: 0,
            configuration,
        };
        state.restore_start_positions();
        Ok(state)
    }

    /// Points scored by side A.
    pub fn score_a(&self) -> u32 {
        self.score_a
    }

    /// Points scored by side B.
    pub fn score_b(&self) -> u32 {
        self.score_b
    }

    /// Points scored by `side`.
    pub fn score_of(&self, side: Side) -> u32 {
        match side {
            Side::A => self.score_a,
            Side::B => self.score_b,
        }
    }

    /// Sum of both scores.
    pub fn combined_score(&self) -> u32 {
        self.score_a.saturating_add(self.score_b)
    }

    /// Whether the match is over.
    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// When the match ended (Unix seconds).
    pub fn completed_at(&self) -> Option<u64> {
        self.completed_at
    }

    /// Side currently serving.
    pub fn serving_side(&self) -> Side {
        self.serving_side
    }

    /// Serving partner; only meaningful in doubles.
    pub fn server_index(&self) -> ServerIndex {
        self.server_index
    }

    /// Service court the server stands in.
    pub fn serve_position(&self) -> ServePosition {
        self.serve_position
    }

    /// Logical side at the court end side A started on.
    pub fn active_side(&self) -> Side {
        self.active_side
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Whether the opening doubles side is still on its single-server turn.
    pub fn is_first_service_sequence(&self) -> bool {
        self.is_first_service_sequence
    }

    /// Scored rallies so far.
    pub fn total_rallies(&self) -> u32 {
        self.total_rallies
    }

    /// The rules this match is played under.
    pub fn configuration(&self) -> &MatchConfiguration {
        &self.configuration
    }

    /// Side ahead on points, `None` when level.
    pub fn leader(&self) -> Option<Side> {
        match self.score_a.cmp(&self.score_b) {
            std::cmp::Ordering::Greater => Some(Side::A),
            std::cmp::Ordering::Less => Some(Side::B),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Winner of a completed match. A capped match that ends level has none.
    pub fn winner(&self) -> Option<Side> {
        if self.is_completed {
            self.leader()
        } else {
            None
        }
    }

    /// SHA-256 over every field, hex encoded.
    ///
    /// Two devices that applied the same envelopes in order report the
    /// same fingerprint.
    pub fn fingerprint(&self) -> String {
        let config = &self.configuration;
        let mut hasher = Sha256::new();
        hasher.update(b"courtside-match-state-v1");
        hasher.update(self.score_a.to_le_bytes());
        hasher.update(self.score_b.to_le_bytes());
        hasher.update([self.is_completed as u8]);
        hasher.update(self.completed_at.unwrap_or(u64::MAX).to_le_bytes());
        hasher.update([
            self.serving_side as u8,
            self.server_index.value(),
            self.serve_position as u8,
            self.active_side as u8,
            self.lifecycle as u8,
            self.is_first_service_sequence as u8,
        ]);
        hasher.update(self.total_rallies.to_le_bytes());
        hasher.update(config.winning_score.to_le_bytes());
        hasher.update([config.win_by_two as u8, config.team_size.players()]);
        let (switch_tag, switch_at) = match config.side_switch {
            SideSwitchPolicy::EveryPoint => (0u8, 0u32),
            SideSwitchPolicy::AtHalfway => (1, 0),
            SideSwitchPolicy::DefaultAtCombinedSix => (2, 0),
            SideSwitchPolicy::Custom(n) => (3, n),
        };
        hasher.update([switch_tag]);
        hasher.update(switch_at.to_le_bytes());
        hasher.update(
            config
                .time_limit
                .map_or(u64::MAX, |d| d.as_secs())
                .to_le_bytes(),
        );
        hasher.update(config.max_rallies.unwrap_or(u32::MAX).to_le_bytes());
        hasher.update([config.starting_side as u8]);
        hex::encode(hasher.finalize())
    }

    /// Recompute court ends and service court from the combined score.
    pub(crate) fn refresh_court(&mut self) {
        let combined = self.combined_score();
        let config = &self.configuration;
        self.active_side = if config
            .side_switch
            .is_switched(config.winning_score, combined)
        {
            Side::B
        } else {
            Side::A
        };
        self.serve_position = ServePosition::for_combined(combined);
    }

    /// Put every serving, side and lifecycle field back to its match-start value.
    ///
    /// Scores and rallies are left alone.
    pub(crate) fn restore_start_positions(&mut self) {
        self.serving_side = self.configuration.starting_side;
        self.server_index = ServerIndex::FIRST;
        self.serve_position = ServePosition::Right;
        self.active_side = Side::A;
        self.lifecycle = Lifecycle::Initial;
        self.is_first_service_sequence = self.configuration.team_size == TeamSize::Doubles;
    }

    pub(crate) fn add_point(&mut self, side: Side) {
        match side {
            Side::A => self.score_a = self.score_a.saturating_add(1),
            Side::B => self.score_b = self.score_b.saturating_add(1),
        }
    }

    pub(crate) fn remove_point(&mut self, side: Side) {
        match side {
            Side::A => self.score_a = self.score_a.saturating_sub(1),
            Side::B => self.score_b = self.score_b.saturating_sub(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_match_starts_at_defaults() {
        let state = MatchState::new(MatchConfiguration::doubles()).unwrap();

        assert_eq!((state.score_a(), state.score_b()), (0, 0));
        assert_eq!(state.lifecycle(), Lifecycle::Initial);
        assert_eq!(state.serving_side(), Side::A);
        assert_eq!(state.server_index(), ServerIndex::FIRST);
        assert_eq!(state.serve_position(), ServePosition::Right);
        assert_eq!(state.active_side(), Side::A);
        assert!(state.is_first_service_sequence());
        assert!(!state.is_completed());
        assert_eq!(state.completed_at(), None);
        assert_eq!(state.total_rallies(), 0);
    }

    #[test]
    fn singles_has_no_first_service_sequence() {
        let state = MatchState::new(MatchConfiguration::singles()).unwrap();
        assert!(!state.is_first_service_sequence());
    }

    #[test]
    fn starting_side_serves_first() {
        let config = MatchConfiguration::singles().with_starting_side(Side::B);
        let state = MatchState::new(config).unwrap();
        assert_eq!(state.serving_side(), Side::B);
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let config = MatchConfiguration::default().with_winning_score(0);
        assert!(matches!(
            MatchState::new(config),
            Err(MatchError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn leader_and_winner() {
        let mut state = MatchState::new(MatchConfiguration::singles()).unwrap();
        assert_eq!(state.leader(), None);

        state.score_b = 3;
        assert_eq!(state.leader(), Some(Side::B));
        assert_eq!(state.winner(), None);

        state.is_completed = true;
        assert_eq!(state.winner(), Some(Side::B));
    }

    #[test]
    fn fingerprint_tracks_state() {
        let a = MatchState::new(MatchConfiguration::singles()).unwrap();
        let mut b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);

        b.score_a = 1;
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_covers_configuration() {
        let a = MatchState::new(MatchConfiguration::singles()).unwrap();
        let b = MatchState::new(MatchConfiguration::singles().with_winning_score(15)).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_encoding_is_stable() {
        let state = MatchState::new(MatchConfiguration::singles()).unwrap();
        assert_eq!(
            state.fingerprint(),
            "9b1cb674f621ece5e448287b607973eb5a83157a525a0aa1ed39d0e10f688690"
        );
    }

    #[test]
    fn every_switch_policy_fingerprints_differently() {
        let policies = [
            SideSwitchPolicy::EveryPoint,
            SideSwitchPolicy::AtHalfway,
            SideSwitchPolicy::DefaultAtCombinedSix,
            SideSwitchPolicy::Custom(6),
            SideSwitchPolicy::Custom(7),
        ];
        let prints: std::collections::HashSet<String> = policies
            .iter()
            .map(|&p| {
                MatchState::new(MatchConfiguration::singles().with_side_switch(p))
                    .unwrap()
                    .fingerprint()
            })
            .collect();
        assert_eq!(prints.len(), policies.len());
    }

    #[test]
    fn state_survives_json() {
        let state = MatchState::new(MatchConfiguration::doubles()).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let back: MatchState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
