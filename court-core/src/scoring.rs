//! Point scoring.

use court_types::{Lifecycle, MatchError, Side, TeamSize};
use std::time::Duration;

use crate::MatchState;

impl MatchState {
    /// Award a rally to `side`.
    ///
    /// Bumps the score and rally count, recomputes court ends and service
    /// court, rotates the serve (singles only), then evaluates completion.
    ///
    /// In singles the serving side flips on every point whichever side won
    /// it. Doubles serve only moves through [`handle_fault`](Self::handle_fault).
    pub fn apply_point(&mut self, side: Side, now: u64, elapsed: Duration) -> Result<(), MatchError> {
        if self.is_completed {
            return Err(MatchError::AlreadyCompleted);
        }
        if self.lifecycle == Lifecycle::Paused {
            return Err(MatchError::PausedStateViolation);
        }

        self.add_point(side);
        self.total_rallies = self.total_rallies.saturating_add(1);
        self.refresh_court();

        if self.configuration.team_size == TeamSize::Singles {
            self.serving_side = self.serving_side.opponent();
        }

        if matches!(self.lifecycle, Lifecycle::Initial | Lifecycle::Serving) {
            self.lifecycle = Lifecycle::Playing;
        }

        if self.should_complete(elapsed) {
            self.finish(now);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MatchConfiguration, SideSwitchPolicy};
    use court_types::{ServePosition, ServerIndex};

    const NOW: u64 = 1_700_000_000;

    fn point(state: &mut MatchState, side: Side) {
        state.apply_point(side, NOW, Duration::ZERO).unwrap();
    }

    #[test]
    fn point_increments_score_and_rallies() {
        let mut state = MatchState::new(MatchConfiguration::doubles()).unwrap();
        point(&mut state, Side::B);

        assert_eq!((state.score_a(), state.score_b()), (0, 1));
        assert_eq!(state.total_rallies(), 1);
        assert_eq!(state.lifecycle(), Lifecycle::Playing);
        assert_eq!(state.serve_position(), ServePosition::Left);
    }

    #[test]
    fn singles_serve_flips_on_every_point() {
        let mut state = MatchState::new(MatchConfiguration::singles()).unwrap();
        point(&mut state, Side::A);
        assert_eq!(state.serving_side(), Side::B);
        point(&mut state, Side::A);
        assert_eq!(state.serving_side(), Side::A);
        point(&mut state, Side::B);
        assert_eq!(state.serving_side(), Side::B);
    }

    #[test]
    fn doubles_serve_never_moves_on_a_point() {
        let mut state = MatchState::new(MatchConfiguration::doubles()).unwrap();
        for side in [Side::A, Side::B, Side::B, Side::A] {
            point(&mut state, side);
        }
        assert_eq!(state.serving_side(), Side::A);
        assert_eq!(state.server_index(), ServerIndex::FIRST);
        assert!(state.is_first_service_sequence());
    }

    #[test]
    fn default_policy_switches_ends_once_at_six() {
        let mut state = MatchState::new(MatchConfiguration::doubles()).unwrap();
        let mut ends = vec![state.active_side()];
        for i in 0..15 {
            let side = if i % 2 == 0 { Side::A } else { Side::B };
            point(&mut state, side);
            ends.push(state.active_side());
        }

        let flips: Vec<usize> = ends
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[0] != w[1])
            .map(|(i, _)| i + 1)
            .collect();
        assert_eq!(flips, vec![6]);
    }

    #[test]
    fn every_point_policy_flips_each_point() {
        let config = MatchConfiguration::singles().with_side_switch(SideSwitchPolicy::EveryPoint);
        let mut state = MatchState::new(config).unwrap();
        point(&mut state, Side::A);
        assert_eq!(state.active_side(), Side::B);
        point(&mut state, Side::A);
        assert_eq!(state.active_side(), Side::A);
    }

    #[test]
    fn halfway_policy_uses_winning_score() {
        let config = MatchConfiguration::singles()
            .with_winning_score(15)
            .with_side_switch(SideSwitchPolicy::AtHalfway);
        let mut state = MatchState::new(config).unwrap();
        for _ in 0..7 {
            point(&mut state, Side::A);
        }
        assert_eq!(state.active_side(), Side::A);
        point(&mut state, Side::B);
        assert_eq!(state.active_side(), Side::B);
    }

    #[test]
    fn win_by_two_from_deuce() {
        let mut state = MatchState::new(MatchConfiguration::doubles()).unwrap();
        for _ in 0..10 {
            point(&mut state, Side::A);
            point(&mut state, Side::B);
        }

        point(&mut state, Side::A);
        assert_eq!((state.score_a(), state.score_b()), (11, 10));
        assert!(!state.should_complete(Duration::ZERO));
        assert!(!state.is_completed());

        point(&mut state, Side::A);
        assert_eq!((state.score_a(), state.score_b()), (12, 10));
        assert!(state.should_complete(Duration::ZERO));
        assert!(state.is_completed());
        assert_eq!(state.lifecycle(), Lifecycle::Completed);
        assert_eq!(state.completed_at(), Some(NOW));
    }

    #[test]
    fn completed_match_rejects_points_unchanged() {
        let config = MatchConfiguration::singles()
            .with_winning_score(1)
            .with_win_by_two(false);
        let mut state = MatchState::new(config).unwrap();
        point(&mut state, Side::A);
        assert!(state.is_completed());

        let before = state.clone();
        assert_eq!(
            state.apply_point(Side::B, NOW, Duration::ZERO),
            Err(MatchError::AlreadyCompleted)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn paused_match_rejects_points_unchanged() {
        let mut state = MatchState::new(MatchConfiguration::singles()).unwrap();
        point(&mut state, Side::A);
        state.lifecycle = Lifecycle::Paused;

        let before = state.clone();
        assert_eq!(
            state.apply_point(Side::A, NOW, Duration::ZERO),
            Err(MatchError::PausedStateViolation)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn elapsed_time_past_limit_completes_on_next_point() {
        let config = MatchConfiguration::singles().with_time_limit(Duration::from_secs(60));
        let mut state = MatchState::new(config).unwrap();
        state
            .apply_point(Side::B, NOW, Duration::from_secs(61))
            .unwrap();
        assert!(state.is_completed());
        assert_eq!(state.winner(), Some(Side::B));
    }
}
