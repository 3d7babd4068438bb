//! Completion and match-point evaluation.

use court_types::{Lifecycle, Side};
use std::time::Duration;

use crate::{MatchConfiguration, MatchState};

/// Score-based win condition, ignoring time and rally caps.
pub fn is_winning_score(config: &MatchConfiguration, score_a: u32, score_b: u32) -> bool {
    let reached = score_a >= config.winning_score || score_b >= config.winning_score;
    reached && (!config.win_by_two || score_a.abs_diff(score_b) >= 2)
}

impl MatchState {
    /// Whether the match should end now.
    ///
    /// `elapsed` is the playing time measured by the caller; the kernel
    /// keeps no clock of its own.
    pub fn should_complete(&self, elapsed: Duration) -> bool {
        let config = &self.configuration;
        is_winning_score(config, self.score_a, self.score_b)
            || config.time_limit.is_some_and(|limit| elapsed >= limit)
            || config
                .max_rallies
                .is_some_and(|max| self.total_rallies >= max)
    }

    /// Whether one more point for `side` would win the match.
    ///
    /// Time and rally caps are ignored. Always false once completed.
    pub fn is_at_match_point(&self, side: Side) -> bool {
        if self.is_completed {
            return false;
        }
        let (a, b) = match side {
            Side::A => (self.score_a.saturating_add(1), self.score_b),
            Side::B => (self.score_a, self.score_b.saturating_add(1)),
        };
        is_winning_score(&self.configuration, a, b)
    }

    pub(crate) fn finish(&mut self, now: u64) {
        self.is_completed = true;
        self.completed_at = Some(now);
        self.lifecycle = Lifecycle::Completed;
    }
}
