//! Point removal without an event log.
//!
//! The state does not remember which side won the last rally, so undo
//! guesses: it takes the point back from whoever leads (side B when level)
//! and rebuilds the serve and court fields from the new score. It is an
//! approximation, not an inverse of [`apply_point`](MatchState::apply_point).

use court_types::{Lifecycle, MatchError, Side, TeamSize};

use crate::MatchState;

impl MatchState {
    /// Take back the most likely last point.
    ///
    /// Returns `Ok(false)` without touching anything when no rally has been
    /// played yet.
    pub fn undo_last_point(&mut self) -> Result<bool, MatchError> {
        if self.is_completed {
            return Err(MatchError::AlreadyCompleted);
        }
        if self.total_rallies == 0 {
            return Ok(false);
        }

        match self.leader() {
            Some(side) => self.remove_point(side),
            None if self.score_b > 0 => self.remove_point(Side::B),
            None => {}
        }
        self.total_rallies = self.total_rallies.saturating_sub(1);
        self.rebuild_after_removal();
        Ok(true)
    }

    /// Take one point away from a specific side.
    pub fn decrement_score(&mut self, side: Side) -> Result<(), MatchError> {
        if self.is_completed {
            return Err(MatchError::AlreadyCompleted);
        }
        if self.score_of(side) == 0 {
            return Err(MatchError::NoPointsToUndo);
        }

        self.remove_point(side);
        self.total_rallies = self.total_rallies.saturating_sub(1);
        self.rebuild_after_removal();
        Ok(())
    }

    fn rebuild_after_removal(&mut self) {
        if self.total_rallies == 0 {
            self.restore_start_positions();
            return;
        }

        self.refresh_court();
        if self.configuration.team_size == TeamSize::Singles {
            let starter = self.configuration.starting_side;
            self.serving_side = if self.combined_score() % 2 == 0 {
                starter
            } else {
                starter.opponent()
            };
        }
        self.lifecycle = Lifecycle::Serving;
    }
}
