//! Service fault rotation.

use court_types::{Lifecycle, MatchError, ServerIndex, TeamSize};

use crate::MatchState;

impl MatchState {
    /// Pass the serve after a service fault.
    ///
    /// Singles: the other side serves. Doubles: the opening side gets a
    /// single server before the first side-out; after that the first server
    /// hands to the partner and the second server hands to the opponents.
    ///
    /// Scores and rallies are untouched.
    pub fn handle_fault(&mut self) -> Result<(), MatchError> {
        if self.is_completed {
            return Err(MatchError::AlreadyCompleted);
        }
        if self.lifecycle == Lifecycle::Paused {
            return Err(MatchError::PausedStateViolation);
        }

        match self.configuration.team_size {
            TeamSize::Singles => {
                self.serving_side = self.serving_side.opponent();
            }
            TeamSize::Doubles if self.is_first_service_sequence => {
                self.side_out();
            }
            TeamSize::Doubles => {
                if self.server_index == ServerIndex::FIRST {
                    self.server_index = ServerIndex::SECOND;
                } else {
                    self.side_out();
                }
            }
        }
        self.is_first_service_sequence = false;

        if matches!(self.lifecycle, Lifecycle::Initial | Lifecycle::Playing) {
            self.lifecycle = Lifecycle::Serving;
        }
        Ok(())
    }

    fn side_out(&mut self) {
        self.serving_side = self.serving_side.opponent();
        self.server_index = ServerIndex::FIRST;
    }
}
