//! Operator corrections to the serve.
//!
//! Corrections are only accepted between rallies: never during play and
//! never after completion. Each one writes exactly the field it targets.

use court_types::{Lifecycle, MatchError, ServerIndex, Side, TeamSize};

use crate::MatchState;

impl MatchState {
    /// Hand the serve to the other side.
    pub fn switch_serving_side(&mut self) -> Result<(), MatchError> {
        self.check_manual_change(false)?;
        self.serving_side = self.serving_side.opponent();
        Ok(())
    }

    /// Set the serving side explicitly.
    pub fn set_serving_side(&mut self, side: Side) -> Result<(), MatchError> {
        self.check_manual_change(false)?;
        self.serving_side = side;
        Ok(())
    }

    /// Hand the serve to the partner (doubles only).
    pub fn switch_server_index(&mut self) -> Result<(), MatchError> {
        self.check_manual_change(true)?;
        self.server_index = self.server_index.other();
        Ok(())
    }

    /// Set the serving partner explicitly (doubles only, 1 or 2).
    pub fn set_server_index(&mut self, value: u8) -> Result<(), MatchError> {
        self.check_manual_change(true)?;
        self.server_index = ServerIndex::new(value)?;
        Ok(())
    }

    fn check_manual_change(&self, doubles_only: bool) -> Result<(), MatchError> {
        if self.is_completed {
            return Err(MatchError::AlreadyCompleted);
        }
        if self.lifecycle == Lifecycle::Playing {
            return Err(MatchError::ManualChangeDuringPlayViolation);
        }
        if doubles_only && self.configuration.team_size == TeamSize::Singles {
            return Err(MatchError::InvalidOperationForConfiguration);
        }
        Ok(())
    }
}
