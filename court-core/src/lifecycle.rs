//! Pause, resume, completion and reset.

use court_types::{Lifecycle, MatchError};

use crate::MatchState;

impl MatchState {
    /// Suspend play. Pausing an already paused match is a no-op.
    pub fn pause(&mut self) -> Result<(), MatchError> {
        if self.is_completed {
            return Err(MatchError::AlreadyCompleted);
        }
        self.lifecycle = Lifecycle::Paused;
        Ok(())
    }

    /// Leave a pause; play restarts with a serve.
    pub fn resume(&mut self) -> Result<(), MatchError> {
        if self.is_completed {
            return Err(MatchError::AlreadyCompleted);
        }
        if self.lifecycle != Lifecycle::Paused {
            return Err(MatchError::InvalidLifecycleTransition {
                from: self.lifecycle,
                to: Lifecycle::Serving,
            });
        }
        self.lifecycle = Lifecycle::Serving;
        Ok(())
    }

    /// End the match now, whatever the score.
    pub fn complete(&mut self, now: u64) -> Result<(), MatchError> {
        if self.is_completed {
            return Err(MatchError::AlreadyCompleted);
        }
        self.finish(now);
        Ok(())
    }

    /// Back to 0-0 under the same rules.
    pub fn reset(&mut self) -> Result<(), MatchError> {
        if self.is_completed {
            return Err(MatchError::AlreadyCompleted);
        }
        self.score_a = 0;
        self.score_b = 0;
        self.total_rallies = 0;
        self.completed_at = None;
        self.restore_start_positions();
        Ok(())
    }

    /// Move to `target` through the matching operation.
    ///
    /// Used when replaying `SetLifecycle` deltas from another device.
    pub fn set_lifecycle(&mut self, target: Lifecycle, now: u64) -> Result<(), MatchError> {
        match target {
            Lifecycle::Paused => self.pause(),
            Lifecycle::Completed => self.complete(now),
            Lifecycle::Initial => self.reset(),
            Lifecycle::Serving if self.lifecycle == Lifecycle::Paused => self.resume(),
            Lifecycle::Serving | Lifecycle::Playing => {
                if self.is_completed {
                    return Err(MatchError::AlreadyCompleted);
                }
                let at_rest = matches!(self.lifecycle, Lifecycle::Paused | Lifecycle::Initial);
                if at_rest && target == Lifecycle::Playing {
                    return Err(MatchError::InvalidLifecycleTransition {
                        from: self.lifecycle,
                        to: target,
                    });
                }
                self.lifecycle = target;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchConfiguration;
    use court_types::Side;
    use std::time::Duration;

    fn started() -> MatchState {
        let mut state = MatchState::new(MatchConfiguration::doubles()).unwrap();
        state.apply_point(Side::A, 0, Duration::ZERO).unwrap();
        state
    }

    #[test]
    fn pause_then_resume() {
        let mut state = started();
        state.pause().unwrap();
        assert_eq!(state.lifecycle(), Lifecycle::Paused);
        state.pause().unwrap();
        state.resume().unwrap();
        assert_eq!(state.lifecycle(), Lifecycle::Serving);
    }

    #[test]
    fn resume_without_pause_is_rejected() {
        let mut state = started();
        assert_eq!(
            state.resume(),
            Err(MatchError::InvalidLifecycleTransition {
                from: Lifecycle::Playing,
                to: Lifecycle::Serving,
            })
        );
    }

    #[test]
    fn complete_freezes_match() {
        let mut state = started();
        state.complete(42).unwrap();
        assert!(state.is_completed());
        assert_eq!(state.completed_at(), Some(42));
        assert_eq!(state.winner(), Some(Side::A));

        assert_eq!(state.complete(43), Err(MatchError::AlreadyCompleted));
        assert_eq!(state.pause(), Err(MatchError::AlreadyCompleted));
        assert_eq!(state.reset(), Err(MatchError::AlreadyCompleted));
        assert_eq!(state.completed_at(), Some(42));
    }

    #[test]
    fn reset_returns_to_start() {
        let mut state = started();
        state.handle_fault().unwrap();
        state.reset().unwrap();

        let fresh = MatchState::new(MatchConfiguration::doubles()).unwrap();
        assert_eq!(state, fresh);
    }

    #[test]
    fn set_lifecycle_dispatches() {
        let mut state = started();
        state.set_lifecycle(Lifecycle::Paused, 0).unwrap();
        assert_eq!(state.lifecycle(), Lifecycle::Paused);

        state.set_lifecycle(Lifecycle::Serving, 0).unwrap();
        assert_eq!(state.lifecycle(), Lifecycle::Serving);

        state.set_lifecycle(Lifecycle::Playing, 0).unwrap();
        assert_eq!(state.lifecycle(), Lifecycle::Playing);

        state.set_lifecycle(Lifecycle::Completed, 9).unwrap();
        assert!(state.is_completed());
    }

    #[test]
    fn set_lifecycle_cannot_jump_from_pause_into_play() {
        let mut state = started();
        state.pause().unwrap();
        let before = state.clone();
        assert!(state.set_lifecycle(Lifecycle::Playing, 0).is_err());
        assert_eq!(state, before);
    }
}
