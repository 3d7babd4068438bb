//! Per-match kernel.
//!
//! [`MatchKernel`] is the object the session layer holds for a live match:
//! it owns the [`MatchState`], the match clock reported by the timing
//! device and an injected [`Clock`]. Every event, local or replayed from
//! another device, goes through one of its methods, and each method either
//! succeeds or returns a [`MatchError`] with the state untouched.

use court_types::{Delta, Lifecycle, MatchError, MatchId, Side};
use std::time::Duration;
use tracing::{debug, info};

use crate::{Clock, MatchConfiguration, MatchState, SystemClock};

/// One live match.
#[derive(Debug, Clone)]
pub struct MatchKernel<C: Clock = SystemClock> {
    id: MatchId,
    state: MatchState,
    elapsed: Duration,
    clock_running: bool,
    clock: C,
}

impl MatchKernel<SystemClock> {
    /// Start a new match on the system clock.
    pub fn new(configuration: MatchConfiguration) -> Result<Self, MatchError> {
        Self::with_clock(MatchId::new(), configuration, SystemClock)
    }
}

impl<C: Clock> MatchKernel<C> {
    /// Start a new match with an explicit id and clock.
    pub fn with_clock(
        id: MatchId,
        configuration: MatchConfiguration,
        clock: C,
    ) -> Result<Self, MatchError> {
        let state = MatchState::new(configuration)?;
        debug!(match_id = %id, "match created");
        Ok(Self {
            id,
            state,
            elapsed: Duration::ZERO,
            clock_running: false,
            clock,
        })
    }

    /// Rebuild a kernel around previously stored state.
    pub fn from_parts(
        id: MatchId,
        state: MatchState,
        elapsed: Duration,
        clock_running: bool,
        clock: C,
    ) -> Self {
        Self {
            id,
            state,
            elapsed,
            clock_running,
            clock,
        }
    }

    /// Match id.
    pub fn id(&self) -> MatchId {
        self.id
    }

    /// Current state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Last playing time reported by the timing device.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Whether the match clock was last reported running.
    pub fn is_clock_running(&self) -> bool {
        self.clock_running
    }

    /// Award a rally to `side`.
    pub fn apply_point(&mut self, side: Side) -> Result<(), MatchError> {
        self.apply_point_at(side, self.clock.now())
    }

    fn apply_point_at(&mut self, side: Side, now: u64) -> Result<(), MatchError> {
        let was_completed = self.state.is_completed();
        let result = self.state.apply_point(side, now, self.elapsed);
        self.trace("apply_point", was_completed, result)
    }

    /// Pass the serve after a service fault.
    pub fn handle_fault(&mut self) -> Result<(), MatchError> {
        let result = self.state.handle_fault();
        self.trace("handle_fault", false, result)
    }

    /// Suspend play.
    pub fn pause(&mut self) -> Result<(), MatchError> {
        let result = self.state.pause();
        self.trace("pause", false, result)
    }

    /// Resume after a pause.
    pub fn resume(&mut self) -> Result<(), MatchError> {
        let result = self.state.resume();
        self.trace("resume", false, result)
    }

    /// End the match now.
    pub fn complete(&mut self) -> Result<(), MatchError> {
        let result = self.state.complete(self.clock.now());
        self.trace("complete", false, result)
    }

    /// Back to 0-0 under the same rules. The match clock restarts too.
    pub fn reset(&mut self) -> Result<(), MatchError> {
        let result = self.state.reset();
        if result.is_ok() {
            self.elapsed = Duration::ZERO;
            self.clock_running = false;
        }
        self.trace("reset", false, result)
    }

    /// Heuristic undo of the last point; `Ok(false)` when nothing was played.
    pub fn undo_last_point(&mut self) -> Result<bool, MatchError> {
        let result = self.state.undo_last_point();
        self.trace("undo_last_point", false, result)
    }

    /// Take one point away from `side`.
    pub fn decrement_score(&mut self, side: Side) -> Result<(), MatchError> {
        let result = self.state.decrement_score(side);
        self.trace("decrement_score", false, result)
    }

    /// Hand the serve to the other side.
    pub fn switch_serving_side(&mut self) -> Result<(), MatchError> {
        let result = self.state.switch_serving_side();
        self.trace("switch_serving_side", false, result)
    }

    /// Set the serving side.
    pub fn set_serving_side(&mut self, side: Side) -> Result<(), MatchError> {
        let result = self.state.set_serving_side(side);
        self.trace("set_serving_side", false, result)
    }

    /// Hand the serve to the partner (doubles).
    pub fn switch_server_index(&mut self) -> Result<(), MatchError> {
        let result = self.state.switch_server_index();
        self.trace("switch_server_index", false, result)
    }

    /// Set the serving partner (doubles).
    pub fn set_server_index(&mut self, value: u8) -> Result<(), MatchError> {
        let result = self.state.set_server_index(value);
        self.trace("set_server_index", false, result)
    }

    /// Move to a lifecycle state through the matching operation.
    pub fn set_lifecycle(&mut self, target: Lifecycle) -> Result<(), MatchError> {
        self.set_lifecycle_at(target, self.clock.now())
    }

    fn set_lifecycle_at(&mut self, target: Lifecycle, now: u64) -> Result<(), MatchError> {
        if target == Lifecycle::Initial {
            return self.reset();
        }
        let was_completed = self.state.is_completed();
        let result = self.state.set_lifecycle(target, now);
        self.trace("set_lifecycle", was_completed, result)
    }

    /// Record the match clock; ends the match once a time limit is reached.
    pub fn set_elapsed_time(&mut self, elapsed: Duration, running: bool) -> Result<(), MatchError> {
        self.set_elapsed_time_at(elapsed, running, self.clock.now())
    }

    fn set_elapsed_time_at(
        &mut self,
        elapsed: Duration,
        running: bool,
        now: u64,
    ) -> Result<(), MatchError> {
        if self.state.is_completed() {
            return self.trace("set_elapsed_time", true, Err(MatchError::AlreadyCompleted));
        }
        self.elapsed = elapsed;
        self.clock_running = running;

        let time_up = self
            .state
            .configuration()
            .time_limit
            .is_some_and(|limit| elapsed >= limit);
        if time_up {
            self.state.finish(now);
        }
        self.trace("set_elapsed_time", false, Ok(()))
    }

    /// Apply a locally produced delta, stamped by this kernel's clock.
    pub fn apply_delta(&mut self, delta: &Delta) -> Result<(), MatchError> {
        self.apply_delta_at(delta, self.clock.now())
    }

    /// Replay one delta through the operation it names.
    ///
    /// `now` (Unix seconds) is the sender's timestamp and becomes
    /// `completed_at` if the delta ends the match, so every device that
    /// replays the same envelopes records the same completion time.
    pub fn apply_delta_at(&mut self, delta: &Delta, now: u64) -> Result<(), MatchError> {
        match *delta {
            Delta::Score { side } => self.apply_point_at(side, now),
            Delta::DecrementScore { side } => self.decrement_score(side),
            Delta::SetServingSide { side } => self.set_serving_side(side),
            Delta::SetServerIndex { index } => self.set_server_index(index),
            Delta::SetLifecycle { lifecycle } => self.set_lifecycle_at(lifecycle, now),
            Delta::SetElapsedTime {
                elapsed_ms,
                running,
            } => self.set_elapsed_time_at(Duration::from_millis(elapsed_ms), running, now),
            Delta::Fault => self.handle_fault(),
            Delta::Undo => self.undo_last_point().map(|_| ()),
        }
    }

    /// Whether the match should end at the current score and clock.
    pub fn should_complete(&self) -> bool {
        self.state.should_complete(self.elapsed)
    }

    /// Whether one more point for `side` would win.
    pub fn is_at_match_point(&self, side: Side) -> bool {
        self.state.is_at_match_point(side)
    }

    fn trace<T>(
        &self,
        op: &'static str,
        was_completed: bool,
        result: Result<T, MatchError>,
    ) -> Result<T, MatchError> {
        match &result {
            Ok(_) => {
                debug!(
                    match_id = %self.id,
                    op,
                    score_a = self.state.score_a(),
                    score_b = self.state.score_b(),
                    serving = %self.state.serving_side(),
                    server = %self.state.server_index(),
                    lifecycle = ?self.state.lifecycle(),
                    "match updated"
                );
                if !was_completed && self.state.is_completed() {
                    info!(
                        match_id = %self.id,
                        score_a = self.state.score_a(),
                        score_b = self.state.score_b(),
                        winner = ?self.state.winner(),
                        "match completed"
                    );
                }
            }
            Err(e) => debug!(match_id = %self.id, op, error = %e, "operation rejected"),
        }
        result
    }
}
