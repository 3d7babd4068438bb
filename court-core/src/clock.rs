//! Wall-clock source for completion timestamps.
//!
//! The rule modules take the current time as an argument; only
//! [`MatchKernel`](crate::MatchKernel) asks a [`Clock`] for it. Tests inject
//! a [`FixedClock`] so replays produce byte-identical state.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of Unix timestamps (seconds).
pub trait Clock {
    /// Current time in Unix seconds.
    fn now(&self) -> u64;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}
