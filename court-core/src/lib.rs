//! # court-core
//!
//! Pure rules kernel for Courtside (no I/O, instant tests).
//!
//! This crate tracks score, serving rotation, court ends and completion for
//! a two-sided racket-sport match with one or two players per side.
//!
//! ## Design Philosophy
//!
//! Every rule lives on [`MatchState`] as a synchronous, O(1) operation that
//! checks all of its preconditions before writing anything. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic replay (same deltas in the same order → same state)
//! - Safe retries (a rejected call leaves the state exactly as it was)
//!
//! [`MatchKernel`] wraps one state with an injected [`Clock`] and is what a
//! session layer holds. Storage and delta transport live outside this crate
//! behind [`MatchStore`] and [`OrderedApplier`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod applier;
pub mod clock;
pub mod completion;
pub mod config;
pub mod correction;
pub mod fault;
pub mod kernel;
pub mod lifecycle;
pub mod scoring;
pub mod state;
pub mod store;
pub mod undo;

pub use applier::{ApplyReport, OrderedApplier, Receipt};
pub use clock::{Clock, FixedClock, SystemClock};
pub use completion::is_winning_score;
pub use config::{MatchConfiguration, SideSwitchPolicy, DEFAULT_SWITCH_AT, DEFAULT_WINNING_SCORE};
pub use kernel::MatchKernel;
pub use state::MatchState;
pub use store::{MatchRecord, MatchStore, MemoryStore, StoreError};

pub use court_types::{
    Delta, DeltaEnvelope, DeviceId, Lifecycle, MatchError, MatchId, Sequence, ServePosition,
    ServerIndex, Side, TeamSize,
};
