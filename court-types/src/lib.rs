//! # court-types
//!
//! Shared vocabulary for the Courtside racket-sport match engine.
//!
//! This crate provides the foundational types used across all Courtside crates:
//! - [`Side`], [`ServePosition`], [`Lifecycle`], [`TeamSize`], [`ServerIndex`] - Court vocabulary
//! - [`MatchId`], [`DeviceId`], [`Sequence`] - Identity and ordering types
//! - [`Delta`], [`DeltaEnvelope`] - Synchronization deltas and their wire wrapper
//! - [`MatchError`], [`WireError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod court;
mod delta;
mod envelope;
mod error;
mod ids;

pub use court::{Lifecycle, ServePosition, ServerIndex, Side, TeamSize};
pub use delta::Delta;
pub use envelope::{DeltaEnvelope, ENVELOPE_VERSION};
pub use error::{MatchError, WireError};
pub use ids::{DeviceId, MatchId, Sequence};
