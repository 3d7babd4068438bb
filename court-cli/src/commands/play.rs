//! In-match commands: rallies, faults, corrections and lifecycle.

use anyhow::{Context, Result};
use court_core::{MatchId, MatchKernel, MatchError, Side};
use std::path::Path;
use std::time::Duration;

use crate::commands::{open, save, status};

/// One operator action against a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Rally won by a side.
    Point(Side),
    /// Service fault by the serving team.
    Fault,
    /// Undo the most recent point.
    Undo,
    /// Take one point from a side.
    Decrement(Side),
    /// Suspend play.
    Pause,
    /// Resume play.
    Resume,
    /// End the match now.
    Complete,
    /// Back to 0-0.
    Reset,
    /// Set the serving side, or hand it over when `None`.
    ServingSide(Option<Side>),
    /// Set the serving partner, or swap partners when `None`.
    Server(Option<u8>),
    /// Record the match clock.
    Clock {
        /// Elapsed playing time in seconds.
        secs: u64,
        /// Whether the clock is running.
        running: bool,
    },
}

impl Action {
    fn describe(&self) -> &'static str {
        match self {
            Action::Point(_) => "award point",
            Action::Fault => "record fault",
            Action::Undo => "undo",
            Action::Decrement(_) => "remove point",
            Action::Pause => "pause",
            Action::Resume => "resume",
            Action::Complete => "complete match",
            Action::Reset => "reset match",
            Action::ServingSide(_) => "change serving side",
            Action::Server(_) => "change server",
            Action::Clock { .. } => "set match clock",
        }
    }

    /// Apply to a kernel. `Ok(false)` means nothing changed.
    pub fn apply(self, kernel: &mut MatchKernel) -> Result<bool, MatchError> {
        match self {
            Action::Point(side) => kernel.apply_point(side)?,
            Action::Fault => kernel.handle_fault()?,
            Action::Undo => return kernel.undo_last_point(),
            Action::Decrement(side) => kernel.decrement_score(side)?,
            Action::Pause => kernel.pause()?,
            Action::Resume => kernel.resume()?,
            Action::Complete => kernel.complete()?,
            Action::Reset => kernel.reset()?,
            Action::ServingSide(Some(side)) => kernel.set_serving_side(side)?,
            Action::ServingSide(None) => kernel.switch_serving_side()?,
            Action::Server(Some(index)) => kernel.set_server_index(index)?,
            Action::Server(None) => kernel.switch_server_index()?,
            Action::Clock { secs, running } => {
                kernel.set_elapsed_time(Duration::from_secs(secs), running)?
            }
        }
        Ok(true)
    }
}

/// Run one action against the selected match and save the result.
pub fn run(data_dir: &Path, match_id: Option<MatchId>, action: Action) -> Result<()> {
    let (mut store, mut kernel) = open(data_dir, match_id)?;

    let changed = action
        .apply(&mut kernel)
        .with_context(|| format!("Cannot {}", action.describe()))?;
    if !changed {
        println!("Nothing to undo.");
        return Ok(());
    }

    save(&mut store, &kernel)?;
    print!("{}", status::render(&kernel));
    Ok(())
}
