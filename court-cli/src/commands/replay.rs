//! Replay a file of deltas against a match.

use anyhow::{Context, Result};
use court_core::{Delta, MatchId, MatchKernel};
use std::path::Path;

use crate::commands::{open, save, status};

/// Outcome of a replay.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Deltas the kernel accepted.
    pub applied: usize,
    /// Rejected deltas: position in the file and reason.
    pub rejected: Vec<(usize, String)>,
}

/// Feed `deltas` through the kernel in order. Rejections are collected, not fatal.
pub fn apply_all(kernel: &mut MatchKernel, deltas: &[Delta]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    for (i, delta) in deltas.iter().enumerate() {
        match kernel.apply_delta(delta) {
            Ok(()) => summary.applied += 1,
            Err(e) => summary.rejected.push((i, format!("{}: {e}", delta.kind()))),
        }
    }
    summary
}

/// Run the replay command. `file` holds a JSON array of deltas.
pub fn run(data_dir: &Path, match_id: Option<MatchId>, file: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let deltas: Vec<Delta> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse deltas in {}", file.display()))?;

    let (mut store, mut kernel) = open(data_dir, match_id)?;
    let summary = apply_all(&mut kernel, &deltas);
    save(&mut store, &kernel)?;

    println!("Applied {} of {} deltas", summary.applied, deltas.len());
    for (i, reason) in &summary.rejected {
        println!("  #{i} rejected ({reason})");
    }
    println!();
    print!("{}", status::render(&kernel));
    Ok(())
}
