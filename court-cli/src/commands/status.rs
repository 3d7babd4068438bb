//! Show the state of a match.

use anyhow::Result;
use court_core::{Clock, Lifecycle, MatchId, MatchKernel, ServePosition, Side};
use std::fmt::Write;
use std::path::Path;

use crate::commands::open;

/// Run the status command.
pub fn run(data_dir: &Path, match_id: Option<MatchId>) -> Result<()> {
    let (_, kernel) = open(data_dir, match_id)?;
    println!("Match {}", kernel.id());
    print!("{}", render(&kernel));
    Ok(())
}

/// Scoreboard text for a kernel.
pub fn render<C: Clock>(kernel: &MatchKernel<C>) -> String {
    let state = kernel.state();
    let config = state.configuration();
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "  Score:   A {} - {} B", state.score_a(), state.score_b());

    if state.is_completed() {
        let result = match state.winner() {
            Some(side) => format!("{side} wins"),
            None => "tied".to_string(),
        };
        let _ = writeln!(out, "  Result:  {result}");
    } else {
        let court = match state.serve_position() {
            ServePosition::Right => "right",
            ServePosition::Left => "left",
        };
        if config.is_doubles() {
            let _ = writeln!(
                out,
                "  Serving: {} (server {}, {court} court)",
                state.serving_side(),
                state.server_index()
            );
        } else {
            let _ = writeln!(out, "  Serving: {} ({court} court)", state.serving_side());
        }
        for side in [Side::A, Side::B] {
            if kernel.is_at_match_point(side) {
                let _ = writeln!(out, "  Match point: {side}");
            }
        }
    }

    let ends = if state.active_side() == Side::A {
        "starting ends"
    } else {
        "switched"
    };
    let _ = writeln!(out, "  Ends:    {ends}");
    let _ = writeln!(out, "  State:   {}", lifecycle_label(state.lifecycle()));
    let _ = writeln!(out, "  Rallies: {}", state.total_rallies());
    if kernel.elapsed() > std::time::Duration::ZERO || kernel.is_clock_running() {
        let secs = kernel.elapsed().as_secs();
        let running = if kernel.is_clock_running() { " (running)" } else { "" };
        let _ = writeln!(out, "  Clock:   {}:{:02}{running}", secs / 60, secs % 60);
    }
    out
}

fn lifecycle_label(lifecycle: Lifecycle) -> &'static str {
    match lifecycle {
        Lifecycle::Initial => "not started",
        Lifecycle::Serving => "serving",
        Lifecycle::Playing => "rally in play",
        Lifecycle::Paused => "paused",
        Lifecycle::Completed => "completed",
    }
}
