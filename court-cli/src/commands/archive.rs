//! Archive or restore a match.

use anyhow::{Context, Result};
use court_core::{MatchId, MatchStore};
use std::path::Path;

use crate::config;
use crate::store::FileStore;

/// Run the archive command.
pub fn run(data_dir: &Path, match_id: Option<MatchId>, archived: bool) -> Result<()> {
    let id = config::resolve_match(data_dir, match_id)?;
    let mut store = FileStore::open(data_dir).context("Failed to open match store")?;
    store
        .set_archived(&id, archived)
        .with_context(|| format!("Failed to update match {id}"))?;

    if archived {
        println!("Archived match {id}");
    } else {
        println!("Restored match {id}");
    }
    Ok(())
}
