//! CLI command implementations.

pub mod archive;
pub mod list;
pub mod new;
pub mod play;
pub mod replay;
pub mod status;

use anyhow::{Context, Result};
use court_core::{Clock, MatchId, MatchKernel, MatchRecord, MatchStore, SystemClock};
use std::path::Path;

use crate::config;
use crate::store::FileStore;

/// Load the kernel for `explicit` or the current match.
pub(crate) fn open(data_dir: &Path, explicit: Option<MatchId>) -> Result<(FileStore, MatchKernel)> {
    let id = config::resolve_match(data_dir, explicit)?;
    let store = FileStore::open(data_dir).context("Failed to open match store")?;
    let record = store
        .get(&id)
        .with_context(|| format!("Failed to load match {id}"))?;
    Ok((store, record.into_kernel(SystemClock)))
}

/// Persist the kernel.
pub(crate) fn save(store: &mut FileStore, kernel: &MatchKernel) -> Result<()> {
    store
        .save(MatchRecord::from_kernel(kernel, SystemClock.now()))
        .with_context(|| format!("Failed to save match {}", kernel.id()))
}
