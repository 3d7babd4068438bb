//! List stored matches.

use anyhow::{Context, Result};
use court_core::{Lifecycle, MatchRecord, MatchStore};
use std::path::Path;

use crate::config;
use crate::store::FileStore;

/// Run the list command. Archived matches only show with `all`.
pub fn run(data_dir: &Path, all: bool) -> Result<()> {
    let store = FileStore::open(data_dir).context("Failed to open match store")?;
    let current = config::current(data_dir)?;
    let records = visible(&store, all)?;

    if records.is_empty() {
        println!("No matches. Run 'court new' to start one.");
        return Ok(());
    }
    for record in records {
        let marker = if Some(record.id) == current { "*" } else { " " };
        let archived = if record.archived { " [archived]" } else { "" };
        println!(
            "{marker} {}  A {:>2} - {:<2} B  {}{archived}",
            record.id,
            record.state.score_a(),
            record.state.score_b(),
            if record.state.lifecycle() == Lifecycle::Completed {
                "done"
            } else {
                "live"
            },
        );
    }
    Ok(())
}

/// Records to show, most recently updated first.
pub fn visible(store: &FileStore, all: bool) -> Result<Vec<MatchRecord>> {
    let mut records = Vec::new();
    for id in store.list()? {
        let record = store.get(&id)?;
        if all || !record.archived {
            records.push(record);
        }
    }
    records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::new::{self, NewOptions};
    use tempfile::tempdir;

    #[test]
    fn list_empty_store() {
        let dir = tempdir().unwrap();
        assert!(run(dir.path(), false).is_ok());
    }

    #[test]
    fn archived_matches_are_hidden() {
        let dir = tempdir().unwrap();
        let kept = new::run(dir.path(), &NewOptions::default()).unwrap();
        let hidden = new::run(dir.path(), &NewOptions::default()).unwrap();

        let mut store = FileStore::open(dir.path()).unwrap();
        store.set_archived(&hidden, true).unwrap();

        let shown: Vec<_> = visible(&store, false).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(shown, vec![kept]);
        assert_eq!(visible(&store, true).unwrap().len(), 2);
        assert!(run(dir.path(), true).is_ok());
    }
}
