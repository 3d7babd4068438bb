//! File-backed match store.
//!
//! One pretty-printed JSON record per match under `<data-dir>/matches/`.

use court_core::{MatchId, MatchRecord, MatchStore, StoreError};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::matches_dir;

/// Stores each [`MatchRecord`] as `<id>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the store under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        let dir = matches_dir(data_dir);
        std::fs::create_dir_all(&dir).map_err(backend)?;
        Ok(Self { dir })
    }

    fn path_for(&self, id: &MatchId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn write(&self, record: &MatchRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(record).map_err(encode_failed)?;
        // Atomic replace.
        let tmp = self.dir.join(format!("{}.json.tmp", record.id));
        std::fs::write(&tmp, json).map_err(backend)?;
        std::fs::rename(&tmp, self.path_for(&record.id)).map_err(backend)?;
        debug!(match_id = %record.id, archived = record.archived, "match record written");
        Ok(())
    }
}

fn backend(e: std::io::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn encode_failed(e: serde_json::Error) -> StoreError {
    StoreError::Backend(format!("failed to encode match record: {e}"))
}

impl MatchStore for FileStore {
    fn save(&mut self, mut record: MatchRecord) -> Result<(), StoreError> {
        if let Some(existing) = self.load(&record.id)? {
            record.archived = existing.archived;
        }
        self.write(&record)
    }

    fn load(&self, id: &MatchId) -> Result<Option<MatchRecord>, StoreError> {
        let path = self.path_for(id);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(backend(e)),
        };
        let record = serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt {
            id: id.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(record))
    }

    fn list(&self) -> Result<Vec<MatchId>, StoreError> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(backend)? {
            let path = entry.map_err(backend)?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            // Stray files are skipped, not fatal.
            if let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<MatchId>().ok())
            {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn delete(&mut self, id: &MatchId) -> Result<bool, StoreError> {
        match std::fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(backend(e)),
        }
    }

    fn set_archived(&mut self, id: &MatchId, archived: bool) -> Result<(), StoreError> {
        let mut record = self.get(id)?;
        record.archived = archived;
        self.write(&record)
    }
}
