//! Persistence boundary.
//!
//! The kernel never touches storage. Whatever persists matches (files, a
//! database, a mobile key-value store) implements [`MatchStore`] and moves
//! [`MatchRecord`]s in and out of it.

use court_types::MatchId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::{Clock, MatchKernel, MatchState};

/// Storage layer errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record with this id.
    #[error("match not found: {0}")]
    NotFound(MatchId),

    /// The backend failed to read or write.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored record could not be decoded.
    #[error("corrupt match record {id}: {reason}")]
    Corrupt {
        /// Record that failed to decode.
        id: String,
        /// Decoder message.
        reason: String,
    },
}

/// Everything needed to bring a match back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Match id.
    pub id: MatchId,
    /// Kernel state.
    pub state: MatchState,
    /// Match clock in milliseconds.
    pub elapsed_ms: u64,
    /// Whether the match clock was running.
    #[serde(default)]
    pub clock_running: bool,
    /// Hidden from active listings. Owned by the store.
    #[serde(default)]
    pub archived: bool,
    /// Unix seconds of the last save.
    pub updated_at: u64,
}

impl MatchRecord {
    /// Snapshot a kernel.
    pub fn from_kernel<C: Clock>(kernel: &MatchKernel<C>, updated_at: u64) -> Self {
        Self {
            id: kernel.id(),
            state: kernel.state().clone(),
            elapsed_ms: u64::try_from(kernel.elapsed().as_millis()).unwrap_or(u64::MAX),
            clock_running: kernel.is_clock_running(),
            archived: false,
            updated_at,
        }
    }

    /// Rebuild a kernel from this record.
    pub fn into_kernel<C: Clock>(self, clock: C) -> MatchKernel<C> {
        MatchKernel::from_parts(
            self.id,
            self.state,
            Duration::from_millis(self.elapsed_ms),
            self.clock_running,
            clock,
        )
    }
}

/// Trait for match storage backends.
///
/// The `archived` flag belongs to the store: `save` keeps the stored flag
/// when it replaces an existing record, and only
/// [`set_archived`](Self::set_archived) changes it.
pub trait MatchStore {
    /// Insert or replace a record.
    fn save(&mut self, record: MatchRecord) -> Result<(), StoreError>;

    /// Fetch a record, `None` if absent.
    fn load(&self, id: &MatchId) -> Result<Option<MatchRecord>, StoreError>;

    /// Ids of all stored records, archived ones included.
    fn list(&self) -> Result<Vec<MatchId>, StoreError>;

    /// Remove a record. Returns whether it existed.
    fn delete(&mut self, id: &MatchId) -> Result<bool, StoreError>;

    /// Change the archived flag of an existing record.
    fn set_archived(&mut self, id: &MatchId, archived: bool) -> Result<(), StoreError>;

    /// Fetch a record that must exist.
    fn get(&self, id: &MatchId) -> Result<MatchRecord, StoreError> {
        self.load(id)?.ok_or(StoreError::NotFound(*id))
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: BTreeMap<MatchId, MatchRecord>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl MatchStore for MemoryStore {
    fn save(&mut self, mut record: MatchRecord) -> Result<(), StoreError> {
        if let Some(existing) = self.records.get(&record.id) {
            record.archived = existing.archived;
        }
        self.records.insert(record.id, record);
        Ok(())
    }

    fn load(&self, id: &MatchId) -> Result<Option<MatchRecord>, StoreError> {
        Ok(self.records.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<MatchId>, StoreError> {
        Ok(self.records.keys().copied().collect())
    }

    fn delete(&mut self, id: &MatchId) -> Result<bool, StoreError> {
        Ok(self.records.remove(id).is_some())
    }

    fn set_archived(&mut self, id: &MatchId, archived: bool) -> Result<(), StoreError> {
        let record = self.records.get_mut(id).ok_or(StoreError::NotFound(*id))?;
        record.archived = archived;
        Ok(())
    }
}
