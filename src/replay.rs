//! Replay-state table.
//!
//! The learner publishes a table of recorded game states, one entry per match
//! format, that workers use to seed match starting positions. The table is
//! stored as MessagePack under [`REPLAY_STATES_KEY`]: a sequence of entries,
//! each a sequence of state rows of `f32`. Entry `k` serves team size `k + 1`.

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::WorkerError;
use crate::schedule::TeamSize;
use crate::store::{CoordinationStore, REPLAY_STATES_KEY};

/// Recorded starting states for one match format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplayStates {
    rows: Vec<Vec<f32>>,
}

impl ReplayStates {
    pub fn new(rows: Vec<Vec<f32>>) -> Self {
        ReplayStates { rows }
    }

    pub fn rows(&self) -> &[Vec<f32>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Draws one starting state uniformly. `None` when the entry is empty.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<&[f32]> {
        if self.rows.is_empty() {
            return None;
        }
        let i = rng.gen_range(0..self.rows.len());
        Some(&self.rows[i])
    }
}

/// Starting states for every published match format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplayStateTable {
    entries: Vec<ReplayStates>,
}

impl ReplayStateTable {
    /// Builds a table from per-format entries, 1v1 first.
    pub fn new(entries: Vec<ReplayStates>) -> Self {
        ReplayStateTable { entries }
    }

    /// Number of formats the table covers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the entry for `size`.
    pub fn get(&self, size: TeamSize) -> Result<&ReplayStates, WorkerError> {
        self.entries.get(size.slot()).ok_or_else(|| {
            WorkerError::KeyNotFound(format!(
                "replay states for {} (table has {} entries)",
                size,
                self.entries.len()
            ))
        })
    }

    pub fn from_blob(blob: &[u8]) -> Result<Self, WorkerError> {
        rmp_serde::from_slice(blob).map_err(|e| WorkerError::Decode(e.to_string()))
    }

    pub fn to_blob(&self) -> Result<Vec<u8>, WorkerError> {
        rmp_serde::to_vec(self).map_err(|e| WorkerError::Encode(e.to_string()))
    }
}

/// Fetches and decodes the published table.
pub fn fetch_replay_table<S: CoordinationStore + ?Sized>(
    store: &S,
) -> Result<ReplayStateTable, WorkerError> {
    let blob = store
        .get(REPLAY_STATES_KEY)?
        .ok_or_else(|| WorkerError::KeyNotFound(format!("store key '{}'", REPLAY_STATES_KEY)))?;
    debug!("fetched {} bytes of replay states", blob.len());
    let table = ReplayStateTable::from_blob(&blob)?;
    info!("loaded replay states for {} match formats", table.len());
    Ok(table)
}

/// Publishes `table` for workers to fetch.
pub fn publish_replay_table<S: CoordinationStore + ?Sized>(
    store: &S,
    table: &ReplayStateTable,
) -> Result<(), WorkerError> {
    store.set(REPLAY_STATES_KEY, &table.to_blob()?)
}
