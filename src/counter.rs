//! Worker identity allocation.
//!
//! Each worker takes the next value of a fleet-wide counter once, at startup.
//! The store's atomic increment is the only synchronization involved, so two
//! workers starting at the same instant still receive different indices.

use log::info;

use crate::error::WorkerError;
use crate::store::{CoordinationStore, WORKER_COUNTER_KEY};

/// Zero-based position of this worker in the fleet's startup order.
pub type WorkerIndex = u64;

/// Allocates this worker's index from the shared counter.
///
/// The counter holds the number of workers that have started so far, so the
/// first worker gets index 0. Indices from workers that die before playing a
/// match are never reused.
pub fn allocate_index<S: CoordinationStore + ?Sized>(store: &S) -> Result<WorkerIndex, WorkerError> {
    let count = store.incr(WORKER_COUNTER_KEY)?;
    if count < 1 {
        return Err(WorkerError::Connection(format!(
            "counter '{}' returned {} after increment",
            WORKER_COUNTER_KEY, count
        )));
    }
    let index = (count - 1) as WorkerIndex;
    info!("allocated worker index {}", index);
    Ok(index)
}
