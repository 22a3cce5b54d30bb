//! Shared coordination store.
//!
//! The fleet coordinates through a small key-value store that offers an
//! atomic increment on a named counter and get/put of opaque blobs. The
//! worker only ever talks to it through [`CoordinationStore`], so tests can
//! swap in [`MemoryStore`] for the real Redis-backed client.

pub mod memory;
#[cfg(feature = "redis-store")]
pub mod redis;

pub use memory::MemoryStore;
#[cfg(feature = "redis-store")]
pub use self::redis::RedisStore;

use crate::error::WorkerError;

/// Key of the fleet-wide worker counter.
pub const WORKER_COUNTER_KEY: &str = "worker-counter";

/// Key under which the learner publishes the replay-state table.
pub const REPLAY_STATES_KEY: &str = "replay-arrays";

/// Minimal store contract the worker needs at startup.
///
/// Implementations must make `incr` linearizable across every process that
/// shares the store; callers add no locking of their own.
pub trait CoordinationStore: Send + Sync {
    /// Atomically increments the integer at `key` (missing counts as 0) and
    /// returns the new value.
    fn incr(&self, key: &str) -> Result<i64, WorkerError>;

    /// Fetches the blob stored at `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, WorkerError>;

    /// Stores `value` at `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), WorkerError>;
}
