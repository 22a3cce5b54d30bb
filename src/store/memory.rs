//! In-process coordination store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::CoordinationStore;
use crate::error::WorkerError;

/// A [`CoordinationStore`] held entirely in memory.
///
/// Values are kept as raw bytes and counters as their decimal text, the same
/// representation Redis uses, so a blob written by `incr` reads back the way
/// it would from the real store. A single mutex serializes every command.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    offline: AtomicBool,
    commands: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every command fails as if the host were down.
    pub fn unreachable() -> Self {
        let store = Self::default();
        store.offline.store(true, Ordering::SeqCst);
        store
    }

    /// Takes the store offline (or back online) for subsequent commands.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of commands issued against the store, including failed ones.
    pub fn command_count(&self) -> usize {
        self.commands.load(Ordering::SeqCst)
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>, WorkerError> {
        self.commands.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(WorkerError::Connection("memory store is offline".into()));
        }
        self.entries
            .lock()
            .map_err(|_| WorkerError::Connection("memory store lock poisoned".into()))
    }
}

impl CoordinationStore for MemoryStore {
    fn incr(&self, key: &str) -> Result<i64, WorkerError> {
        let mut entries = self.entries()?;
        let current = match entries.get(key) {
            Some(raw) => std::str::from_utf8(raw)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or_else(|| {
                    WorkerError::Connection(format!("value at '{}' is not an integer", key))
                })?,
            None => 0,
        };
        let next = current + 1;
        entries.insert(key.to_string(), next.to_string().into_bytes());
        Ok(next)
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, WorkerError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), WorkerError> {
        self.entries()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
