//! Optional cache of open process handles
//!
//! Each cached handle sits behind its own `Mutex` so two reads never overlap
//! on the same handle, while reads against different processes proceed in
//! parallel. Entries are evicted on `HandleInvalid`, explicitly, or when the
//! cache is full.

use super::handle::ProcessHandle;
use crate::core::types::{MemoryResult, ProcessId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Handle shared between callers of the same cache
pub type SharedHandle = Arc<Mutex<ProcessHandle>>;

/// Map from process id to an open handle
pub struct HandleCache {
    entries: Mutex<HashMap<ProcessId, SharedHandle>>,
    max_entries: usize,
}

impl HandleCache {
    /// Create a new cache holding at most `max_entries` handles
    pub fn new(max_entries: usize) -> Self {
        HandleCache {
            entries: Mutex::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Returns the cached handle for `pid`, opening and caching one if absent
    pub fn get_or_open(&self, pid: ProcessId) -> MemoryResult<SharedHandle> {
        self.get_or_insert_with(pid, ProcessHandle::open)
    }

    fn get_or_insert_with<F>(&self, pid: ProcessId, open: F) -> MemoryResult<SharedHandle>
    where
        F: FnOnce(ProcessId) -> MemoryResult<ProcessHandle>,
    {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = entries.get(&pid) {
            return Ok(Arc::clone(handle));
        }

        let handle = Arc::new(Mutex::new(open(pid)?));

        if entries.len() >= self.max_entries {
            if let Some(&victim) = entries.keys().next() {
                entries.remove(&victim);
                debug!(pid = victim, "evicted cached handle to make room");
            }
        }

        entries.insert(pid, Arc::clone(&handle));
        debug!(pid, cached = entries.len(), "cached process handle");
        Ok(handle)
    }

    /// Drops the cached handle for `pid`, if any.
    ///
    /// The OS handle is closed once the last caller holding it finishes.
    pub fn invalidate(&self, pid: ProcessId) -> bool {
        let removed = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&pid)
            .is_some();
        if removed {
            debug!(pid, "invalidated cached handle");
        }
        removed
    }

    /// Drops every cached handle
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of cached handles
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a handle for `pid` is cached
    pub fn contains(&self, pid: ProcessId) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&pid)
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}
