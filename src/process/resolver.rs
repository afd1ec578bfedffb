//! Process handle resolution with scoped or cached handle lifetimes

use super::cache::HandleCache;
use super::handle::ProcessHandle;
use crate::core::types::{MemoryResult, ProcessId};
use std::sync::PoisonError;
use tracing::debug;

/// Resolves process ids to handles and scopes their use.
///
/// Without a cache every call opens a fresh handle and closes it before
/// returning. With a cache, handles are reused and evicted as soon as an
/// operation through them reports `HandleInvalid`.
#[derive(Default)]
pub struct HandleResolver {
    cache: Option<HandleCache>,
}

impl HandleResolver {
    /// Resolver that opens and closes a handle per call
    pub fn scoped() -> Self {
        HandleResolver { cache: None }
    }

    /// Resolver that keeps up to `max_entries` handles open
    pub fn cached(max_entries: usize) -> Self {
        HandleResolver {
            cache: Some(HandleCache::new(max_entries)),
        }
    }

    /// Opens a new, caller-owned handle for `pid`
    pub fn resolve(&self, pid: ProcessId) -> MemoryResult<ProcessHandle> {
        ProcessHandle::open(pid)
    }

    /// Runs `f` with a handle for `pid`.
    ///
    /// Resolution errors are returned before `f` runs.
    pub fn with_handle<T, F>(&self, pid: ProcessId, f: F) -> MemoryResult<T>
    where
        F: FnOnce(&ProcessHandle) -> MemoryResult<T>,
    {
        let Some(cache) = &self.cache else {
            let handle = self.resolve(pid)?;
            return f(&handle);
        };

        let shared = cache.get_or_open(pid)?;
        let result = {
            let handle = shared.lock().unwrap_or_else(PoisonError::into_inner);
            f(&handle)
        };

        if let Err(err) = &result {
            if err.invalidates_handle() {
                debug!(pid, error = %err, "evicting stale handle");
                cache.invalidate(pid);
            }
        }
        result
    }

    /// The handle cache, when caching is enabled
    pub fn cache(&self) -> Option<&HandleCache> {
        self.cache.as_ref()
    }
}
