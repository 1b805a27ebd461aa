// SPDX-License-Identifier: MIT

//! The per-project merge lock, held as a scoped resource with guaranteed
//! release: whatever happens inside a merge transaction — success, an
//! early return, a panic unwind — `Drop` releases the lock exactly once.

use std::sync::Arc;

use cadence_core::ProjectId;
use cadence_store::Store;

/// Acquired via [`acquire`]. Held for the duration of a merge transaction;
/// dropping it schedules the release on the store, detached from the
/// guard's own (possibly panicking) stack frame.
pub struct MergeLockGuard {
    store: Arc<dyn Store>,
    project_id: ProjectId,
    released: bool,
}

impl MergeLockGuard {
    /// Releases the lock immediately rather than waiting for `Drop`, so a
    /// caller on the success path can observe any store error.
    pub async fn release(mut self) -> cadence_store::StoreResult<()> {
        self.released = true;
        self.store.release_merge_lock(&self.project_id).await
    }
}

impl Drop for MergeLockGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let store = Arc::clone(&self.store);
        let project_id = self.project_id;
        tokio::spawn(async move {
            if let Err(e) = store.release_merge_lock(&project_id).await {
                tracing::error!(%project_id, error = %e, "failed to release merge lock on drop");
            }
        });
    }
}

/// Attempts to acquire the per-project merge lock. Returns `None` if
/// another merge is already in progress.
pub async fn acquire(store: Arc<dyn Store>, project_id: ProjectId) -> cadence_store::StoreResult<Option<MergeLockGuard>> {
    if store.try_acquire_merge_lock(&project_id).await? {
        Ok(Some(MergeLockGuard { store, project_id, released: false }))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
