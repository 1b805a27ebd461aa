// SPDX-License-Identifier: MIT

//! Per-job scratch directory: a stage's exclusive, ephemeral working copy.
//! Removed on drop whether the stage succeeds, fails, or times out — the
//! same scoped-resource-with-guaranteed-release shape as the merge lock
//! guard, applied to a filesystem directory instead of a store row.

use std::io;
use std::path::Path;

use cadence_core::JobId;

/// Owns a temp directory for the lifetime of one stage invocation. Stages
/// must not assume the directory survives past their own
/// `StageWorker::run` call, and must not share it across jobs.
pub struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    /// Creates a fresh scratch directory scoped to `job_id`.
    pub fn create(job_id: &JobId) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(&format!("cadence-{job_id}-")).tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
