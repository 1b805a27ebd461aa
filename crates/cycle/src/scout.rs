// SPDX-License-Identifier: MIT

//! Opening a cycle and enqueuing the scout job that drives it. Called at
//! bootstrap, by the supervisor's idle-detection sweep, and by the
//! cycle-completion check when automate mode closes the loop.

use cadence_core::{Cycle, Job, JobId, JobPayload, JobStatus, Project};
use cadence_store::Store;
use chrono::Utc;

use crate::error::CycleResult;

/// Open a new cycle for `project` and insert the scout job that opens it,
/// with `wild_card` already resolved by the caller (via
/// `cadence_autonomy::resolve_wild_card`, seeded by the project's
/// `wild_card_frequency`).
pub async fn open_cycle_and_enqueue_scout(
    store: &dyn Store,
    project: &Project,
    wild_card: bool,
) -> CycleResult<(Cycle, Job)> {
    let scout_job_id = JobId::new();
    let cycle = store.open_cycle(&project.id, &scout_job_id, wild_card).await?;

    let job = Job {
        id: scout_job_id,
        project_id: project.id,
        payload: JobPayload::Scout { cycle_id: cycle.id },
        status: JobStatus::Pending,
        attempt_count: 0,
        worker_id: None,
        locked_at: None,
        last_error: None,
        source_run_id: None,
        github_issue_number: 0,
        created_at: Utc::now(),
        completed_at: None,
    };
    store.insert_job(&job).await?;

    Ok((cycle, job))
}

#[cfg(test)]
#[path = "scout_tests.rs"]
mod tests;
