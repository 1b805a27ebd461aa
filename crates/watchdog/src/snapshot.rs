// SPDX-License-Identifier: MIT

//! Builds the `DiagnosticSnapshot` the `Diagnoser` is allowed to see:
//! queue counts, recent BranchEvents, and a log tail for one project.

use cadence_capabilities::DiagnosticSnapshot;
use cadence_core::{JobStatus, ProjectId};
use cadence_store::Store;

use crate::error::WatchdogResult;

const RECENT_EVENT_LIMIT: u32 = 20;
const RECENT_LOG_LIMIT: u32 = 50;

pub async fn build_snapshot(store: &dyn Store, project_id: &ProjectId) -> WatchdogResult<DiagnosticSnapshot> {
    let all_jobs = store.list_jobs_by_status(JobStatus::Pending).await?;
    let pending_jobs = all_jobs.iter().filter(|j| j.project_id == *project_id).count() as u32;
    let processing_jobs =
        store.list_jobs_by_status(JobStatus::Processing).await?.iter().filter(|j| j.project_id == *project_id).count()
            as u32;
    let failed_jobs =
        store.list_jobs_by_status(JobStatus::Failed).await?.iter().filter(|j| j.project_id == *project_id).count()
            as u32;

    let recent_events = store
        .list_recent_branch_events(project_id, RECENT_EVENT_LIMIT)
        .await?
        .into_iter()
        .map(|e| format!("{}: {}", e.event_type.0, e.event_data))
        .collect();

    let recent_log_tail = store
        .list_recent_run_logs(project_id, RECENT_LOG_LIMIT)
        .await?
        .into_iter()
        .map(|l| format!("[{}] {}", l.level, l.message))
        .collect();

    Ok(DiagnosticSnapshot {
        project_id: project_id.as_str().to_string(),
        pending_jobs,
        processing_jobs,
        failed_jobs,
        recent_events,
        recent_log_tail,
    })
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
