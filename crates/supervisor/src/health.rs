// SPDX-License-Identifier: MIT

//! The supervisor's periodic health sweep: the backstop pass that keeps the
//! queue moving even if the worker process itself has gone quiet.

use cadence_capabilities::{Diagnoser, Notifier, TokenProvider};
use cadence_core::{AutonomyMode, JobStatus, JobType};
use cadence_store::{JobPatch, Store};
use tracing::{info, warn};

use crate::error::SupervisorResult;

/// Substrings of `last_error` the health sweep treats as worth a fresh
/// attempt rather than a permanent failure.
const RECOVERABLE_PATTERNS: &[&str] =
    &["connection reset", "network", "install failed", "oauth token not available", "timed out"];

fn is_recoverable(last_error: &str) -> bool {
    let lower = last_error.to_lowercase();
    RECOVERABLE_PATTERNS.iter().any(|p| lower.contains(p))
}

#[derive(Debug, Default)]
pub struct HealthReport {
    pub stale_reaped: usize,
    pub retried: usize,
    pub merge_locks_released: usize,
    pub cycles_started: usize,
    pub watchdog_passes: usize,
}

/// Runs one health sweep against `store`. `token_provider` is refreshed for
/// every active project's repo ref; `repo_host` backs the scout job the
/// idle-detection step may enqueue; `diagnoser` backs the watchdog pass run
/// against every project with no build currently active.
pub async fn run_health_sweep(
    store: &dyn Store,
    token_provider: &dyn TokenProvider,
    notifier: &dyn Notifier,
    diagnoser: &dyn Diagnoser,
    stale_threshold: chrono::Duration,
    max_attempts: u32,
    merge_lock_threshold: chrono::Duration,
    wild_card_frequency: f64,
) -> SupervisorResult<HealthReport> {
    let mut report = HealthReport::default();

    let reset = store.reap_stale_jobs(stale_threshold, max_attempts).await?;
    report.stale_reaped = reset.len();

    for job_type in [JobType::Build, JobType::Review] {
        let failed = store.list_jobs_by_status(JobStatus::Failed).await?;
        for job in failed.into_iter().filter(|j| j.job_type() == job_type) {
            let recoverable = job.last_error.as_deref().is_some_and(is_recoverable);
            if !recoverable {
                continue;
            }
            let mut patch = JobPatch::reset_to_pending();
            patch.attempt_count = Some(0);
            store.update_job(&job.id, patch).await?;
            report.retried += 1;
        }
    }

    let released = store.release_stale_merge_locks(merge_lock_threshold).await?;
    report.merge_locks_released = released.len();

    let projects = store.list_active_projects().await?;
    for project in &projects {
        if let Err(e) = token_provider.ensure_valid(&project.host_repo_ref).await {
            warn!(project = %project.id, error = %e, "token refresh failed during health sweep");
        }
    }

    let no_work_in_flight =
        store.job_counts().await.map(|c| c.pending == 0 && c.processing == 0).unwrap_or(false);

    if no_work_in_flight {
        for project in &projects {
            let idle = project.autonomy_mode == AutonomyMode::Automate
                && !project.paused
                && store.count_active_branches(&project.id).await? == 0
                && !store.has_pending_or_processing_job(&project.id, JobType::Scout).await?;
            if idle {
                let wild_card = cadence_autonomy::resolve_wild_card(wild_card_frequency, &mut rand::thread_rng());
                cadence_cycle::open_cycle_and_enqueue_scout(store, project, wild_card).await?;
                report.cycles_started += 1;
            }
        }
    }

    for project in &projects {
        if store.count_active_branches(&project.id).await? > 0 {
            continue;
        }
        match cadence_watchdog::run_watchdog_pass(store, notifier, diagnoser, &project.id).await {
            Ok(_) => report.watchdog_passes += 1,
            Err(e) => warn!(project = %project.id, error = %e, "watchdog pass failed"),
        }
    }

    info!(?report, "health sweep complete");
    Ok(report)
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
