// SPDX-License-Identifier: MIT

//! The worker's main loop: claim a job, dispatch it to its stage, and turn
//! the outcome into the next state-machine transition. One iteration per
//! poll; a single worker processes jobs serially.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use cadence_capabilities::{Notifier, RepoHost, TokenProvider};
use cadence_core::{classify_error, ErrorCategory, Job, JobPayload};
use cadence_store::{JobPatch, Store};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::stage::{StageContext, StageDispatch, StageOutcome};
use crate::workspace::Workspace;

/// Runs forever, polling `store` for work. Returns only on a fatal error
/// (classified via [`classify_error`]) — the supervisor is expected to
/// restart the process when this happens.
pub async fn run(
    worker_id: &str,
    config: &Config,
    store: Arc<dyn Store>,
    repo_host: Arc<dyn RepoHost>,
    token_provider: Arc<dyn TokenProvider>,
    notifier: Arc<dyn Notifier>,
    dispatch: &StageDispatch,
    paused: &std::sync::atomic::AtomicBool,
) -> Result<(), cadence_core::ErrorCategory> {
    let consecutive_store_failures = AtomicU32::new(0);

    loop {
        if paused.load(Ordering::Relaxed) {
            tokio::time::sleep(config.paused_poll_interval).await;
            continue;
        }

        if let Err(e) = store.reap_stale_jobs(config.stale_threshold, config.max_attempts).await {
            warn!(error = %e, "stale-job reap failed");
        }

        let job = match store.claim_next_job(worker_id).await {
            Ok(Some(job)) => job,
            Ok(None) => {
                tokio::time::sleep(config.poll_interval).await;
                continue;
            }
            Err(e) => {
                let failures = consecutive_store_failures.fetch_add(1, Ordering::Relaxed) + 1;
                error!(error = %e, failures, "store unreachable while claiming a job");
                backoff(config, failures).await;
                continue;
            }
        };
        consecutive_store_failures.store(0, Ordering::Relaxed);

        if let Err(category) = run_one(&job, config, &store, &repo_host, &token_provider, &notifier, dispatch).await {
            if category == ErrorCategory::Fatal {
                return Err(category);
            }
        }
    }
}

async fn backoff(config: &Config, failures: u32) {
    let secs = 5u64.saturating_mul(1 << failures.min(8));
    let wait = std::time::Duration::from_secs(secs).min(config.max_backoff);
    tokio::time::sleep(wait).await;
}

async fn run_one(
    job: &Job,
    config: &Config,
    store: &Arc<dyn Store>,
    repo_host: &Arc<dyn RepoHost>,
    token_provider: &Arc<dyn TokenProvider>,
    notifier: &Arc<dyn Notifier>,
    dispatch: &StageDispatch,
) -> Result<(), ErrorCategory> {
    let project = match store.get_project(&job.project_id).await {
        Ok(project) => project,
        Err(e) => {
            error!(job_id = %job.id, error = %e, "could not load project for claimed job");
            return Ok(());
        }
    };

    if project.paused {
        if let Err(e) = store.release_job(&job.id).await {
            warn!(job_id = %job.id, error = %e, "failed to release job for a paused project");
        }
        return Ok(());
    }

    if let Err(e) = token_provider.ensure_valid(&project.host_repo_ref).await {
        let category = classify_error(&e.to_string());
        fail_or_retry(store, job, &e.to_string(), category, config.max_attempts).await;
        return Ok(());
    }

    let Some(worker) = dispatch.get(job.job_type()) else {
        error!(job_id = %job.id, job_type = %job.job_type(), "no stage worker registered for this job type");
        store.update_job(&job.id, JobPatch::failed("no stage worker registered")).await.ok();
        return Ok(());
    };

    let workspace = match Workspace::create(&job.id) {
        Ok(workspace) => workspace,
        Err(e) => {
            fail_or_retry(store, job, &format!("failed to create workspace: {e}"), ErrorCategory::TransientIo, config.max_attempts)
                .await;
            return Ok(());
        }
    };

    let ctx = StageContext {
        job: job.clone(),
        project: project.clone(),
        store: Arc::clone(store),
        repo_host: Arc::clone(repo_host),
        token_provider: Arc::clone(token_provider),
        notifier: Arc::clone(notifier),
        workspace,
    };

    let timeout = crate::stage::stage_timeout(job.job_type());
    let outcome = match tokio::time::timeout(timeout, worker.run(ctx)).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            let category = classify_error(&e.to_string());
            fail_or_retry(store, job, &e.to_string(), category, config.max_attempts).await;
            return Ok(());
        }
        Err(_) => {
            let reason = format!("stage timed out after {:?}", timeout);
            fail_or_retry(store, job, &reason, ErrorCategory::TransientIo, config.max_attempts).await;
            return Ok(());
        }
    };

    if let Err(e) = store.update_job(&job.id, JobPatch::done()).await {
        error!(job_id = %job.id, error = %e, "failed to mark job done after a successful stage run");
        return Ok(());
    }

    if let Err(e) = apply_outcome(store, repo_host, notifier, &project, job, outcome, config.min_proposal_score).await {
        error!(job_id = %job.id, error = %e, "failed to apply stage outcome");
    }

    Ok(())
}

async fn fail_or_retry(store: &Arc<dyn Store>, job: &Job, reason: &str, category: ErrorCategory, max_attempts: u32) {
    if category.is_retryable() && job.attempt_count < max_attempts {
        let mut patch = JobPatch::reset_to_pending();
        patch.last_error = Some(Some(reason.to_string()));
        store.update_job(&job.id, patch).await.ok();
    } else {
        store.update_job(&job.id, JobPatch::failed(reason)).await.ok();
    }
}

async fn apply_outcome(
    store: &Arc<dyn Store>,
    repo_host: &Arc<dyn RepoHost>,
    notifier: &Arc<dyn Notifier>,
    project: &cadence_core::Project,
    job: &Job,
    outcome: StageOutcome,
    min_proposal_score: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    match (job.payload.clone(), outcome) {
        (JobPayload::Scout { .. }, StageOutcome::ScoutDone) => {
            cadence_cycle::on_scout_completed(store.as_ref(), job).await?;
        }
        (JobPayload::Strategize { cycle_id, .. }, StageOutcome::StrategizeDone) => {
            let outcome = cadence_autonomy::run_autonomy_policy(store.as_ref(), project, &cycle_id, min_proposal_score)
                .await?;
            info!(job_id = %job.id, ?outcome, "autonomy policy ran after strategize");
        }
        (JobPayload::Build { proposal_id, branch_name, pipeline_run_id, .. }, StageOutcome::BuildWithPr { pr_number, head_sha }) => {
            cadence_cycle::on_build_completed_with_pr(
                store.as_ref(),
                job.project_id,
                proposal_id,
                pipeline_run_id,
                pr_number,
                head_sha,
                branch_name,
            )
            .await?;
        }
        (JobPayload::Build { proposal_id, pipeline_run_id, .. }, StageOutcome::BuildNoChanges) => {
            cadence_cycle::on_build_completed_with_no_changes(store.as_ref(), repo_host.as_ref(), proposal_id, pipeline_run_id)
                .await?;
        }
        (
            JobPayload::Review { proposal_id, pipeline_run_id, pr_number, head_sha, branch_name, .. },
            StageOutcome::ReviewApproved,
        ) => {
            let should_merge =
                cadence_cycle::on_review_approved(store.as_ref(), repo_host.as_ref(), project, proposal_id, pipeline_run_id)
                    .await?;
            if should_merge {
                let request = cadence_merge::MergeRequest {
                    proposal_id,
                    pipeline_run_id,
                    pr_number,
                    expected_head_sha: head_sha,
                    branch_name,
                };
                cadence_merge::run_merge(Arc::clone(store), repo_host.as_ref(), notifier.as_ref(), project, request)
                    .await?;
            }
        }
        (
            JobPayload::Review { proposal_id, pipeline_run_id, branch_name, remediation_attempt, .. },
            StageOutcome::ReviewRejected { concerns },
        ) => {
            cadence_cycle::on_review_rejected(
                store.as_ref(),
                repo_host.as_ref(),
                job.project_id,
                proposal_id,
                pipeline_run_id,
                branch_name,
                remediation_attempt,
                concerns,
            )
            .await?;
        }
        (
            JobPayload::FixBuild { proposal_id, pipeline_run_id, branch_name, .. },
            StageOutcome::FixBuildWithChanges { pr_number, head_sha },
        ) => {
            cadence_cycle::on_fix_build_completed_with_changes(
                store.as_ref(),
                job.project_id,
                proposal_id,
                pipeline_run_id,
                pr_number,
                head_sha,
                branch_name,
            )
            .await?;
        }
        (JobPayload::FixBuild { proposal_id, .. }, StageOutcome::FixBuildNoChanges) => {
            cadence_cycle::on_fix_build_completed_with_no_changes(store.as_ref(), repo_host.as_ref(), proposal_id).await?;
        }
        (payload, outcome) => {
            warn!(job_type = %job.job_type(), ?outcome, payload = ?payload, "stage outcome did not match the job's payload variant");
        }
    }

    info!(job_id = %job.id, job_type = %job.job_type(), "job completed");
    Ok(())
}

#[cfg(test)]
#[path = "poll_loop_tests.rs"]
mod tests;
