// SPDX-License-Identifier: MIT

//! Validates and applies a [`Diagnosis`]'s actions against the closed set,
//! enforcing each action's precondition before touching the Store. Nothing
//! here reaches outside the Store/Notifier capabilities — no file or shell
//! access, matching the "no direct file or shell access" rule the diagnoser
//! is bound by.

use cadence_capabilities::{Diagnosis, DiagnosisAction, Notifier};
use cadence_core::{JobId, JobStatus, ProjectId, ProposalId, ProposalStatus};
use cadence_store::{JobPatch, Store};
use chrono::Utc;
use tracing::{info, warn};

use crate::error::WatchdogResult;

/// Jobs processing longer than this with no sign of life are eligible for
/// `retrigger_job`.
pub const STUCK_JOB_THRESHOLD: chrono::Duration = chrono::Duration::minutes(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedAction {
    Applied(DiagnosisAction),
    SkippedPreconditionFailed(DiagnosisAction),
    SkippedNoTarget(DiagnosisAction),
}

/// Applies every action in `diagnosis` for `project`, in order. Always
/// honors `send_notification`; every other action is checked against its
/// precondition and skipped (logged, not erred) if it doesn't hold.
pub async fn apply_diagnosis(
    store: &dyn Store,
    notifier: &dyn Notifier,
    project_id: &ProjectId,
    diagnosis: &Diagnosis,
) -> WatchdogResult<Vec<AppliedAction>> {
    let mut results = Vec::new();

    for action in &diagnosis.actions {
        let outcome = match action {
            DiagnosisAction::SendNotification => {
                notifier.notify(&diagnosis.summary, Some(project_id.as_str())).await;
                AppliedAction::Applied(*action)
            }
            DiagnosisAction::RetriggerJob => retrigger_job(store, diagnosis.target_id.as_deref()).await?,
            DiagnosisAction::ResetJobAttempts => reset_job_attempts(store, diagnosis.target_id.as_deref()).await?,
            DiagnosisAction::RejectProposal => {
                reject_proposal(store, diagnosis.target_id.as_deref(), &diagnosis.summary).await?
            }
            DiagnosisAction::ReleaseMergeLock => release_merge_lock(store, project_id).await?,
            DiagnosisAction::TriggerScout => trigger_scout(store, project_id).await?,
        };
        match outcome {
            AppliedAction::Applied(a) => info!(project = %project_id, action = ?a, "watchdog action applied"),
            AppliedAction::SkippedPreconditionFailed(a) => {
                warn!(project = %project_id, action = ?a, "watchdog action precondition failed, skipped")
            }
            AppliedAction::SkippedNoTarget(a) => {
                warn!(project = %project_id, action = ?a, "watchdog action missing/invalid target_id, skipped")
            }
        }
        results.push(outcome);
    }

    Ok(results)
}

async fn retrigger_job(store: &dyn Store, target_id: Option<&str>) -> WatchdogResult<AppliedAction> {
    let Some(raw) = target_id.filter(|s| s.starts_with(JobId::PREFIX)) else {
        return Ok(AppliedAction::SkippedNoTarget(DiagnosisAction::RetriggerJob));
    };
    let job_id = JobId::from_string(raw);
    let job = store.get_job(&job_id).await?;

    let stuck = job.status == JobStatus::Processing
        && job.locked_at.is_some_and(|locked_at| Utc::now() - locked_at > STUCK_JOB_THRESHOLD);
    if !stuck {
        return Ok(AppliedAction::SkippedPreconditionFailed(DiagnosisAction::RetriggerJob));
    }

    store.update_job(&job_id, JobPatch::reset_to_pending()).await?;
    Ok(AppliedAction::Applied(DiagnosisAction::RetriggerJob))
}

async fn reset_job_attempts(store: &dyn Store, target_id: Option<&str>) -> WatchdogResult<AppliedAction> {
    let Some(raw) = target_id.filter(|s| s.starts_with(JobId::PREFIX)) else {
        return Ok(AppliedAction::SkippedNoTarget(DiagnosisAction::ResetJobAttempts));
    };
    let job_id = JobId::from_string(raw);
    let job = store.get_job(&job_id).await?;

    if job.status != JobStatus::Failed {
        return Ok(AppliedAction::SkippedPreconditionFailed(DiagnosisAction::ResetJobAttempts));
    }

    let mut patch = JobPatch::reset_to_pending();
    patch.attempt_count = Some(0);
    store.update_job(&job_id, patch).await?;
    Ok(AppliedAction::Applied(DiagnosisAction::ResetJobAttempts))
}

async fn reject_proposal(store: &dyn Store, target_id: Option<&str>, reason: &str) -> WatchdogResult<AppliedAction> {
    let Some(raw) = target_id.filter(|s| s.starts_with(ProposalId::PREFIX)) else {
        return Ok(AppliedAction::SkippedNoTarget(DiagnosisAction::RejectProposal));
    };
    let proposal_id = ProposalId::from_string(raw);
    let proposal = store.get_proposal(&proposal_id).await?;

    if proposal.status.is_terminal() {
        return Ok(AppliedAction::SkippedPreconditionFailed(DiagnosisAction::RejectProposal));
    }

    store.update_proposal_status(&proposal_id, ProposalStatus::Rejected, Some(reason), None).await?;
    Ok(AppliedAction::Applied(DiagnosisAction::RejectProposal))
}

async fn release_merge_lock(store: &dyn Store, project_id: &ProjectId) -> WatchdogResult<AppliedAction> {
    let project = store.get_project(project_id).await?;
    if !project.merge_in_progress {
        return Ok(AppliedAction::SkippedPreconditionFailed(DiagnosisAction::ReleaseMergeLock));
    }
    store.release_merge_lock(project_id).await?;
    Ok(AppliedAction::Applied(DiagnosisAction::ReleaseMergeLock))
}

async fn trigger_scout(store: &dyn Store, project_id: &ProjectId) -> WatchdogResult<AppliedAction> {
    let project = store.get_project(project_id).await?;
    let already_queued = store.has_pending_or_processing_job(project_id, cadence_core::JobType::Scout).await?;
    if !project.is_actionable() || already_queued {
        return Ok(AppliedAction::SkippedPreconditionFailed(DiagnosisAction::TriggerScout));
    }
    let wild_card = cadence_autonomy::resolve_wild_card(project.wild_card_frequency, &mut rand::thread_rng());
    cadence_cycle::open_cycle_and_enqueue_scout(store, &project, wild_card).await?;
    Ok(AppliedAction::Applied(DiagnosisAction::TriggerScout))
}

#[cfg(test)]
#[path = "actions_tests.rs"]
mod tests;
