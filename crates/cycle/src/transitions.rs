// SPDX-License-Identifier: MIT

//! Stage-completion transitions: given the job that just succeeded, decide
//! what runs next. Each function is invoked by the worker loop immediately
//! after it marks the predecessor job done, in the same dispatch call, so
//! BranchEvents are always written predecessor-before-successor.

use cadence_capabilities::RepoHost;
use cadence_core::branch_event::kinds;
use cadence_core::{
    Actor, BranchEvent, BranchEventId, Checkpoint, CheckpointId, CheckpointKind, Job, JobId,
    JobPayload, JobStatus, PipelineRunId, PipelineStage, Project, ProposalId, ProposalStatus,
    RunResult,
};
use cadence_store::Store;
use chrono::Utc;

use crate::completion::check_cycle_completion;
use crate::error::CycleResult;

/// `scout` just succeeded: the cycle was already opened when the scout job
/// was enqueued (see [`crate::open_cycle_and_enqueue_scout`]); confirm it
/// exists, then enqueue `strategize`.
pub async fn on_scout_completed(store: &dyn Store, job: &Job) -> CycleResult<()> {
    let JobPayload::Scout { cycle_id } = job.payload else {
        return Err(crate::error::CycleError::WrongPayload("expected JobPayload::Scout"));
    };
    let cycle = store.get_cycle(&cycle_id).await?;

    let strategize = Job {
        id: JobId::new(),
        project_id: job.project_id,
        payload: JobPayload::Strategize { cycle_id: cycle.id, wild_card: cycle.wild_card },
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
    store.insert_job(&strategize).await?;
    Ok(())
}

/// `build` succeeded and produced a pull request.
pub async fn on_build_completed_with_pr(
    store: &dyn Store,
    project_id: cadence_core::ProjectId,
    proposal_id: ProposalId,
    pipeline_run_id: PipelineRunId,
    pr_number: u64,
    head_sha: String,
    branch_name: String,
) -> CycleResult<()> {
    store.update_pipeline_run(&pipeline_run_id, PipelineStage::Validating, None, Some(pr_number)).await?;

    let review_job = Job {
        id: JobId::new(),
        project_id,
        payload: JobPayload::Review {
            proposal_id,
            pipeline_run_id,
            pr_number,
            head_sha,
            branch_name,
            remediation_attempt: 0,
        },
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
    store.insert_job(&review_job).await?;
    Ok(())
}

/// `build` succeeded but produced no diff: a dead end for this proposal.
pub async fn on_build_completed_with_no_changes(
    store: &dyn Store,
    repo_host: &dyn RepoHost,
    proposal_id: ProposalId,
    pipeline_run_id: PipelineRunId,
) -> CycleResult<()> {
    store
        .update_proposal_status(
            &proposal_id,
            ProposalStatus::Rejected,
            Some("builder produced no code changes"),
            None,
        )
        .await?;
    store.update_pipeline_run(&pipeline_run_id, PipelineStage::Failed, Some(RunResult::Failed), None).await?;
    check_cycle_completion(store, repo_host, proposal_id).await?;
    Ok(())
}

/// `review` approved the change.
///
/// Returns whether the merge coordinator must now run — the cycle crate
/// decides *whether* to merge; the merge crate itself lives one layer up so
/// that it can in turn call back into `check_cycle_completion`.
pub async fn on_review_approved(
    store: &dyn Store,
    repo_host: &dyn RepoHost,
    project: &Project,
    proposal_id: ProposalId,
    pipeline_run_id: PipelineRunId,
) -> CycleResult<bool> {
    let should_merge =
        project.autonomy_mode == cadence_core::AutonomyMode::Automate && !project.paused && !project.merge_in_progress;

    if should_merge {
        return Ok(true);
    }

    store.update_proposal_status(&proposal_id, ProposalStatus::Done, None, None).await?;
    store
        .update_pipeline_run(&pipeline_run_id, PipelineStage::Deployed, Some(RunResult::Success), None)
        .await?;
    check_cycle_completion(store, repo_host, proposal_id).await?;
    Ok(false)
}

/// `review` rejected the change.
pub async fn on_review_rejected(
    store: &dyn Store,
    repo_host: &dyn RepoHost,
    project_id: cadence_core::ProjectId,
    proposal_id: ProposalId,
    pipeline_run_id: PipelineRunId,
    branch_name: String,
    remediation_attempt: u32,
    concerns: Vec<String>,
) -> CycleResult<()> {
    let will_retry = remediation_attempt < 1;

    let event = BranchEvent {
        id: BranchEventId::new(),
        project_id,
        branch_name: Some(branch_name.clone()),
        event_type: kinds::REVIEW_REJECTED.into(),
        event_data: serde_json::json!({ "will_retry": will_retry, "final": !will_retry }),
        actor: Actor::Reviewer,
        commit_sha: None,
        created_at: Utc::now(),
    };
    store.insert_branch_event(&event).await?;

    if will_retry {
        let fix_job = Job {
            id: JobId::new(),
            project_id,
            payload: JobPayload::FixBuild { proposal_id, pipeline_run_id, branch_name, concerns },
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
        store.insert_job(&fix_job).await?;
    } else {
        store
            .update_proposal_status(&proposal_id, ProposalStatus::Rejected, Some("review rejected"), None)
            .await?;
        check_cycle_completion(store, repo_host, proposal_id).await?;
    }
    Ok(())
}

/// `fix_build` produced a new diff: send it back through review, once.
pub async fn on_fix_build_completed_with_changes(
    store: &dyn Store,
    project_id: cadence_core::ProjectId,
    proposal_id: ProposalId,
    pipeline_run_id: PipelineRunId,
    pr_number: u64,
    head_sha: String,
    branch_name: String,
) -> CycleResult<()> {
    let job = Job {
        id: JobId::new(),
        project_id,
        payload: JobPayload::Review {
            proposal_id,
            pipeline_run_id,
            pr_number,
            head_sha,
            branch_name,
            remediation_attempt: 1,
        },
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
    Ok(())
}

/// `fix_build` produced nothing: give up on the proposal.
pub async fn on_fix_build_completed_with_no_changes(
    store: &dyn Store,
    repo_host: &dyn RepoHost,
    proposal_id: ProposalId,
) -> CycleResult<()> {
    store
        .update_proposal_status(&proposal_id, ProposalStatus::Rejected, Some("fix_build produced no changes"), None)
        .await?;
    check_cycle_completion(store, repo_host, proposal_id).await?;
    Ok(())
}

/// Insert a `cycle_complete` checkpoint against the current head of the
/// default branch, used by [`check_cycle_completion`].
pub(crate) async fn insert_cycle_complete_checkpoint(
    store: &dyn Store,
    repo_host: &dyn RepoHost,
    project: &Project,
    cycle_id: cadence_core::CycleId,
) -> CycleResult<()> {
    let head_sha = repo_host.get_ref(&project.host_repo_ref, &project.default_branch).await?;
    let checkpoint = Checkpoint {
        id: CheckpointId::new(),
        project_id: project.id,
        cycle_id: Some(cycle_id),
        proposal_id: None,
        kind: CheckpointKind::CycleComplete,
        commit_sha: head_sha,
        pr_number: None,
        branch_name: None,
        metadata: serde_json::Value::Null,
        created_at: Utc::now(),
    };
    store.insert_checkpoint(&checkpoint).await?;
    Ok(())
}

#[cfg(test)]
#[path = "transitions_tests.rs"]
mod tests;
