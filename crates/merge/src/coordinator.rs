// SPDX-License-Identifier: MIT

//! The merge coordinator: runs once `on_review_approved` (in the cycle
//! crate) decides a proposal is ready to land on its own. Every exit path
//! — success or failure — releases the lock and runs the cycle-completion
//! check exactly once.

use cadence_capabilities::{MergeMethod, Notifier, RepoHost};
use cadence_core::branch_event::kinds;
use cadence_core::{
    Actor, BranchEvent, BranchEventId, Checkpoint, CheckpointId, CheckpointKind, PipelineRunId, PipelineStage,
    Project, ProposalId, ProposalStatus, RunResult,
};
use cadence_cycle::check_cycle_completion;
use cadence_store::Store;
use chrono::Utc;
use std::sync::Arc;

use crate::error::MergeResult;
use crate::lock::{acquire, MergeLockGuard};

/// What the worker loop passes in: the proposal to merge, the branch it
/// lives on, the PR that was reviewed, and the sha that review approved —
/// the head-pin this transaction must still see on the remote.
pub struct MergeRequest {
    pub proposal_id: ProposalId,
    pub pipeline_run_id: PipelineRunId,
    pub pr_number: u64,
    pub expected_head_sha: String,
    pub branch_name: String,
}

/// Runs the merge transaction for `request` against `project`. Always
/// resolves — failures are recorded on the proposal/pipeline_run/BranchEvent
/// rather than bubbled as an `Err`, mirroring the rest of the cycle state
/// machine. An `Err` here means the store or repo host itself could not be
/// reached to even record the failure.
pub async fn run_merge(
    store: Arc<dyn Store>,
    repo_host: &dyn RepoHost,
    notifier: &dyn Notifier,
    project: &Project,
    request: MergeRequest,
) -> MergeResult<()> {
    let Some(guard) = acquire(Arc::clone(&store), project.id).await? else {
        // Another merge is already in flight; the caller (worker loop) will
        // retry this job later. Nothing to clean up.
        tracing::info!(project = %project.id, proposal_id = %request.proposal_id, "another merge in progress, skipping");
        return Ok(());
    };

    let outcome = try_merge(store.as_ref(), repo_host, project, &request).await;

    match outcome {
        Ok(sha) => {
            notifier.notify(&format!("merged {} ({})", request.branch_name, sha), Some(&project.host_repo_ref)).await;
        }
        Err(reason) => {
            notifier
                .notify(&format!("merge failed for {}: {reason}", request.branch_name), Some(&project.host_repo_ref))
                .await;
        }
    }

    release_and_check_completion(store.as_ref(), repo_host, guard, request.proposal_id).await
}

async fn try_merge(
    store: &dyn Store,
    repo_host: &dyn RepoHost,
    project: &Project,
    request: &MergeRequest,
) -> Result<String, String> {
    let pr = repo_host
        .get_pr(&project.host_repo_ref, request.pr_number)
        .await
        .map_err(|e| format!("could not read pull request: {e}"))?;

    if pr.head_sha != request.expected_head_sha {
        let reason = format!(
            "head moved since review: expected {}, found {}",
            request.expected_head_sha, pr.head_sha
        );
        record_failure(store, project, request, &reason).await;
        return Err(reason);
    }

    let merged = match repo_host.merge_pr(&project.host_repo_ref, request.pr_number, MergeMethod::Squash).await {
        Ok(result) => result,
        Err(e) => {
            let reason = e.to_string();
            record_failure(store, project, request, &reason).await;
            return Err(reason);
        }
    };

    store.update_proposal_status(&request.proposal_id, ProposalStatus::Done, None, None).await.ok();
    store
        .update_pipeline_run(&request.pipeline_run_id, PipelineStage::Deployed, Some(RunResult::Success), None)
        .await
        .ok();

    let now = Utc::now();
    store
        .insert_branch_event(&BranchEvent {
            id: BranchEventId::new(),
            project_id: project.id,
            branch_name: Some(request.branch_name.clone()),
            event_type: kinds::PR_MERGED.into(),
            event_data: serde_json::json!({ "pr_number": request.pr_number, "sha": merged.sha }),
            actor: Actor::Autonomy,
            commit_sha: Some(merged.sha.clone()),
            created_at: now,
        })
        .await
        .ok();
    store
        .insert_branch_event(&BranchEvent {
            id: BranchEventId::new(),
            project_id: project.id,
            branch_name: Some(request.branch_name.clone()),
            event_type: kinds::AUTO_MERGED.into(),
            event_data: serde_json::json!({ "proposal_id": request.proposal_id.as_str() }),
            actor: Actor::Autonomy,
            commit_sha: Some(merged.sha.clone()),
            created_at: now,
        })
        .await
        .ok();

    store
        .insert_checkpoint(&Checkpoint {
            id: CheckpointId::new(),
            project_id: project.id,
            cycle_id: None,
            proposal_id: Some(request.proposal_id),
            kind: CheckpointKind::Merge,
            commit_sha: merged.sha.clone(),
            pr_number: Some(request.pr_number),
            branch_name: Some(request.branch_name.clone()),
            metadata: serde_json::Value::Null,
            created_at: now,
        })
        .await
        .ok();

    // Best effort: a branch left behind after a successful merge is cosmetic.
    if let Err(e) = repo_host.delete_ref(&project.host_repo_ref, &request.branch_name).await {
        tracing::warn!(branch = %request.branch_name, error = %e, "failed to delete merged branch");
    }

    Ok(merged.sha)
}

async fn record_failure(store: &dyn Store, project: &Project, request: &MergeRequest, reason: &str) {
    store
        .update_proposal_status(&request.proposal_id, ProposalStatus::Rejected, Some(reason), None)
        .await
        .ok();
    store
        .update_pipeline_run(&request.pipeline_run_id, PipelineStage::Failed, Some(RunResult::Failed), None)
        .await
        .ok();
    store
        .insert_branch_event(&BranchEvent {
            id: BranchEventId::new(),
            project_id: project.id,
            branch_name: Some(request.branch_name.clone()),
            event_type: kinds::MERGE_FAILED.into(),
            event_data: serde_json::json!({ "reason": reason }),
            actor: Actor::Autonomy,
            commit_sha: None,
            created_at: Utc::now(),
        })
        .await
        .ok();
}

async fn release_and_check_completion(
    store: &dyn Store,
    repo_host: &dyn RepoHost,
    guard: MergeLockGuard,
    proposal_id: ProposalId,
) -> MergeResult<()> {
    guard.release().await?;
    check_cycle_completion(store, repo_host, proposal_id).await?;
    Ok(())
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
