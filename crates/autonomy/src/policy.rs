// SPDX-License-Identifier: MIT

//! The admission-and-selection algorithm itself.

use cadence_core::branch_event::kinds;
use cadence_core::{
    branch_name_for, Actor, BranchEvent, BranchEventId, CycleId, Job, JobId, JobPayload,
    PipelineRun, PipelineRunId, PipelineStage, Project, Proposal, ProposalStatus, StrategyMemory,
    StrategyMemoryId,
};
use cadence_store::{Store, StoreResult};
use chrono::Utc;

/// What the policy did, for the caller (the worker's strategize-completion
/// handler) to log and to decide whether anything else needs enqueuing.
#[derive(Debug, Clone)]
pub enum AutonomyOutcome {
    /// Autonomy is disabled for this project right now.
    Skipped { reason: &'static str },
    /// No draft cleared admission (empty, all risk-filtered, or all under
    /// the score threshold).
    NoneAdmitted,
    /// One draft was approved and a build job enqueued for it.
    Approved { proposal_id: cadence_core::ProposalId, branch_name: String },
}

/// Run the autonomy policy for a project+cycle after strategize has
/// finished drafting proposals.
///
/// Never called concurrently for the same project+cycle in practice (the
/// cycle state machine invokes it exactly once per `strategize` job), so
/// no additional locking is taken here beyond the Store's own atomicity per
/// call.
pub async fn run_autonomy_policy(
    store: &dyn Store,
    project: &Project,
    cycle_id: &CycleId,
    min_score: f64,
) -> StoreResult<AutonomyOutcome> {
    if project.paused {
        return Ok(AutonomyOutcome::Skipped { reason: "project is paused" });
    }
    if project.autonomy_mode == cadence_core::AutonomyMode::Audit {
        return Ok(AutonomyOutcome::Skipped { reason: "autonomy_mode is audit" });
    }

    let active_branches = store.count_active_branches(&project.id).await?;
    if active_branches >= project.max_concurrent_branches {
        return Ok(AutonomyOutcome::Skipped { reason: "no free concurrency slots" });
    }

    let drafts = store.list_draft_proposals(&project.id, cycle_id).await?;
    if drafts.is_empty() {
        return Ok(AutonomyOutcome::NoneAdmitted);
    }

    let mut ranked: Vec<Proposal> = drafts;
    ranked.sort_by(|a, b| {
        b.scores.average().partial_cmp(&a.scores.average()).unwrap_or(std::cmp::Ordering::Equal)
    });

    let assist_mode = project.autonomy_mode == cadence_core::AutonomyMode::Assist;
    let winner = ranked
        .iter()
        .find(|draft| {
            if assist_mode && draft.touches_risk_path(&project.risk_paths) {
                return false;
            }
            draft.scores.is_admissible(min_score)
        })
        .cloned();

    let Some(winner) = winner else {
        return Ok(AutonomyOutcome::NoneAdmitted);
    };

    for draft in &ranked {
        if draft.id == winner.id {
            continue;
        }
        let reason = format!("not selected — {} scored higher", winner.title);
        store
            .update_proposal_status(&draft.id, ProposalStatus::Rejected, Some(&reason), None)
            .await?;
    }

    let branch_name = branch_name_for(&winner.title);
    store
        .update_proposal_status(&winner.id, ProposalStatus::Approved, None, Some(&branch_name))
        .await?;

    let now = Utc::now();
    let event = BranchEvent {
        id: BranchEventId::new(),
        project_id: project.id,
        branch_name: Some(branch_name.clone()),
        event_type: kinds::AUTO_APPROVED.into(),
        event_data: serde_json::json!({ "proposal_id": winner.id.as_str(), "title": winner.title }),
        actor: Actor::Autonomy,
        commit_sha: None,
        created_at: now,
    };
    store.insert_branch_event(&event).await?;

    let memory = StrategyMemory {
        id: StrategyMemoryId::new(),
        project_id: project.id,
        summary: format!("approved: {}", winner.title),
        outcome: "approved".to_string(),
        created_at: now,
    };
    store.insert_strategy_memory(&memory).await?;

    let pipeline_run = PipelineRun {
        id: PipelineRunId::new(),
        project_id: project.id,
        stage: PipelineStage::Queued,
        pr_number: None,
        result: None,
        started_at: now,
        completed_at: None,
    };
    store.insert_pipeline_run(&pipeline_run).await?;

    let build_job = Job {
        id: JobId::new(),
        project_id: project.id,
        payload: JobPayload::Build {
            proposal_id: winner.id,
            branch_name: branch_name.clone(),
            spec: winner.spec_text.clone(),
            title: winner.title.clone(),
            pipeline_run_id: pipeline_run.id,
        },
        status: cadence_core::JobStatus::Pending,
        attempt_count: 0,
        worker_id: None,
        locked_at: None,
        last_error: None,
        source_run_id: None,
        github_issue_number: 0,
        created_at: now,
        completed_at: None,
    };
    store.insert_job(&build_job).await?;

    Ok(AutonomyOutcome::Approved { proposal_id: winner.id, branch_name })
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
