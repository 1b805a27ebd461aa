// SPDX-License-Identifier: MIT

//! The cycle-completion check: run after every proposal reaches a terminal
//! state, to decide whether the cycle it belongs to is now fully resolved
//! and, if so, whether automate mode should open the next one.

use cadence_capabilities::RepoHost;
use cadence_core::branch_event::kinds;
use cadence_core::{Actor, AutonomyMode, BranchEvent, BranchEventId, JobType, ProposalId};
use cadence_store::Store;
use chrono::Utc;

use crate::error::CycleResult;
use crate::scout::open_cycle_and_enqueue_scout;
use crate::transitions::insert_cycle_complete_checkpoint;

/// Called from every terminal transition (build/review/fix_build dead ends,
/// merge success or failure). A no-op unless `proposal_id`'s cycle has no
/// other proposal left in flight.
pub async fn check_cycle_completion(
    store: &dyn Store,
    repo_host: &dyn RepoHost,
    proposal_id: ProposalId,
) -> CycleResult<()> {
    let proposal = store.get_proposal(&proposal_id).await?;
    let Some(cycle_id) = proposal.cycle_id else {
        return Ok(());
    };

    let siblings = store.list_proposals_in_cycle(&cycle_id).await?;
    if siblings.iter().any(|p| !p.status.is_terminal()) {
        return Ok(());
    }

    let project = store.get_project(&proposal.project_id).await?;

    let completed_event = BranchEvent {
        id: BranchEventId::new(),
        project_id: project.id,
        branch_name: None,
        event_type: kinds::CYCLE_COMPLETED.into(),
        event_data: serde_json::json!({ "cycle_id": cycle_id.as_str() }),
        actor: Actor::Autonomy,
        commit_sha: None,
        created_at: Utc::now(),
    };
    let inserted = store.insert_branch_event_once(&completed_event).await?;
    if !inserted {
        // Another concurrent completion check already closed this cycle.
        return Ok(());
    }

    insert_cycle_complete_checkpoint(store, repo_host, &project, cycle_id).await?;
    store.close_cycle(&cycle_id).await?;

    let should_start_next = project.autonomy_mode == AutonomyMode::Automate
        && !project.paused
        && !store.has_pending_or_processing_job(&project.id, JobType::Scout).await?;

    if should_start_next {
        let wild_card = cadence_autonomy::resolve_wild_card(project.wild_card_frequency, &mut rand::thread_rng());
        let (next_cycle, _job) = open_cycle_and_enqueue_scout(store, &project, wild_card).await?;

        let started_event = BranchEvent {
            id: BranchEventId::new(),
            project_id: project.id,
            branch_name: None,
            event_type: kinds::CYCLE_STARTED.into(),
            event_data: serde_json::json!({
                "cycle_id": next_cycle.id.as_str(),
                "previous_cycle_id": cycle_id.as_str(),
            }),
            actor: Actor::Autonomy,
            commit_sha: None,
            created_at: Utc::now(),
        };
        store.insert_branch_event(&started_event).await?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "completion_tests.rs"]
mod tests;
