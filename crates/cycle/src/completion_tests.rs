use super::*;
use cadence_core::{JobId, Proposal, ProposalStatus};
use cadence_store::FakeStore;

fn proposal_in(cycle_id: cadence_core::CycleId, project_id: cadence_core::ProjectId, status: ProposalStatus) -> Proposal {
    Proposal::builder().project_id(project_id).cycle_id(cycle_id).status(status).build()
}

#[tokio::test]
async fn stays_open_while_any_proposal_in_the_cycle_is_non_terminal() {
    let store = FakeStore::new();
    let repo_host = cadence_capabilities::FakeRepoHost::new();
    let project = Project::builder().build();
    store.seed_project(project.clone());
    let cycle = store.open_cycle(&project.id, &JobId::new(), false).await.unwrap();

    let done = proposal_in(cycle.id, project.id, ProposalStatus::Done);
    let still_going = proposal_in(cycle.id, project.id, ProposalStatus::Implementing);
    store.insert_proposal(&done).await.unwrap();
    store.insert_proposal(&still_going).await.unwrap();

    check_cycle_completion(&store, &repo_host, done.id).await.unwrap();

    let cycle_after = store.get_cycle(&cycle.id).await.unwrap();
    assert!(!cycle_after.is_closed());
}

#[tokio::test]
async fn closes_the_cycle_once_every_proposal_is_terminal() {
    let store = FakeStore::new();
    let repo_host = cadence_capabilities::FakeRepoHost::new();
    let mut project = Project::builder().autonomy_mode(cadence_core::AutonomyMode::Assist).build();
    project.default_branch = "main".to_string();
    store.seed_project(project.clone());
    repo_host.seed_ref(&project.host_repo_ref, &project.default_branch, "abc123");
    let cycle = store.open_cycle(&project.id, &JobId::new(), false).await.unwrap();

    let only = proposal_in(cycle.id, project.id, ProposalStatus::Done);
    store.insert_proposal(&only).await.unwrap();

    check_cycle_completion(&store, &repo_host, only.id).await.unwrap();

    let cycle_after = store.get_cycle(&cycle.id).await.unwrap();
    assert!(cycle_after.is_closed());

    let events = store.branch_events();
    assert!(events.iter().any(|e| e.event_type == *cadence_core::branch_event::kinds::CYCLE_COMPLETED));

    let checkpoints = store.checkpoints();
    assert!(checkpoints.iter().any(|c| c.commit_sha == "abc123"));
}

#[tokio::test]
async fn automate_mode_opens_the_next_cycle_when_no_scout_is_in_flight() {
    let store = FakeStore::new();
    let repo_host = cadence_capabilities::FakeRepoHost::new();
    let mut project = Project::builder().autonomy_mode(cadence_core::AutonomyMode::Automate).build();
    project.default_branch = "main".to_string();
    store.seed_project(project.clone());
    repo_host.seed_ref(&project.host_repo_ref, &project.default_branch, "abc123");
    let cycle = store.open_cycle(&project.id, &JobId::new(), false).await.unwrap();

    let only = proposal_in(cycle.id, project.id, ProposalStatus::Rejected);
    store.insert_proposal(&only).await.unwrap();

    check_cycle_completion(&store, &repo_host, only.id).await.unwrap();

    let events = store.branch_events();
    assert!(events.iter().any(|e| e.event_type == *cadence_core::branch_event::kinds::CYCLE_STARTED));

    let jobs = store.jobs_snapshot();
    assert!(jobs.iter().any(|j| matches!(j.payload, cadence_core::JobPayload::Scout { .. })));
}

#[tokio::test]
async fn running_twice_is_idempotent() {
    let store = FakeStore::new();
    let repo_host = cadence_capabilities::FakeRepoHost::new();
    let mut project = Project::builder().autonomy_mode(cadence_core::AutonomyMode::Assist).build();
    project.default_branch = "main".to_string();
    store.seed_project(project.clone());
    repo_host.seed_ref(&project.host_repo_ref, &project.default_branch, "abc123");
    let cycle = store.open_cycle(&project.id, &JobId::new(), false).await.unwrap();

    let only = proposal_in(cycle.id, project.id, ProposalStatus::Done);
    store.insert_proposal(&only).await.unwrap();

    check_cycle_completion(&store, &repo_host, only.id).await.unwrap();
    check_cycle_completion(&store, &repo_host, only.id).await.unwrap();

    let checkpoints = store.checkpoints();
    assert_eq!(checkpoints.len(), 1);
}
