use super::*;
use cadence_capabilities::{FakeNotifier, FakeRepoHost, PullRequest};
use cadence_core::{PipelineRun, PipelineRunId, Proposal};
use cadence_store::FakeStore;
use std::sync::Arc;

fn request(pr_number: u64, expected_head_sha: &str, pipeline_run_id: PipelineRunId, proposal_id: ProposalId) -> MergeRequest {
    MergeRequest {
        proposal_id,
        pipeline_run_id,
        pr_number,
        expected_head_sha: expected_head_sha.to_string(),
        branch_name: "proposals/add-retry-budget".to_string(),
    }
}

#[tokio::test]
async fn successful_merge_marks_proposal_done_and_writes_checkpoint() {
    let store: Arc<dyn cadence_store::Store> = Arc::new(FakeStore::new());
    let repo_host = FakeRepoHost::new();
    let notifier = FakeNotifier::new();
    let project = Project::builder().host_repo_ref("acme/widgets").build();
    store.update_project(&project).await.unwrap();

    let proposal = Proposal::builder().project_id(project.id).build();
    store.insert_proposal(&proposal).await.unwrap();
    let run = PipelineRun {
        id: PipelineRunId::new(),
        project_id: project.id,
        stage: PipelineStage::Validating,
        pr_number: Some(7),
        result: None,
        started_at: Utc::now(),
        completed_at: None,
    };
    store.insert_pipeline_run(&run).await.unwrap();

    repo_host.seed_pr("acme/widgets", PullRequest { number: 7, head_sha: "abc123".to_string(), merged: false });

    run_merge(
        Arc::clone(&store),
        &repo_host,
        &notifier,
        &project,
        request(7, "abc123", run.id, proposal.id),
    )
    .await
    .unwrap();

    let done = store.get_proposal(&proposal.id).await.unwrap();
    assert_eq!(done.status, ProposalStatus::Done);

    let run_after = store.get_pipeline_run(&run.id).await.unwrap();
    assert_eq!(run_after.stage, PipelineStage::Deployed);

    let checkpoints = store.checkpoints();
    assert!(checkpoints.iter().any(|c| c.kind == CheckpointKind::Merge));

    assert!(!repo_host.merges().is_empty());
    assert!(!notifier.calls().is_empty());
}

#[tokio::test]
async fn head_mismatch_rejects_the_proposal_without_merging() {
    let store: Arc<dyn cadence_store::Store> = Arc::new(FakeStore::new());
    let repo_host = FakeRepoHost::new();
    let notifier = FakeNotifier::new();
    let project = Project::builder().host_repo_ref("acme/widgets").build();
    store.update_project(&project).await.unwrap();

    let proposal = Proposal::builder().project_id(project.id).build();
    store.insert_proposal(&proposal).await.unwrap();
    let run = PipelineRun {
        id: PipelineRunId::new(),
        project_id: project.id,
        stage: PipelineStage::Validating,
        pr_number: Some(7),
        result: None,
        started_at: Utc::now(),
        completed_at: None,
    };
    store.insert_pipeline_run(&run).await.unwrap();

    repo_host.seed_pr("acme/widgets", PullRequest { number: 7, head_sha: "moved".to_string(), merged: false });

    run_merge(
        Arc::clone(&store),
        &repo_host,
        &notifier,
        &project,
        request(7, "abc123", run.id, proposal.id),
    )
    .await
    .unwrap();

    let rejected = store.get_proposal(&proposal.id).await.unwrap();
    assert_eq!(rejected.status, ProposalStatus::Rejected);
    assert!(repo_host.merges().is_empty());

    let events = store.branch_events();
    assert!(events.iter().any(|e| e.event_type == *kinds::MERGE_FAILED));
}

#[tokio::test]
async fn merge_releases_the_lock_for_a_subsequent_merge() {
    let store: Arc<dyn cadence_store::Store> = Arc::new(FakeStore::new());
    let repo_host = FakeRepoHost::new();
    let notifier = FakeNotifier::new();
    let project = Project::builder().host_repo_ref("acme/widgets").build();
    store.update_project(&project).await.unwrap();

    let proposal = Proposal::builder().project_id(project.id).build();
    store.insert_proposal(&proposal).await.unwrap();
    let run = PipelineRun {
        id: PipelineRunId::new(),
        project_id: project.id,
        stage: PipelineStage::Validating,
        pr_number: Some(7),
        result: None,
        started_at: Utc::now(),
        completed_at: None,
    };
    store.insert_pipeline_run(&run).await.unwrap();
    repo_host.seed_pr("acme/widgets", PullRequest { number: 7, head_sha: "abc123".to_string(), merged: false });

    run_merge(Arc::clone(&store), &repo_host, &notifier, &project, request(7, "abc123", run.id, proposal.id))
        .await
        .unwrap();

    let guard = crate::lock::acquire(Arc::clone(&store), project.id).await.unwrap();
    assert!(guard.is_some());
}
