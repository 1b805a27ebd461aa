use super::*;
use cadence_capabilities::FakeRepoHost;
use cadence_core::{JobPayload, Project, Proposal, ProposalStatus};
use cadence_store::FakeStore;

fn job_with_payload(project_id: cadence_core::ProjectId, payload: JobPayload) -> Job {
    Job {
        id: JobId::new(),
        project_id,
        payload,
        status: JobStatus::Done,
        attempt_count: 1,
        worker_id: None,
        locked_at: None,
        last_error: None,
        source_run_id: None,
        github_issue_number: 0,
        created_at: Utc::now(),
        completed_at: None,
    }
}

#[tokio::test]
async fn scout_completion_confirms_the_cycle_and_enqueues_strategize() {
    let store = FakeStore::new();
    let project = Project::builder().build();
    store.seed_project(project.clone());
    let cycle_id = store.open_cycle(&project.id, &JobId::new(), false).await.unwrap().id;

    let scout_job = job_with_payload(project.id, JobPayload::Scout { cycle_id });
    on_scout_completed(&store, &scout_job).await.unwrap();

    let jobs = store.jobs_snapshot();
    assert!(jobs.iter().any(|j| matches!(j.payload, JobPayload::Strategize { cycle_id: c, .. } if c == cycle_id)));
}

#[tokio::test]
async fn build_with_pr_moves_pipeline_to_validating_and_enqueues_review() {
    let store = FakeStore::new();
    let project = Project::builder().build();
    store.seed_project(project.clone());
    let run = cadence_core::PipelineRun {
        id: cadence_core::PipelineRunId::new(),
        project_id: project.id,
        stage: PipelineStage::Queued,
        pr_number: None,
        result: None,
        started_at: Utc::now(),
        completed_at: None,
    };
    store.insert_pipeline_run(&run).await.unwrap();
    let proposal_id = ProposalId::new();

    on_build_completed_with_pr(
        &store,
        project.id,
        proposal_id,
        run.id,
        42,
        "deadbeef".to_string(),
        "proposals/x".to_string(),
    )
    .await
    .unwrap();

    let updated = store.get_pipeline_run(&run.id).await.unwrap();
    assert_eq!(updated.stage, PipelineStage::Validating);
    assert_eq!(updated.pr_number, Some(42));

    let jobs = store.jobs_snapshot();
    assert!(jobs.iter().any(|j| matches!(&j.payload, JobPayload::Review { proposal_id: p, .. } if *p == proposal_id)));
}

#[tokio::test]
async fn build_with_no_changes_rejects_the_proposal_and_checks_completion() {
    let store = FakeStore::new();
    let repo_host = FakeRepoHost::new();
    let project = Project::builder().build();
    store.seed_project(project.clone());
    let cycle = store.open_cycle(&project.id, &JobId::new(), false).await.unwrap();
    let proposal =
        Proposal::builder().project_id(project.id).cycle_id(cycle.id).status(ProposalStatus::Implementing).build();
    store.insert_proposal(&proposal).await.unwrap();
    let run = cadence_core::PipelineRun {
        id: cadence_core::PipelineRunId::new(),
        project_id: project.id,
        stage: PipelineStage::Queued,
        pr_number: None,
        result: None,
        started_at: Utc::now(),
        completed_at: None,
    };
    store.insert_pipeline_run(&run).await.unwrap();

    on_build_completed_with_no_changes(&store, &repo_host, proposal.id, run.id).await.unwrap();

    let rejected = store.get_proposal(&proposal.id).await.unwrap();
    assert_eq!(rejected.status, ProposalStatus::Rejected);
    let closed = store.get_cycle(&cycle.id).await.unwrap();
    assert!(closed.is_closed());
}

#[tokio::test]
async fn review_approved_in_automate_mode_defers_to_the_merge_coordinator() {
    let store = FakeStore::new();
    let repo_host = FakeRepoHost::new();
    let project = Project::builder().autonomy_mode(cadence_core::AutonomyMode::Automate).build();
    store.seed_project(project.clone());
    let proposal = Proposal::builder().project_id(project.id).build();
    store.insert_proposal(&proposal).await.unwrap();
    let run = cadence_core::PipelineRun {
        id: cadence_core::PipelineRunId::new(),
        project_id: project.id,
        stage: PipelineStage::Validating,
        pr_number: Some(1),
        result: None,
        started_at: Utc::now(),
        completed_at: None,
    };
    store.insert_pipeline_run(&run).await.unwrap();

    let should_merge = on_review_approved(&store, &repo_host, &project, proposal.id, run.id).await.unwrap();
    assert!(should_merge);

    let untouched = store.get_proposal(&proposal.id).await.unwrap();
    assert_eq!(untouched.status, ProposalStatus::Draft);
}

#[tokio::test]
async fn review_approved_in_assist_mode_marks_done_without_merging() {
    let store = FakeStore::new();
    let repo_host = FakeRepoHost::new();
    let project = Project::builder().autonomy_mode(cadence_core::AutonomyMode::Assist).build();
    store.seed_project(project.clone());
    let proposal = Proposal::builder().project_id(project.id).build();
    store.insert_proposal(&proposal).await.unwrap();
    let run = cadence_core::PipelineRun {
        id: cadence_core::PipelineRunId::new(),
        project_id: project.id,
        stage: PipelineStage::Validating,
        pr_number: Some(1),
        result: None,
        started_at: Utc::now(),
        completed_at: None,
    };
    store.insert_pipeline_run(&run).await.unwrap();

    let should_merge = on_review_approved(&store, &repo_host, &project, proposal.id, run.id).await.unwrap();
    assert!(!should_merge);

    let done = store.get_proposal(&proposal.id).await.unwrap();
    assert_eq!(done.status, ProposalStatus::Done);
}

#[tokio::test]
async fn review_rejected_first_time_enqueues_fix_build() {
    let store = FakeStore::new();
    let repo_host = FakeRepoHost::new();
    let project = Project::builder().build();
    store.seed_project(project.clone());
    let proposal = Proposal::builder().project_id(project.id).build();
    store.insert_proposal(&proposal).await.unwrap();

    on_review_rejected(
        &store,
        &repo_host,
        project.id,
        proposal.id,
        cadence_core::PipelineRunId::new(),
        "proposals/x".to_string(),
        0,
        vec!["flaky test".to_string()],
    )
    .await
    .unwrap();

    let jobs = store.jobs_snapshot();
    assert!(jobs.iter().any(|j| matches!(&j.payload, JobPayload::FixBuild { proposal_id, .. } if *proposal_id == proposal.id)));
    let untouched = store.get_proposal(&proposal.id).await.unwrap();
    assert_eq!(untouched.status, ProposalStatus::Draft);
}

#[tokio::test]
async fn review_rejected_after_one_retry_gives_up() {
    let store = FakeStore::new();
    let repo_host = FakeRepoHost::new();
    let project = Project::builder().build();
    store.seed_project(project.clone());
    let cycle = store.open_cycle(&project.id, &JobId::new(), false).await.unwrap();
    let proposal = Proposal::builder()
        .project_id(project.id)
        .cycle_id(cycle.id)
        .status(ProposalStatus::Implementing)
        .build();
    store.insert_proposal(&proposal).await.unwrap();

    on_review_rejected(
        &store,
        &repo_host,
        project.id,
        proposal.id,
        cadence_core::PipelineRunId::new(),
        "proposals/x".to_string(),
        1,
        vec![],
    )
    .await
    .unwrap();

    let rejected = store.get_proposal(&proposal.id).await.unwrap();
    assert_eq!(rejected.status, ProposalStatus::Rejected);
}
