use super::*;
use cadence_capabilities::{FakeDiagnoser, FakeNotifier, FakeTokenProvider};
use cadence_core::{AutonomyMode, Job, JobId, JobPayload, Project, ProposalId};
use cadence_store::FakeStore;

fn seeded_store() -> (FakeStore, Project) {
    let store = FakeStore::new();
    let project = Project::builder().autonomy_mode(AutonomyMode::Automate).build();
    store.seed_project(project.clone());
    (store, project)
}

#[tokio::test]
async fn recoverable_build_failures_are_reset_to_pending() {
    let (store, project) = seeded_store();
    let job = Job {
        id: JobId::new(),
        project_id: project.id,
        payload: JobPayload::Build {
            proposal_id: ProposalId::new(),
            branch_name: "b".into(),
            spec: "s".into(),
            title: "t".into(),
            pipeline_run_id: cadence_core::PipelineRunId::new(),
        },
        status: JobStatus::Failed,
        attempt_count: 2,
        worker_id: None,
        locked_at: None,
        last_error: Some("connection reset by peer".into()),
        source_run_id: None,
        github_issue_number: 0,
        created_at: chrono::Utc::now(),
        completed_at: None,
    };
    store.insert_job(&job).await.unwrap();
    let token_provider = FakeTokenProvider::new();
    let notifier = FakeNotifier::new();
    let diagnoser = FakeDiagnoser::new();

    let report = run_health_sweep(
        &store,
        &token_provider,
        &notifier,
        &diagnoser,
        chrono::Duration::minutes(60),
        3,
        chrono::Duration::minutes(5),
        0.2,
    )
    .await
    .unwrap();

    assert_eq!(report.retried, 1);
    let updated = store.get_job(&job.id).await.unwrap();
    assert_eq!(updated.status, JobStatus::Pending);
    assert_eq!(updated.attempt_count, 0);
}

#[tokio::test]
async fn non_recoverable_failures_are_left_alone() {
    let (store, project) = seeded_store();
    let job = Job {
        id: JobId::new(),
        project_id: project.id,
        payload: JobPayload::Build {
            proposal_id: ProposalId::new(),
            branch_name: "b".into(),
            spec: "s".into(),
            title: "t".into(),
            pipeline_run_id: cadence_core::PipelineRunId::new(),
        },
        status: JobStatus::Failed,
        attempt_count: 3,
        worker_id: None,
        locked_at: None,
        last_error: Some("schema mismatch in row decode".into()),
        source_run_id: None,
        github_issue_number: 0,
        created_at: chrono::Utc::now(),
        completed_at: None,
    };
    store.insert_job(&job).await.unwrap();
    let token_provider = FakeTokenProvider::new();
    let notifier = FakeNotifier::new();
    let diagnoser = FakeDiagnoser::new();

    let report = run_health_sweep(
        &store,
        &token_provider,
        &notifier,
        &diagnoser,
        chrono::Duration::minutes(60),
        3,
        chrono::Duration::minutes(5),
        0.2,
    )
    .await
    .unwrap();

    assert_eq!(report.retried, 0);
    let unchanged = store.get_job(&job.id).await.unwrap();
    assert_eq!(unchanged.status, JobStatus::Failed);
}

#[tokio::test]
async fn idle_automate_project_with_no_work_gets_a_fresh_scout_job() {
    let (store, project) = seeded_store();
    let token_provider = FakeTokenProvider::new();
    let notifier = FakeNotifier::new();
    let diagnoser = FakeDiagnoser::new();

    let report = run_health_sweep(
        &store,
        &token_provider,
        &notifier,
        &diagnoser,
        chrono::Duration::minutes(60),
        3,
        chrono::Duration::minutes(5),
        0.0,
    )
    .await
    .unwrap();

    assert_eq!(report.cycles_started, 1);
    let jobs = store.jobs_snapshot();
    assert!(jobs.iter().any(|j| matches!(j.payload, JobPayload::Scout { .. })));
}
