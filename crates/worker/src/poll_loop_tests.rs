use super::*;
use async_trait::async_trait;
use cadence_capabilities::{FakeNotifier, FakeRepoHost, FakeTokenProvider};
use cadence_core::{JobId, JobStatus, JobType, Project};
use cadence_store::FakeStore;

use crate::stage::{StageContext, StageDispatch, StageError, StageWorker};

struct ScriptedWorker(StageOutcome);

#[async_trait]
impl StageWorker for ScriptedWorker {
    async fn run(&self, _ctx: StageContext) -> Result<StageOutcome, StageError> {
        Ok(self.0.clone())
    }
}

struct AlwaysFails;

#[async_trait]
impl StageWorker for AlwaysFails {
    async fn run(&self, _ctx: StageContext) -> Result<StageOutcome, StageError> {
        Err(StageError::Other("boom".into()))
    }
}

fn scout_job(project_id: cadence_core::ProjectId, cycle_id: cadence_core::CycleId) -> Job {
    Job {
        id: JobId::new(),
        project_id,
        payload: JobPayload::Scout { cycle_id },
        status: JobStatus::Processing,
        attempt_count: 0,
        worker_id: Some("w1".into()),
        locked_at: Some(chrono::Utc::now()),
        last_error: None,
        source_run_id: None,
        github_issue_number: 0,
        created_at: chrono::Utc::now(),
        completed_at: None,
    }
}

fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/test".into(),
        poll_interval: std::time::Duration::from_millis(1),
        paused_poll_interval: std::time::Duration::from_millis(1),
        stale_threshold: chrono::Duration::minutes(60),
        max_attempts: 3,
        max_backoff: std::time::Duration::from_secs(1),
        health_interval: std::time::Duration::from_secs(120),
        digest_interval: std::time::Duration::from_secs(300),
        merge_lock_threshold: chrono::Duration::minutes(5),
        notifier_webhook_url: None,
        default_branch_fallback: "main".into(),
        min_proposal_score: cadence_core::MIN_PROPOSAL_SCORE,
        wild_card_frequency: 0.2,
        tracing_filter: "info".into(),
    }
}

#[tokio::test]
async fn successful_scout_run_marks_the_job_done_and_enqueues_strategize() {
    let repo_host: Arc<dyn cadence_capabilities::RepoHost> = Arc::new(FakeRepoHost::new());
    let token_provider: Arc<dyn cadence_capabilities::TokenProvider> = Arc::new(FakeTokenProvider::new());
    let notifier: Arc<dyn cadence_capabilities::Notifier> = Arc::new(FakeNotifier::new());

    let project = Project::builder().build();
    let fake_store = FakeStore::new();
    fake_store.seed_project(project.clone());
    let cycle = fake_store.open_cycle(&project.id, &JobId::new(), false).await.unwrap();
    let store: Arc<dyn cadence_store::Store> = Arc::new(fake_store);
    let job = scout_job(project.id, cycle.id);

    let mut dispatch = StageDispatch::new();
    dispatch.register(JobType::Scout, Arc::new(ScriptedWorker(StageOutcome::ScoutDone)));

    let config = test_config();
    run_one(&job, &config, &store, &repo_host, &token_provider, &notifier, &dispatch).await.unwrap();

    let updated = store.get_job(&job.id).await.unwrap();
    assert_eq!(updated.status, JobStatus::Done);
}

#[tokio::test]
async fn a_paused_project_releases_the_job_instead_of_running_it() {
    let fake_store = FakeStore::new();
    let project = Project::builder().paused(true).build();
    fake_store.seed_project(project.clone());
    let job = Job {
        id: JobId::new(),
        project_id: project.id,
        payload: JobPayload::SelfImprove { notes: "n".into() },
        status: JobStatus::Processing,
        attempt_count: 0,
        worker_id: Some("w1".into()),
        locked_at: Some(chrono::Utc::now()),
        last_error: None,
        source_run_id: None,
        github_issue_number: 0,
        created_at: chrono::Utc::now(),
        completed_at: None,
    };
    fake_store.insert_job(&job).await.unwrap();

    let store: Arc<dyn cadence_store::Store> = Arc::new(fake_store);
    let repo_host: Arc<dyn cadence_capabilities::RepoHost> = Arc::new(FakeRepoHost::new());
    let token_provider: Arc<dyn cadence_capabilities::TokenProvider> = Arc::new(FakeTokenProvider::new());
    let notifier: Arc<dyn cadence_capabilities::Notifier> = Arc::new(FakeNotifier::new());
    let dispatch = StageDispatch::new();
    let config = test_config();

    run_one(&job, &config, &store, &repo_host, &token_provider, &notifier, &dispatch).await.unwrap();

    let untouched = store.get_job(&job.id).await.unwrap();
    assert_eq!(untouched.status, JobStatus::Pending);
}

#[tokio::test]
async fn a_failing_stage_resets_the_job_to_pending_without_bumping_attempt_count_itself() {
    // `attempt_count` is incremented exactly once, by `claim_next_job` on the
    // *next* claim — bumping it here too would double-count this attempt.
    let fake_store = FakeStore::new();
    let project = Project::builder().build();
    fake_store.seed_project(project.clone());
    let job = Job {
        id: JobId::new(),
        project_id: project.id,
        payload: JobPayload::SelfImprove { notes: "n".into() },
        status: JobStatus::Processing,
        attempt_count: 1,
        worker_id: Some("w1".into()),
        locked_at: Some(chrono::Utc::now()),
        last_error: None,
        source_run_id: None,
        github_issue_number: 0,
        created_at: chrono::Utc::now(),
        completed_at: None,
    };
    fake_store.insert_job(&job).await.unwrap();

    let store: Arc<dyn cadence_store::Store> = Arc::new(fake_store);
    let repo_host: Arc<dyn cadence_capabilities::RepoHost> = Arc::new(FakeRepoHost::new());
    let token_provider: Arc<dyn cadence_capabilities::TokenProvider> = Arc::new(FakeTokenProvider::new());
    let notifier: Arc<dyn cadence_capabilities::Notifier> = Arc::new(FakeNotifier::new());

    let mut dispatch = StageDispatch::new();
    dispatch.register(JobType::SelfImprove, Arc::new(AlwaysFails));
    let config = test_config();

    run_one(&job, &config, &store, &repo_host, &token_provider, &notifier, &dispatch).await.unwrap();

    let updated = store.get_job(&job.id).await.unwrap();
    assert_eq!(updated.status, JobStatus::Pending);
    assert_eq!(updated.attempt_count, 1);
}

#[tokio::test]
async fn a_job_is_not_permanently_failed_until_max_attempts_real_claims_are_exhausted() {
    let fake_store = FakeStore::new();
    let project = Project::builder().build();
    fake_store.seed_project(project.clone());
    let job = Job {
        id: JobId::new(),
        project_id: project.id,
        payload: JobPayload::SelfImprove { notes: "n".into() },
        status: JobStatus::Pending,
        attempt_count: 0,
        worker_id: None,
        locked_at: None,
        last_error: None,
        source_run_id: None,
        github_issue_number: 0,
        created_at: chrono::Utc::now(),
        completed_at: None,
    };
    fake_store.insert_job(&job).await.unwrap();

    let store: Arc<dyn cadence_store::Store> = Arc::new(fake_store);
    let repo_host: Arc<dyn cadence_capabilities::RepoHost> = Arc::new(FakeRepoHost::new());
    let token_provider: Arc<dyn cadence_capabilities::TokenProvider> = Arc::new(FakeTokenProvider::new());
    let notifier: Arc<dyn cadence_capabilities::Notifier> = Arc::new(FakeNotifier::new());

    let mut dispatch = StageDispatch::new();
    dispatch.register(JobType::SelfImprove, Arc::new(AlwaysFails));
    let config = test_config();

    for _ in 0..config.max_attempts {
        let claimed = store.claim_next_job("w1").await.unwrap().expect("job should still be claimable");
        run_one(&claimed, &config, &store, &repo_host, &token_provider, &notifier, &dispatch).await.unwrap();
    }

    let final_job = store.get_job(&job.id).await.unwrap();
    assert_eq!(final_job.status, JobStatus::Failed);
    assert_eq!(final_job.attempt_count, config.max_attempts);
}
