use super::*;
use cadence_core::Project;

fn seeded_store() -> (FakeStore, ProjectId) {
    let store = FakeStore::new();
    let project = Project::builder().build();
    let id = project.id;
    store.seed_project(project);
    (store, id)
}

#[tokio::test]
async fn claim_next_job_returns_jobs_in_fifo_order() {
    let (store, project_id) = seeded_store();
    let first = Job::builder().project_id(project_id).build();
    let second = Job::builder().project_id(project_id).build();
    store.insert_job(&first).await.unwrap();
    store.insert_job(&second).await.unwrap();

    let claimed = store.claim_next_job("w1").await.unwrap().unwrap();
    assert_eq!(claimed.id, first.id);
    assert_eq!(claimed.status, JobStatus::Processing);
    assert_eq!(claimed.attempt_count, 1);
}

#[tokio::test]
async fn claim_next_job_never_returns_the_same_row_twice() {
    let (store, project_id) = seeded_store();
    let job = Job::builder().project_id(project_id).build();
    store.insert_job(&job).await.unwrap();

    store.claim_next_job("w1").await.unwrap();
    let second = store.claim_next_job("w2").await.unwrap();
    assert!(second.is_none());
}

#[tokio::test]
async fn merge_lock_is_exclusive() {
    let (store, project_id) = seeded_store();
    assert!(store.try_acquire_merge_lock(&project_id).await.unwrap());
    assert!(!store.try_acquire_merge_lock(&project_id).await.unwrap());

    store.release_merge_lock(&project_id).await.unwrap();
    assert!(store.try_acquire_merge_lock(&project_id).await.unwrap());
}

#[tokio::test]
async fn branch_event_once_is_idempotent() {
    let (store, project_id) = seeded_store();
    let event = BranchEvent::builder().project_id(project_id).event_type("cycle_completed").build();
    assert!(store.insert_branch_event_once(&event).await.unwrap());
    assert!(!store.insert_branch_event_once(&event).await.unwrap());
    assert_eq!(store.branch_events().len(), 1);
}

#[tokio::test]
async fn reap_stale_jobs_resets_under_max_attempts_and_fails_over() {
    let (store, project_id) = seeded_store();
    let job = Job::builder()
        .project_id(project_id)
        .status(JobStatus::Processing)
        .worker_id("w1")
        .locked_at(Utc::now() - chrono::Duration::hours(2))
        .attempt_count(1)
        .build();
    store.insert_job(&job).await.unwrap();

    let reset = store.reap_stale_jobs(chrono::Duration::minutes(60), 3).await.unwrap();
    assert_eq!(reset, vec![job.id]);
    let reloaded = store.get_job(&job.id).await.unwrap();
    assert_eq!(reloaded.status, JobStatus::Pending);
}

#[tokio::test]
async fn job_counts_tallies_by_status() {
    let (store, project_id) = seeded_store();
    store.insert_job(&Job::builder().project_id(project_id).status(JobStatus::Pending).build()).await.unwrap();
    store.insert_job(&Job::builder().project_id(project_id).status(JobStatus::Failed).build()).await.unwrap();
    store.insert_job(&Job::builder().project_id(project_id).status(JobStatus::Failed).build()).await.unwrap();

    let counts = store.job_counts().await.unwrap();
    assert_eq!(counts.pending, 1);
    assert_eq!(counts.failed, 2);
    assert_eq!(counts.processing, 0);
}

#[tokio::test]
async fn list_recent_branch_events_returns_newest_first_and_respects_limit() {
    let (store, project_id) = seeded_store();
    let older = BranchEvent::builder().project_id(project_id).event_type("build_started").build();
    store.insert_branch_event(&older).await.unwrap();
    let newer = BranchEvent::builder().project_id(project_id).event_type("build_failed").build();
    store.insert_branch_event(&newer).await.unwrap();

    let events = store.list_recent_branch_events(&project_id, 1).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, newer.id);
}

#[tokio::test]
async fn list_recent_run_logs_filters_by_project() {
    let (store, project_id) = seeded_store();
    let other_project = ProjectId::new();
    let mine = RunLog {
        id: cadence_core::RunLogId::new(),
        project_id,
        job_id: JobId::new(),
        level: cadence_core::LogLevel::Info,
        message: "scout started".into(),
        fields: serde_json::Value::Null,
        created_at: Utc::now(),
    };
    let theirs = RunLog {
        id: cadence_core::RunLogId::new(),
        project_id: other_project,
        job_id: JobId::new(),
        level: cadence_core::LogLevel::Info,
        message: "unrelated".into(),
        fields: serde_json::Value::Null,
        created_at: Utc::now(),
    };
    store.append_run_log(&mine).await.unwrap();
    store.append_run_log(&theirs).await.unwrap();

    let logs = store.list_recent_run_logs(&project_id, 10).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].message, "scout started");
}
