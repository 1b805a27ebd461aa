use super::*;
use cadence_core::{BranchEvent, Job, JobPayload, LogLevel, Project, RunLog};
use cadence_store::FakeStore;

#[tokio::test]
async fn snapshot_counts_jobs_by_status_for_one_project() {
    let store = FakeStore::new();
    let project = Project::builder().build();
    let other = Project::builder().build();
    store.seed_project(project.clone());
    store.seed_project(other.clone());

    store
        .insert_job(
            &Job::builder()
                .project_id(project.id)
                .payload(JobPayload::SelfImprove { notes: String::new() })
                .status(JobStatus::Pending)
                .build(),
        )
        .await
        .unwrap();
    store
        .insert_job(
            &Job::builder()
                .project_id(project.id)
                .payload(JobPayload::SelfImprove { notes: String::new() })
                .status(JobStatus::Failed)
                .build(),
        )
        .await
        .unwrap();
    store
        .insert_job(
            &Job::builder()
                .project_id(other.id)
                .payload(JobPayload::SelfImprove { notes: String::new() })
                .status(JobStatus::Pending)
                .build(),
        )
        .await
        .unwrap();

    let event = BranchEvent::builder().project_id(project.id).event_type("build_started").build();
    store.insert_branch_event(&event).await.unwrap();

    let log = RunLog {
        id: cadence_core::RunLogId::new(),
        project_id: project.id,
        job_id: cadence_core::JobId::new(),
        level: LogLevel::Info,
        message: "scout started".into(),
        fields: serde_json::Value::Null,
        created_at: chrono::Utc::now(),
    };
    store.append_run_log(&log).await.unwrap();

    let snapshot = build_snapshot(&store, &project.id).await.unwrap();

    assert_eq!(snapshot.pending_jobs, 1);
    assert_eq!(snapshot.failed_jobs, 1);
    assert_eq!(snapshot.processing_jobs, 0);
    assert_eq!(snapshot.recent_events.len(), 1);
    assert!(snapshot.recent_events[0].contains("build_started"));
    assert_eq!(snapshot.recent_log_tail.len(), 1);
    assert!(snapshot.recent_log_tail[0].contains("scout started"));
}
