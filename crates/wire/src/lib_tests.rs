use super::*;
use cadence_core::{Job, JobPayload, JobStatus, Project};

#[test]
fn project_summary_reflects_autonomy_mode_as_string() {
    let project = Project::builder().host_repo_ref("acme/widgets").build();
    let summary = ProjectSummary::from(&project);
    assert_eq!(summary.host_repo_ref, "acme/widgets");
    assert_eq!(summary.autonomy_mode, "automate");
}

#[test]
fn job_summary_carries_attempt_count_and_error() {
    let job = Job::builder()
        .payload(JobPayload::SelfImprove { notes: String::new() })
        .status(JobStatus::Failed)
        .attempt_count(2)
        .last_error("timed out")
        .build();
    let summary = JobSummary::from(&job);
    assert_eq!(summary.status, "failed");
    assert_eq!(summary.attempt_count, 2);
    assert_eq!(summary.last_error.as_deref(), Some("timed out"));
}
