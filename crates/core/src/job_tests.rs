use super::*;
use crate::ids::CycleId;

#[test]
fn payload_job_type_matches_variant() {
    let payload = JobPayload::Scout { cycle_id: CycleId::new() };
    assert_eq!(payload.job_type(), JobType::Scout);
}

#[test]
fn scout_and_strategize_carry_cycle_id() {
    let cycle_id = CycleId::new();
    let scout = JobPayload::Scout { cycle_id };
    let strategize = JobPayload::Strategize { cycle_id, wild_card: true };
    assert_eq!(scout.cycle_id(), Some(cycle_id));
    assert_eq!(strategize.cycle_id(), Some(cycle_id));
}

#[test]
fn build_review_fix_build_carry_proposal_id() {
    let proposal_id = ProposalId::new();
    let build = JobPayload::Build {
        proposal_id,
        branch_name: "proposals/x".into(),
        spec: String::new(),
        title: String::new(),
        pipeline_run_id: PipelineRunId::new(),
    };
    assert_eq!(build.proposal_id(), Some(proposal_id));
}

#[test]
fn pending_job_must_have_no_worker() {
    let job = Job::builder().status(JobStatus::Pending).build();
    assert!(job.is_consistent());

    let inconsistent = Job::builder().status(JobStatus::Pending).worker_id("w1").build();
    assert!(!inconsistent.is_consistent());
}

#[test]
fn processing_job_must_have_worker_and_lock() {
    let job = Job::builder()
        .status(JobStatus::Processing)
        .worker_id("w1")
        .locked_at(Utc::now())
        .build();
    assert!(job.is_consistent());

    let missing_lock = Job::builder().status(JobStatus::Processing).worker_id("w1").build();
    assert!(!missing_lock.is_consistent());
}
