use super::*;

struct AlwaysDone;

#[async_trait]
impl StageWorker for AlwaysDone {
    async fn run(&self, _ctx: StageContext) -> Result<StageOutcome, StageError> {
        Ok(StageOutcome::ScoutDone)
    }
}

#[test]
fn dispatch_looks_up_the_registered_stage_by_job_type() {
    let mut dispatch = StageDispatch::new();
    dispatch.register(JobType::Scout, Arc::new(AlwaysDone));

    assert!(dispatch.get(JobType::Scout).is_some());
    assert!(dispatch.get(JobType::Review).is_none());
}

#[test]
fn review_and_fix_build_get_the_short_timeout() {
    assert_eq!(stage_timeout(JobType::Review), Duration::from_secs(15 * 60));
    assert_eq!(stage_timeout(JobType::FixBuild), Duration::from_secs(15 * 60));
}

#[test]
fn scout_strategize_and_build_get_the_long_timeout() {
    assert_eq!(stage_timeout(JobType::Scout), Duration::from_secs(45 * 60));
    assert_eq!(stage_timeout(JobType::Strategize), Duration::from_secs(45 * 60));
    assert_eq!(stage_timeout(JobType::Build), Duration::from_secs(45 * 60));
}
