use super::*;

#[test]
fn fresh_run_starts_queued_with_no_result() {
    let run = PipelineRun::builder().build();
    assert_eq!(run.stage, Stage::Queued);
    assert!(run.result.is_none());
    assert!(run.completed_at.is_none());
}

#[test]
fn deployed_run_carries_a_result() {
    let run = PipelineRun::builder()
        .stage(Stage::Deployed)
        .result(Some(RunResult::Success))
        .pr_number(42)
        .build();
    assert_eq!(run.pr_number, Some(42));
    assert_eq!(run.result, Some(RunResult::Success));
}
