use super::*;

fn snapshot() -> DiagnosticSnapshot {
    DiagnosticSnapshot {
        project_id: "proj_test".to_string(),
        pending_jobs: 0,
        processing_jobs: 1,
        failed_jobs: 0,
        recent_events: vec![],
        recent_log_tail: vec![],
    }
}

#[cfg(any(test, feature = "test-support"))]
#[tokio::test]
async fn fake_diagnoser_defaults_to_send_notification() {
    let diagnoser = FakeDiagnoser::new();
    let diagnosis = diagnoser.diagnose(&snapshot()).await.unwrap();
    assert_eq!(diagnosis.actions, vec![DiagnosisAction::SendNotification]);
}

#[cfg(any(test, feature = "test-support"))]
#[tokio::test]
async fn fake_diagnoser_returns_scripted_response() {
    let diagnoser = FakeDiagnoser::new();
    diagnoser.set_next(Diagnosis {
        summary: "job stuck".to_string(),
        actions: vec![DiagnosisAction::RetriggerJob],
        target_id: Some("job-abc".to_string()),
    });
    let diagnosis = diagnoser.diagnose(&snapshot()).await.unwrap();
    assert_eq!(diagnosis.actions, vec![DiagnosisAction::RetriggerJob]);
    assert_eq!(diagnosis.target_id.as_deref(), Some("job-abc"));
}
