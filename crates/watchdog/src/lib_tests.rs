use super::*;
use cadence_capabilities::{Diagnosis, DiagnosisAction, FakeDiagnoser, FakeNotifier};
use cadence_core::Project;
use cadence_store::FakeStore;

#[tokio::test]
async fn pass_diagnoses_and_applies_default_notification() {
    let store = FakeStore::new();
    let project = Project::builder().build();
    store.seed_project(project.clone());

    let notifier = FakeNotifier::new();
    let diagnoser = FakeDiagnoser::new();
    diagnoser.set_next(Diagnosis {
        summary: "queue looks stuck".to_string(),
        actions: vec![DiagnosisAction::SendNotification],
        target_id: None,
    });

    let results = run_watchdog_pass(&store, &notifier, &diagnoser, &project.id).await.unwrap();

    assert_eq!(results, vec![AppliedAction::Applied(DiagnosisAction::SendNotification)]);
    assert_eq!(notifier.calls().len(), 1);
    assert!(notifier.calls()[0].message.contains("queue looks stuck"));
}
