use super::*;

#[tokio::test]
async fn records_message_and_thread_key() {
    let notifier = FakeNotifier::new();
    notifier.notify("build started", Some("proj-1")).await;
    notifier.notify("cycle complete", None).await;

    let calls = notifier.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].message, "build started");
    assert_eq!(calls[0].thread_key.as_deref(), Some("proj-1"));
    assert_eq!(calls[1].thread_key, None);
}
