use super::*;

#[test]
fn backoff_doubles_each_restart_and_caps() {
    let max = Duration::from_secs(60);
    assert_eq!(restart_backoff(0, max), Duration::from_secs(5));
    assert_eq!(restart_backoff(1, max), Duration::from_secs(10));
    assert_eq!(restart_backoff(2, max), Duration::from_secs(20));
    assert_eq!(restart_backoff(10, max), max);
}

#[tokio::test]
async fn a_process_that_exits_zero_is_a_graceful_exit() {
    let mut child = spawn_worker("sh", &["-c".to_string(), "exit 0".to_string()]).unwrap();
    let status = child.wait().await.unwrap();
    assert!(is_graceful_exit(status));
}

#[tokio::test]
async fn a_crashing_process_is_not_a_graceful_exit() {
    let mut child = spawn_worker("sh", &["-c".to_string(), "exit 1".to_string()]).unwrap();
    let status = child.wait().await.unwrap();
    assert!(!is_graceful_exit(status));
}

#[tokio::test]
async fn shutdown_gracefully_terminates_a_long_running_child() {
    let mut child = spawn_worker("sleep", &["30".to_string()]).unwrap();
    shutdown_gracefully(&mut child, Duration::from_secs(2)).await.unwrap();
    let status = child.try_wait().unwrap();
    assert!(status.is_some());
}
