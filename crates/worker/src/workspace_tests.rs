use super::*;
use cadence_core::JobId;

#[test]
fn create_returns_an_existing_directory() {
    let job_id = JobId::new();
    let workspace = Workspace::create(&job_id).unwrap();
    assert!(workspace.path().is_dir());
}

#[test]
fn drop_removes_the_directory() {
    let job_id = JobId::new();
    let workspace = Workspace::create(&job_id).unwrap();
    let path = workspace.path().to_path_buf();
    drop(workspace);
    assert!(!path.exists());
}
