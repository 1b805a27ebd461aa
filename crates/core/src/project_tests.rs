use super::*;

#[test]
fn paused_project_is_not_actionable() {
    let project = Project::builder().paused(true).build();
    assert!(!project.is_actionable());
}

#[test]
fn audit_mode_is_not_actionable() {
    let project = Project::builder().autonomy_mode(AutonomyMode::Audit).build();
    assert!(!project.is_actionable());
}

#[test]
fn assist_and_automate_are_actionable_when_unpaused() {
    let assist = Project::builder().autonomy_mode(AutonomyMode::Assist).build();
    let automate = Project::builder().autonomy_mode(AutonomyMode::Automate).build();
    assert!(assist.is_actionable());
    assert!(automate.is_actionable());
}

#[test]
fn display_matches_lowercase_names() {
    assert_eq!(AutonomyMode::Audit.to_string(), "audit");
    assert_eq!(AutonomyMode::Assist.to_string(), "assist");
    assert_eq!(AutonomyMode::Automate.to_string(), "automate");
}
