use super::*;

#[test]
fn default_severity_is_info() {
    let finding = Finding::builder().build();
    assert_eq!(finding.severity, Severity::Info);
}

#[test]
fn severity_display_matches_lowercase_name() {
    assert_eq!(Severity::Major.to_string(), "major");
}
