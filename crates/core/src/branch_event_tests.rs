use super::*;

#[test]
fn default_event_carries_no_branch_or_commit() {
    let event = BranchEvent::builder().build();
    assert!(event.branch_name.is_none());
    assert!(event.commit_sha.is_none());
}

#[test]
fn event_type_compares_against_well_known_kind_strings() {
    let event = BranchEvent::builder().event_type(kinds::PR_MERGED).build();
    assert_eq!(event.event_type, *kinds::PR_MERGED);
}

#[test]
fn actor_display_matches_lowercase_name() {
    assert_eq!(Actor::Watchdog.to_string(), "watchdog");
    assert_eq!(Actor::Supervisor.to_string(), "supervisor");
}
