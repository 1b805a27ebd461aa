use super::*;

#[test]
fn fresh_idea_is_pending() {
    let idea = UserIdea::builder().build();
    assert!(idea.is_pending());
}

#[test]
fn consumed_idea_is_not_pending() {
    let idea = UserIdea::builder().consumed(true).build();
    assert!(!idea.is_pending());
}
