use super::*;

#[test]
fn oauth_markers_take_precedence() {
    assert_eq!(classify_error("401 Unauthorized: invalid_grant"), ErrorCategory::OAuth);
}

#[test]
fn conflict_markers_are_not_retried() {
    assert_eq!(classify_error("merge rejected: sha drift detected"), ErrorCategory::Conflict);
    assert!(!ErrorCategory::Conflict.is_retryable());
}

#[test]
fn stage_failure_markers_are_not_retried() {
    assert_eq!(classify_error("builder produced no changes"), ErrorCategory::StageFailure);
    assert!(!ErrorCategory::StageFailure.is_retryable());
}

#[test]
fn unrecognized_errors_default_to_transient_and_retryable() {
    let category = classify_error("connection reset by peer");
    assert_eq!(category, ErrorCategory::TransientIo);
    assert!(category.is_retryable());
}

#[test]
fn fatal_markers_propagate() {
    assert_eq!(classify_error("schema mismatch in row decode"), ErrorCategory::Fatal);
}
