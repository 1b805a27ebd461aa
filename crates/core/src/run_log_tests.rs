use super::*;

#[test]
fn default_level_is_info() {
    let log = RunLog::builder().build();
    assert_eq!(log.level, LogLevel::Info);
}

#[test]
fn level_display_matches_lowercase_name() {
    assert_eq!(LogLevel::Error.to_string(), "error");
}
