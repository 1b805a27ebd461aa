use super::*;
use serial_test::serial;

fn clear_env() {
    for key in [
        "DATABASE_URL",
        "CADENCE_POLL_INTERVAL_SECS",
        "CADENCE_MAX_ATTEMPTS",
        "CADENCE_MIN_PROPOSAL_SCORE",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn missing_database_url_is_an_error() {
    clear_env();
    let result = Config::load();
    assert!(matches!(result, Err(ConfigError::Missing("DATABASE_URL"))));
}

#[test]
#[serial]
fn defaults_apply_when_only_database_url_is_set() {
    clear_env();
    std::env::set_var("DATABASE_URL", "postgres://localhost/cadence");
    let config = Config::load().unwrap();
    assert_eq!(config.poll_interval, std::time::Duration::from_secs(5));
    assert_eq!(config.max_attempts, 3);
    assert!((config.min_proposal_score - cadence_core::MIN_PROPOSAL_SCORE).abs() < f64::EPSILON);
    clear_env();
}

#[test]
#[serial]
fn overrides_are_honored() {
    clear_env();
    std::env::set_var("DATABASE_URL", "postgres://localhost/cadence");
    std::env::set_var("CADENCE_POLL_INTERVAL_SECS", "10");
    std::env::set_var("CADENCE_MAX_ATTEMPTS", "5");
    let config = Config::load().unwrap();
    assert_eq!(config.poll_interval, std::time::Duration::from_secs(10));
    assert_eq!(config.max_attempts, 5);
    clear_env();
}
