// SPDX-License-Identifier: MIT

//! Typed configuration loaded once from the environment at process start,
//! following the daemon's `Config::load()` pattern.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub poll_interval: Duration,
    pub paused_poll_interval: Duration,
    pub stale_threshold: chrono::Duration,
    pub max_attempts: u32,
    pub max_backoff: Duration,
    pub health_interval: Duration,
    pub digest_interval: Duration,
    pub merge_lock_threshold: chrono::Duration,
    pub notifier_webhook_url: Option<String>,
    pub default_branch_fallback: String,
    pub min_proposal_score: f64,
    pub wild_card_frequency: f64,
    pub tracing_filter: String,
}

fn env_or(name: &'static str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_u64(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

fn parse_f64(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Loads every setting from the environment, falling back to the
    /// defaults named in the external-interfaces contract. Only
    /// `DATABASE_URL` is required.
    pub fn load() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            poll_interval: Duration::from_secs(parse_u64("CADENCE_POLL_INTERVAL_SECS", 5)?),
            paused_poll_interval: Duration::from_secs(parse_u64("CADENCE_PAUSED_POLL_INTERVAL_SECS", 30)?),
            stale_threshold: chrono::Duration::minutes(parse_u64("CADENCE_STALE_THRESHOLD_MINUTES", 60)? as i64),
            max_attempts: parse_u64("CADENCE_MAX_ATTEMPTS", 3)? as u32,
            max_backoff: Duration::from_secs(parse_u64("CADENCE_MAX_BACKOFF_SECS", 60)?),
            health_interval: Duration::from_secs(parse_u64("CADENCE_HEALTH_INTERVAL_SECS", 120)?),
            digest_interval: Duration::from_secs(parse_u64("CADENCE_DIGEST_INTERVAL_SECS", 300)?),
            merge_lock_threshold: chrono::Duration::minutes(parse_u64("CADENCE_MERGE_LOCK_THRESHOLD_MINUTES", 5)? as i64),
            notifier_webhook_url: std::env::var("CADENCE_NOTIFIER_WEBHOOK_URL").ok(),
            default_branch_fallback: env_or("CADENCE_DEFAULT_BRANCH_FALLBACK", "main"),
            min_proposal_score: parse_f64("CADENCE_MIN_PROPOSAL_SCORE", cadence_core::MIN_PROPOSAL_SCORE)?,
            wild_card_frequency: parse_f64("CADENCE_WILD_CARD_FREQUENCY", 0.2)?,
            tracing_filter: env_or("RUST_LOG", "info"),
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
