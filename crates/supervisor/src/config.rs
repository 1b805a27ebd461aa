// SPDX-License-Identifier: MIT

//! Typed configuration loaded once from the environment at process start,
//! following the same `Config::load()` pattern as the worker crate.

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
    /// Program to exec as the worker child, e.g. `"cadence-worker"`.
    pub worker_program: String,
    pub worker_args: Vec<String>,
    pub shutdown_grace: Duration,
    pub max_backoff: Duration,
    pub health_interval: Duration,
    pub digest_interval: Duration,
    pub stale_threshold: chrono::Duration,
    pub max_attempts: u32,
    pub merge_lock_threshold: chrono::Duration,
    pub wild_card_frequency: f64,
    pub notifier_webhook_url: Option<String>,
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

        let worker_args = std::env::var("CADENCE_WORKER_ARGS")
            .map(|raw| raw.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        Ok(Self {
            database_url,
            worker_program: env_or("CADENCE_WORKER_PROGRAM", "cadence-worker"),
            worker_args,
            shutdown_grace: Duration::from_secs(parse_u64("CADENCE_SHUTDOWN_GRACE_SECS", 5)?),
            max_backoff: Duration::from_secs(parse_u64("CADENCE_MAX_BACKOFF_SECS", 60)?),
            health_interval: Duration::from_secs(parse_u64("CADENCE_HEALTH_INTERVAL_SECS", 120)?),
            digest_interval: Duration::from_secs(parse_u64("CADENCE_DIGEST_INTERVAL_SECS", 300)?),
            stale_threshold: chrono::Duration::minutes(parse_u64("CADENCE_STALE_THRESHOLD_MINUTES", 60)? as i64),
            max_attempts: parse_u64("CADENCE_MAX_ATTEMPTS", 3)? as u32,
            merge_lock_threshold: chrono::Duration::minutes(parse_u64("CADENCE_MERGE_LOCK_THRESHOLD_MINUTES", 5)? as i64),
            wild_card_frequency: parse_f64("CADENCE_WILD_CARD_FREQUENCY", 0.2)?,
            notifier_webhook_url: std::env::var("CADENCE_NOTIFIER_WEBHOOK_URL").ok(),
            tracing_filter: env_or("RUST_LOG", "info"),
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
