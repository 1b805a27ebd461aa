// SPDX-License-Identifier: MIT

//! The worker process: polls the store for jobs, dispatches each to its
//! stage, and applies the resulting cycle transition.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod poll_loop;
mod stage;
mod workspace;

pub use config::{Config, ConfigError};
pub use poll_loop::run;
pub use stage::{stage_timeout, StageContext, StageDispatch, StageError, StageOutcome, StageWorker};
pub use workspace::Workspace;

/// Installs the `tracing` subscriber the poll loop and every stage log
/// through, filtered by [`Config::tracing_filter`].
pub fn init_tracing(config: &Config) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&config.tracing_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
