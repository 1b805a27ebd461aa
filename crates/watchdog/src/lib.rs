// SPDX-License-Identifier: MIT

//! The watchdog: periodically asks a `Diagnoser` to read one project's queue
//! state and proposes a remediation, then validates and applies whatever it
//! recommends. Runs as its own sweep, independent of the supervisor's health
//! sweep and digest — this is judgment over irregular, surprising state, not
//! the deterministic backoff/restart the supervisor already handles.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod actions;
mod error;
mod snapshot;

pub use actions::{apply_diagnosis, AppliedAction, STUCK_JOB_THRESHOLD};
pub use error::{WatchdogError, WatchdogResult};
pub use snapshot::build_snapshot;

use cadence_capabilities::{Diagnoser, Notifier};
use cadence_core::ProjectId;
use cadence_store::Store;
use tracing::info;

/// Builds one project's snapshot, asks `diagnoser` for a diagnosis, and
/// applies it. Returns the applied/skipped outcomes for the caller to log
/// or assert on.
pub async fn run_watchdog_pass(
    store: &dyn Store,
    notifier: &dyn Notifier,
    diagnoser: &dyn Diagnoser,
    project_id: &ProjectId,
) -> WatchdogResult<Vec<AppliedAction>> {
    let snapshot = snapshot::build_snapshot(store, project_id).await?;
    let diagnosis = diagnoser.diagnose(&snapshot).await?;
    info!(project = %project_id, summary = %diagnosis.summary, "watchdog diagnosis");
    actions::apply_diagnosis(store, notifier, project_id, &diagnosis).await
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
