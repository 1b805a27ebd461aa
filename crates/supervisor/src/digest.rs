// SPDX-License-Identifier: MIT

//! The supervisor's periodic digest: a human-readable summary of queue
//! health, published through the `Notifier` capability.

use std::time::Duration;

use cadence_capabilities::Notifier;
use cadence_store::Store;

use crate::error::SupervisorResult;

pub struct DigestStats {
    pub uptime: Duration,
    pub restart_count: u32,
}

/// Builds and publishes one digest message covering job counts, in-flight
/// proposal counts, worker uptime, and the restart counter.
pub async fn publish_digest(store: &dyn Store, notifier: &dyn Notifier, stats: &DigestStats) -> SupervisorResult<()> {
    let counts = store.job_counts().await?;

    let mut merged = 0u64;
    let mut building = 0u64;
    for project in store.list_active_projects().await? {
        let proposals = store.count_proposals_by_status(&project.id).await?;
        merged += proposals.done;
        building += proposals.implementing;
    }

    let message = format!(
        "queue: {} pending, {} processing, {} failed | proposals: {} merged, {} building | uptime {}s, {} restarts",
        counts.pending,
        counts.processing,
        counts.failed,
        merged,
        building,
        stats.uptime.as_secs(),
        stats.restart_count,
    );

    notifier.notify(&message, None).await;
    Ok(())
}

#[cfg(test)]
#[path = "digest_tests.rs"]
mod tests;
