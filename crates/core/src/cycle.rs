// SPDX-License-Identifier: MIT

//! Cycle entity: one scout→strategize→build→review→merge iteration.
//!
//! Has its own identity rather than being aliased to the opening scout job's
//! id — the scout job still *opens* the cycle it is first in, but a cycle
//! outlives that one job and accumulates proposals across the iteration.

use crate::ids::{CycleId, JobId, ProjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cycle {
    pub id: CycleId,
    pub project_id: ProjectId,
    /// The scout job that opened this cycle.
    pub opening_job_id: JobId,
    /// Resolved once, via Bernoulli(wild_card_frequency), when the cycle opens.
    pub wild_card: bool,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Cycle {
    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }
}

crate::builder! {
    pub struct CycleBuilder => Cycle {
        computed { id: CycleId = CycleId::new() }
        set { project_id: ProjectId = ProjectId::new() }
        computed { opening_job_id: JobId = JobId::new() }
        set { wild_card: bool = false }
        computed { opened_at: DateTime<Utc> = Utc::now() }
        option { closed_at: DateTime<Utc> = None }
    }
}

#[cfg(test)]
#[path = "cycle_tests.rs"]
mod tests;
