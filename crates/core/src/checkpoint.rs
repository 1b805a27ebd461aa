// SPDX-License-Identifier: MIT

//! Checkpoint entity: a recoverable commit pointer on the default branch.

use crate::ids::{CheckpointId, CycleId, ProjectId, ProposalId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointKind {
    Merge,
    CycleComplete,
}

crate::simple_display! {
    CheckpointKind {
        Merge => "merge",
        CycleComplete => "cycle_complete",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: CheckpointId,
    pub project_id: ProjectId,
    pub cycle_id: Option<CycleId>,
    pub proposal_id: Option<ProposalId>,
    pub kind: CheckpointKind,
    pub commit_sha: String,
    pub pr_number: Option<u64>,
    pub branch_name: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

crate::builder! {
    pub struct CheckpointBuilder => Checkpoint {
        computed { id: CheckpointId = CheckpointId::new() }
        set { project_id: ProjectId = ProjectId::new() }
        option { cycle_id: CycleId = None }
        option { proposal_id: ProposalId = None }
        set { kind: CheckpointKind = CheckpointKind::Merge }
        into { commit_sha: String = "0000000000000000000000000000000000000000" }
        option { pr_number: u64 = None }
        option { branch_name: String = None }
        set { metadata: serde_json::Value = serde_json::Value::Null }
        computed { created_at: DateTime<Utc> = Utc::now() }
    }
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;
