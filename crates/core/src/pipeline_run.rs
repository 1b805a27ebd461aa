// SPDX-License-Identifier: MIT

//! PipelineRun entity: per-proposal execution record.

use crate::ids::{PipelineRunId, ProjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Queued,
    Running,
    Validating,
    Deployed,
    Failed,
}

crate::simple_display! {
    Stage {
        Queued => "queued",
        Running => "running",
        Validating => "validating",
        Deployed => "deployed",
        Failed => "failed",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunResult {
    Success,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    pub id: PipelineRunId,
    pub project_id: ProjectId,
    pub stage: Stage,
    pub pr_number: Option<u64>,
    pub result: Option<RunResult>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

crate::builder! {
    pub struct PipelineRunBuilder => PipelineRun {
        computed { id: PipelineRunId = PipelineRunId::new() }
        set { project_id: ProjectId = ProjectId::new() }
        set { stage: Stage = Stage::Queued }
        option { pr_number: u64 = None }
        set { result: Option<RunResult> = None }
        computed { started_at: DateTime<Utc> = Utc::now() }
        option { completed_at: DateTime<Utc> = None }
    }
}

#[cfg(test)]
#[path = "pipeline_run_tests.rs"]
mod tests;
