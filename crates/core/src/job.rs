// SPDX-License-Identifier: MIT

//! Job entity and its typed payload.

use crate::ids::{CycleId, JobId, PipelineRunId, ProjectId, ProposalId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    Scout,
    Strategize,
    Build,
    Review,
    FixBuild,
    SelfImprove,
}

crate::simple_display! {
    JobType {
        Scout => "scout",
        Strategize => "strategize",
        Build => "build",
        Review => "review",
        FixBuild => "fix_build",
        SelfImprove => "self_improve",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Done,
    Failed,
}

crate::simple_display! {
    JobStatus {
        Pending => "pending",
        Processing => "processing",
        Done => "done",
        Failed => "failed",
    }
}

/// Tagged payload, one variant per [`JobType`]. Each variant carries
/// exactly the fields its stage needs — never an opaque blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "job_type", rename_all = "snake_case")]
pub enum JobPayload {
    Scout { cycle_id: CycleId },
    Strategize { cycle_id: CycleId, wild_card: bool },
    Build { proposal_id: ProposalId, branch_name: String, spec: String, title: String, pipeline_run_id: PipelineRunId },
    Review {
        proposal_id: ProposalId,
        pipeline_run_id: PipelineRunId,
        pr_number: u64,
        head_sha: String,
        branch_name: String,
        /// Counts fix_build→review round trips; controls retry-once semantics.
        remediation_attempt: u32,
    },
    FixBuild { proposal_id: ProposalId, pipeline_run_id: PipelineRunId, branch_name: String, concerns: Vec<String> },
    SelfImprove { notes: String },
}

impl JobPayload {
    pub fn job_type(&self) -> JobType {
        match self {
            JobPayload::Scout { .. } => JobType::Scout,
            JobPayload::Strategize { .. } => JobType::Strategize,
            JobPayload::Build { .. } => JobType::Build,
            JobPayload::Review { .. } => JobType::Review,
            JobPayload::FixBuild { .. } => JobType::FixBuild,
            JobPayload::SelfImprove { .. } => JobType::SelfImprove,
        }
    }

    pub fn cycle_id(&self) -> Option<CycleId> {
        match self {
            JobPayload::Scout { cycle_id } => Some(*cycle_id),
            JobPayload::Strategize { cycle_id, .. } => Some(*cycle_id),
            _ => None,
        }
    }

    pub fn proposal_id(&self) -> Option<ProposalId> {
        match self {
            JobPayload::Build { proposal_id, .. }
            | JobPayload::Review { proposal_id, .. }
            | JobPayload::FixBuild { proposal_id, .. } => Some(*proposal_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub project_id: ProjectId,
    pub payload: JobPayload,
    pub status: JobStatus,
    pub attempt_count: u32,
    pub worker_id: Option<String>,
    pub locked_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub source_run_id: Option<JobId>,
    /// Opaque correlator kept for operator debugging; 0 if not applicable.
    pub github_issue_number: i64,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn job_type(&self) -> JobType {
        self.payload.job_type()
    }

    /// Invariant: status=processing ⇒ worker_id and locked_at are set;
    /// status=pending ⇒ worker_id is null.
    pub fn is_consistent(&self) -> bool {
        match self.status {
            JobStatus::Processing => self.worker_id.is_some() && self.locked_at.is_some(),
            JobStatus::Pending => self.worker_id.is_none(),
            JobStatus::Done | JobStatus::Failed => true,
        }
    }
}

crate::builder! {
    pub struct JobBuilder => Job {
        computed { id: JobId = JobId::new() }
        set { project_id: ProjectId = ProjectId::new() }
        set { payload: JobPayload = JobPayload::SelfImprove { notes: String::new() } }
        set { status: JobStatus = JobStatus::Pending }
        set { attempt_count: u32 = 0 }
        option { worker_id: String = None }
        option { locked_at: DateTime<Utc> = None }
        option { last_error: String = None }
        option { source_run_id: JobId = None }
        set { github_issue_number: i64 = 0 }
        computed { created_at: DateTime<Utc> = Utc::now() }
        option { completed_at: DateTime<Utc> = None }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
