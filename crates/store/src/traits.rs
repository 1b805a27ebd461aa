// SPDX-License-Identifier: MIT

//! The Store capability: narrow typed operations over the durable tables.
//! Every state-changing method is transactional — one SQL transaction per
//! call in the Postgres adapter.

use async_trait::async_trait;
use cadence_core::{
    BranchEvent, Checkpoint, Cycle, Finding, Job, JobStatus, PipelineRun, Project, Proposal,
    ProposalStatus, RunLog, StrategyMemory,
};
use cadence_core::{CycleId, JobId, PipelineRunId, ProjectId, ProposalId};
use chrono::{DateTime, Utc};

use crate::error::StoreResult;

/// Job counts by status, grouped by whether the run is in flight — used by
/// the supervisor's periodic digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobCounts {
    pub pending: u64,
    pub processing: u64,
    pub done: u64,
    pub failed: u64,
}

/// Proposal counts by status for one project, used by the supervisor's
/// periodic digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProposalCounts {
    pub draft: u64,
    pub approved: u64,
    pub implementing: u64,
    pub done: u64,
    pub rejected: u64,
}

/// Patch applied by [`Store::update_job`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub attempt_count: Option<u32>,
    pub worker_id: Option<Option<String>>,
    pub locked_at: Option<Option<DateTime<Utc>>>,
    pub last_error: Option<Option<String>>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl JobPatch {
    pub fn done() -> Self {
        Self { status: Some(JobStatus::Done), completed_at: Some(Some(Utc::now())), ..Default::default() }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatus::Failed),
            last_error: Some(Some(reason.into())),
            completed_at: Some(Some(Utc::now())),
            ..Default::default()
        }
    }

    pub fn reset_to_pending() -> Self {
        Self {
            status: Some(JobStatus::Pending),
            worker_id: Some(None),
            locked_at: Some(None),
            ..Default::default()
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync + 'static {
    async fn get_project(&self, project_id: &ProjectId) -> StoreResult<Project>;
    async fn update_project(&self, project: &Project) -> StoreResult<()>;
    async fn list_active_projects(&self) -> StoreResult<Vec<Project>>;

    async fn open_cycle(&self, project_id: &ProjectId, scout_job_id: &JobId, wild_card: bool) -> StoreResult<Cycle>;
    async fn get_cycle(&self, cycle_id: &CycleId) -> StoreResult<Cycle>;
    async fn close_cycle(&self, cycle_id: &CycleId) -> StoreResult<()>;

    async fn insert_proposal(&self, proposal: &Proposal) -> StoreResult<()>;
    async fn update_proposal_status(
        &self,
        proposal_id: &ProposalId,
        status: ProposalStatus,
        reject_reason: Option<&str>,
        branch_name: Option<&str>,
    ) -> StoreResult<()>;
    async fn get_proposal(&self, proposal_id: &ProposalId) -> StoreResult<Proposal>;
    async fn list_draft_proposals(&self, project_id: &ProjectId, cycle_id: &CycleId) -> StoreResult<Vec<Proposal>>;
    async fn list_proposals_in_cycle(&self, cycle_id: &CycleId) -> StoreResult<Vec<Proposal>>;
    async fn count_active_branches(&self, project_id: &ProjectId) -> StoreResult<u32>;
    /// Tally of a project's proposals by status, for the supervisor digest.
    async fn count_proposals_by_status(&self, project_id: &ProjectId) -> StoreResult<ProposalCounts>;

    async fn insert_job(&self, job: &Job) -> StoreResult<()>;
    async fn get_job(&self, job_id: &JobId) -> StoreResult<Job>;
    async fn update_job(&self, job_id: &JobId, patch: JobPatch) -> StoreResult<()>;
    async fn claim_next_job(&self, worker_id: &str) -> StoreResult<Option<Job>>;
    async fn release_job(&self, job_id: &JobId) -> StoreResult<()>;
    /// Jobs currently in `status`, for the supervisor's health sweep.
    async fn list_jobs_by_status(&self, status: JobStatus) -> StoreResult<Vec<Job>>;
    async fn has_pending_or_processing_job(
        &self,
        project_id: &ProjectId,
        job_type: cadence_core::JobType,
    ) -> StoreResult<bool>;
    /// Stale-reap sweep: resets or fails jobs stuck in `processing` past `threshold`.
    /// Returns the ids of jobs that were reset to `pending`.
    async fn reap_stale_jobs(&self, threshold: chrono::Duration, max_attempts: u32) -> StoreResult<Vec<JobId>>;
    /// Tally of jobs by status across every project, for the supervisor digest.
    async fn job_counts(&self) -> StoreResult<JobCounts>;

    async fn insert_pipeline_run(&self, run: &PipelineRun) -> StoreResult<()>;
    async fn get_pipeline_run(&self, run_id: &PipelineRunId) -> StoreResult<PipelineRun>;
    async fn update_pipeline_run(
        &self,
        run_id: &PipelineRunId,
        stage: cadence_core::PipelineStage,
        result: Option<cadence_core::RunResult>,
        pr_number: Option<u64>,
    ) -> StoreResult<()>;

    async fn insert_branch_event(&self, event: &BranchEvent) -> StoreResult<()>;
    /// Insert only if no row exists yet for `(project, branch, event_type)` —
    /// backs the `cycle_completed` idempotence guarantee.
    async fn insert_branch_event_once(&self, event: &BranchEvent) -> StoreResult<bool>;
    /// Most recent events for a project, newest first, capped at `limit` —
    /// backs the watchdog's diagnostic snapshot.
    async fn list_recent_branch_events(&self, project_id: &ProjectId, limit: u32) -> StoreResult<Vec<BranchEvent>>;

    async fn insert_checkpoint(&self, checkpoint: &Checkpoint) -> StoreResult<()>;

    async fn insert_finding(&self, finding: &Finding) -> StoreResult<()>;
    async fn list_findings(&self, cycle_id: &CycleId) -> StoreResult<Vec<Finding>>;

    async fn append_run_log(&self, log: &RunLog) -> StoreResult<()>;
    /// Most recent log lines for a project, newest first, capped at `limit` —
    /// backs the watchdog's diagnostic snapshot.
    async fn list_recent_run_logs(&self, project_id: &ProjectId, limit: u32) -> StoreResult<Vec<RunLog>>;

    async fn insert_strategy_memory(&self, memory: &StrategyMemory) -> StoreResult<()>;

    /// Conditional update: `merge_in_progress` false→true. Returns `false` if
    /// another merge is already in progress for this project.
    async fn try_acquire_merge_lock(&self, project_id: &ProjectId) -> StoreResult<bool>;
    async fn release_merge_lock(&self, project_id: &ProjectId) -> StoreResult<()>;
    /// Force-release locks held longer than `threshold` (supervisor health sweep).
    async fn release_stale_merge_locks(&self, threshold: chrono::Duration) -> StoreResult<Vec<ProjectId>>;
}
