// SPDX-License-Identifier: MIT

//! Postgres adapter for the [`crate::Store`] capability, built on `sqlx`.

mod rows;

use async_trait::async_trait;
use cadence_core::{
    BranchEvent, Checkpoint, Cycle, Finding, Job, JobStatus, JobType, PipelineRun, PipelineStage,
    Project, Proposal, ProposalStatus, RunLog, RunResult, StrategyMemory,
};
use cadence_core::{CycleId, JobId, PipelineRunId, ProjectId, ProposalId};
use chrono::Utc;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::error::{StoreError, StoreResult};
use crate::traits::{JobCounts, JobPatch, ProposalCounts, Store};
use rows::{
    BranchEventRow, CheckpointRow, CycleRow, FindingRow, JobRow, PipelineRunRow, ProjectRow,
    ProposalRow, RunLogRow,
};

/// Thin wrapper over a connection pool. All state-changing methods run in a
/// single transaction (`pool.begin()` ... `tx.commit()`).
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(StoreError::from)?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get_project(&self, project_id: &ProjectId) -> StoreResult<Project> {
        let row: ProjectRow = sqlx::query_as("SELECT * FROM projects WHERE id = $1")
            .bind(project_id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from)?;
        row.try_into()
    }

    async fn update_project(&self, project: &Project) -> StoreResult<()> {
        sqlx::query(
            "UPDATE projects SET host_repo_ref = $2, installation_id = $3, default_branch = $4, \
             autonomy_mode = $5, max_concurrent_branches = $6, risk_paths = $7, paused = $8, \
             merge_in_progress = $9, scout_schedule = $10, wild_card_frequency = $11, \
             product_context = $12, strategic_nudges = $13 WHERE id = $1",
        )
        .bind(project.id.as_str())
        .bind(&project.host_repo_ref)
        .bind(&project.installation_id)
        .bind(&project.default_branch)
        .bind(project.autonomy_mode.to_string())
        .bind(project.max_concurrent_branches as i32)
        .bind(serde_json::to_value(&project.risk_paths).unwrap_or_default())
        .bind(project.paused)
        .bind(project.merge_in_progress)
        .bind(&project.scout_schedule)
        .bind(project.wild_card_frequency)
        .bind(&project.product_context)
        .bind(serde_json::to_value(&project.strategic_nudges).unwrap_or_default())
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(())
    }

    async fn list_active_projects(&self) -> StoreResult<Vec<Project>> {
        let rows: Vec<ProjectRow> =
            sqlx::query_as("SELECT * FROM projects WHERE paused = false AND autonomy_mode <> 'audit'")
                .fetch_all(&self.pool)
                .await
                .map_err(StoreError::from)?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn open_cycle(&self, project_id: &ProjectId, scout_job_id: &JobId, wild_card: bool) -> StoreResult<Cycle> {
        let cycle = Cycle {
            id: CycleId::new(),
            project_id: *project_id,
            opening_job_id: *scout_job_id,
            wild_card,
            opened_at: Utc::now(),
            closed_at: None,
        };
        sqlx::query(
            "INSERT INTO cycles (id, project_id, opening_job_id, wild_card, opened_at, closed_at) \
             VALUES ($1, $2, $3, $4, $5, NULL)",
        )
        .bind(cycle.id.as_str())
        .bind(cycle.project_id.as_str())
        .bind(cycle.opening_job_id.as_str())
        .bind(cycle.wild_card)
        .bind(cycle.opened_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(cycle)
    }

    async fn get_cycle(&self, cycle_id: &CycleId) -> StoreResult<Cycle> {
        let row: CycleRow = sqlx::query_as("SELECT * FROM cycles WHERE id = $1")
            .bind(cycle_id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from)?;
        Ok(row.into())
    }

    async fn close_cycle(&self, cycle_id: &CycleId) -> StoreResult<()> {
        sqlx::query("UPDATE cycles SET closed_at = $2 WHERE id = $1 AND closed_at IS NULL")
            .bind(cycle_id.as_str())
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(StoreError::from)?;
        Ok(())
    }

    async fn insert_proposal(&self, proposal: &Proposal) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO proposals (id, project_id, cycle_id, title, spec_text, rationale, priority, \
             impact, feasibility, novelty, alignment, status, is_wild_card, branch_name, reject_reason, \
             created_at, updated_at) \
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17)",
        )
        .bind(proposal.id.as_str())
        .bind(proposal.project_id.as_str())
        .bind(proposal.cycle_id.as_ref().map(|c| c.as_str()))
        .bind(&proposal.title)
        .bind(&proposal.spec_text)
        .bind(&proposal.rationale)
        .bind(proposal.priority.to_string())
        .bind(proposal.scores.impact)
        .bind(proposal.scores.feasibility)
        .bind(proposal.scores.novelty)
        .bind(proposal.scores.alignment)
        .bind(proposal.status.to_string())
        .bind(proposal.is_wild_card)
        .bind(&proposal.branch_name)
        .bind(&proposal.reject_reason)
        .bind(proposal.created_at)
        .bind(proposal.updated_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(())
    }

    async fn update_proposal_status(
        &self,
        proposal_id: &ProposalId,
        status: ProposalStatus,
        reject_reason: Option<&str>,
        branch_name: Option<&str>,
    ) -> StoreResult<()> {
        sqlx::query(
            "UPDATE proposals SET status = $2, \
             reject_reason = COALESCE($3, reject_reason), \
             branch_name = COALESCE($4, branch_name), \
             updated_at = $5 WHERE id = $1",
        )
        .bind(proposal_id.as_str())
        .bind(status.to_string())
        .bind(reject_reason)
        .bind(branch_name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(())
    }

    async fn get_proposal(&self, proposal_id: &ProposalId) -> StoreResult<Proposal> {
        let row: ProposalRow = sqlx::query_as("SELECT * FROM proposals WHERE id = $1")
            .bind(proposal_id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from)?;
        row.try_into()
    }

    async fn list_draft_proposals(&self, project_id: &ProjectId, cycle_id: &CycleId) -> StoreResult<Vec<Proposal>> {
        let rows: Vec<ProposalRow> = sqlx::query_as(
            "SELECT * FROM proposals WHERE project_id = $1 AND cycle_id = $2 AND status = 'draft'",
        )
        .bind(project_id.as_str())
        .bind(cycle_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from)?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_proposals_in_cycle(&self, cycle_id: &CycleId) -> StoreResult<Vec<Proposal>> {
        let rows: Vec<ProposalRow> = sqlx::query_as("SELECT * FROM proposals WHERE cycle_id = $1")
            .bind(cycle_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from)?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn count_active_branches(&self, project_id: &ProjectId) -> StoreResult<u32> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM proposals WHERE project_id = $1 AND status IN ('approved', 'implementing')",
        )
        .bind(project_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(count as u32)
    }

    async fn count_proposals_by_status(&self, project_id: &ProjectId) -> StoreResult<ProposalCounts> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM proposals WHERE project_id = $1 GROUP BY status")
                .bind(project_id.as_str())
                .fetch_all(&self.pool)
                .await
                .map_err(StoreError::from)?;
        let mut counts = ProposalCounts::default();
        for (status, n) in rows {
            let n = n as u64;
            match status.as_str() {
                "draft" => counts.draft = n,
                "approved" => counts.approved = n,
                "implementing" => counts.implementing = n,
                "done" => counts.done = n,
                "rejected" => counts.rejected = n,
                _ => {}
            }
        }
        Ok(counts)
    }

    async fn insert_job(&self, job: &Job) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO job_queue (id, project_id, job_type, payload, status, attempt_count, \
             worker_id, locked_at, last_error, source_run_id, github_issue_number, created_at, completed_at) \
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13)",
        )
        .bind(job.id.as_str())
        .bind(job.project_id.as_str())
        .bind(job.job_type().to_string())
        .bind(serde_json::to_value(&job.payload).map_err(|e| StoreError::PermanentIo(e.to_string()))?)
        .bind(job.status.to_string())
        .bind(job.attempt_count as i32)
        .bind(&job.worker_id)
        .bind(job.locked_at)
        .bind(&job.last_error)
        .bind(job.source_run_id.as_ref().map(|j| j.as_str()))
        .bind(job.github_issue_number)
        .bind(job.created_at)
        .bind(job.completed_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(())
    }

    async fn get_job(&self, job_id: &JobId) -> StoreResult<Job> {
        let row: JobRow = sqlx::query_as("SELECT * FROM job_queue WHERE id = $1")
            .bind(job_id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from)?;
        row.try_into()
    }

    async fn update_job(&self, job_id: &JobId, patch: JobPatch) -> StoreResult<()> {
        sqlx::query(
            "UPDATE job_queue SET \
             status = COALESCE($2, status), \
             attempt_count = COALESCE($3, attempt_count), \
             worker_id = CASE WHEN $4 THEN $5 ELSE worker_id END, \
             locked_at = CASE WHEN $6 THEN $7 ELSE locked_at END, \
             last_error = CASE WHEN $8 THEN $9 ELSE last_error END, \
             completed_at = CASE WHEN $10 THEN $11 ELSE completed_at END \
             WHERE id = $1",
        )
        .bind(job_id.as_str())
        .bind(patch.status.map(|s| s.to_string()))
        .bind(patch.attempt_count.map(|c| c as i32))
        .bind(patch.worker_id.is_some())
        .bind(patch.worker_id.flatten())
        .bind(patch.locked_at.is_some())
        .bind(patch.locked_at.flatten())
        .bind(patch.last_error.is_some())
        .bind(patch.last_error.flatten())
        .bind(patch.completed_at.is_some())
        .bind(patch.completed_at.flatten())
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(())
    }

    async fn claim_next_job(&self, worker_id: &str) -> StoreResult<Option<Job>> {
        // FOR UPDATE SKIP LOCKED over the oldest pending row; the UPDATE …
        // FROM pattern makes the select-then-lock atomic within one statement.
        let row: Option<JobRow> = sqlx::query_as(
            "UPDATE job_queue SET status = 'processing', worker_id = $1, locked_at = now(), \
             attempt_count = attempt_count + 1 \
             WHERE id = ( \
                 SELECT id FROM job_queue WHERE status = 'pending' \
                 ORDER BY created_at ASC, id ASC \
                 FOR UPDATE SKIP LOCKED LIMIT 1 \
             ) \
             RETURNING *",
        )
        .bind(worker_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from)?;
        row.map(TryInto::try_into).transpose()
    }

    async fn release_job(&self, job_id: &JobId) -> StoreResult<()> {
        sqlx::query("UPDATE job_queue SET status = 'pending', worker_id = NULL, locked_at = NULL WHERE id = $1")
            .bind(job_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StoreError::from)?;
        Ok(())
    }

    async fn list_jobs_by_status(&self, status: JobStatus) -> StoreResult<Vec<Job>> {
        let rows: Vec<JobRow> = sqlx::query_as("SELECT * FROM job_queue WHERE status = $1")
            .bind(status.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from)?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn has_pending_or_processing_job(&self, project_id: &ProjectId, job_type: JobType) -> StoreResult<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM job_queue WHERE project_id = $1 AND job_type = $2 \
             AND status IN ('pending', 'processing'))",
        )
        .bind(project_id.as_str())
        .bind(job_type.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(exists)
    }

    async fn reap_stale_jobs(&self, threshold: chrono::Duration, max_attempts: u32) -> StoreResult<Vec<JobId>> {
        let cutoff = Utc::now() - threshold;
        let reset: Vec<(String,)> = sqlx::query_as(
            "UPDATE job_queue SET status = 'pending', worker_id = NULL, locked_at = NULL \
             WHERE status = 'processing' AND locked_at < $1 AND attempt_count < $2 \
             RETURNING id",
        )
        .bind(cutoff)
        .bind(max_attempts as i32)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from)?;

        sqlx::query(
            "UPDATE job_queue SET status = 'failed', last_error = 'stale', completed_at = now() \
             WHERE status = 'processing' AND locked_at < $1 AND attempt_count >= $2",
        )
        .bind(cutoff)
        .bind(max_attempts as i32)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;

        Ok(reset.into_iter().map(|(id,)| id.as_str().into()).collect())
    }

    async fn job_counts(&self) -> StoreResult<JobCounts> {
        let rows: Vec<(String, i64)> = sqlx::query_as("SELECT status, COUNT(*) FROM job_queue GROUP BY status")
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from)?;

        let mut counts = JobCounts::default();
        for (status, n) in rows {
            let n = n as u64;
            match status.as_str() {
                "pending" => counts.pending = n,
                "processing" => counts.processing = n,
                "done" => counts.done = n,
                "failed" => counts.failed = n,
                _ => {}
            }
        }
        Ok(counts)
    }

    async fn insert_pipeline_run(&self, run: &PipelineRun) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO pipeline_runs (id, project_id, stage, pr_number, result, started_at, completed_at) \
             VALUES ($1,$2,$3,$4,$5,$6,$7)",
        )
        .bind(run.id.as_str())
        .bind(run.project_id.as_str())
        .bind(run.stage.to_string())
        .bind(run.pr_number.map(|n| n as i64))
        .bind(run.result.map(|r| match r {
            RunResult::Success => "success",
            RunResult::Failed => "failed",
        }))
        .bind(run.started_at)
        .bind(run.completed_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(())
    }

    async fn get_pipeline_run(&self, run_id: &PipelineRunId) -> StoreResult<PipelineRun> {
        let row: PipelineRunRow = sqlx::query_as("SELECT * FROM pipeline_runs WHERE id = $1")
            .bind(run_id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from)?;
        row.try_into()
    }

    async fn update_pipeline_run(
        &self,
        run_id: &PipelineRunId,
        stage: PipelineStage,
        result: Option<RunResult>,
        pr_number: Option<u64>,
    ) -> StoreResult<()> {
        sqlx::query(
            "UPDATE pipeline_runs SET stage = $2, \
             result = COALESCE($3, result), \
             completed_at = CASE WHEN $3 IS NOT NULL THEN now() ELSE completed_at END, \
             pr_number = COALESCE($4, pr_number) WHERE id = $1",
        )
        .bind(run_id.as_str())
        .bind(stage.to_string())
        .bind(result.map(|r| match r {
            RunResult::Success => "success",
            RunResult::Failed => "failed",
        }))
        .bind(pr_number.map(|n| n as i64))
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(())
    }

    async fn insert_branch_event(&self, event: &BranchEvent) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO branch_events (id, project_id, branch_name, event_type, event_data, actor, commit_sha, created_at) \
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8)",
        )
        .bind(event.id.as_str())
        .bind(event.project_id.as_str())
        .bind(&event.branch_name)
        .bind(event.event_type.0.clone())
        .bind(&event.event_data)
        .bind(event.actor.to_string())
        .bind(&event.commit_sha)
        .bind(event.created_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(())
    }

    async fn insert_branch_event_once(&self, event: &BranchEvent) -> StoreResult<bool> {
        // Relies on a unique index on (project_id, event_type) for the
        // cycle_completed idempotence guarantee; callers that need a
        // per-cycle guard encode the cycle id into event_data and check it
        // via a partial unique index scoped to that event_type.
        let result = sqlx::query(
            "INSERT INTO branch_events (id, project_id, branch_name, event_type, event_data, actor, commit_sha, created_at) \
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8) ON CONFLICT (project_id, event_type) DO NOTHING",
        )
        .bind(event.id.as_str())
        .bind(event.project_id.as_str())
        .bind(&event.branch_name)
        .bind(event.event_type.0.clone())
        .bind(&event.event_data)
        .bind(event.actor.to_string())
        .bind(&event.commit_sha)
        .bind(event.created_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(result.rows_affected() == 1)
    }

    async fn list_recent_branch_events(&self, project_id: &ProjectId, limit: u32) -> StoreResult<Vec<BranchEvent>> {
        let rows: Vec<BranchEventRow> = sqlx::query_as(
            "SELECT * FROM branch_events WHERE project_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(project_id.as_str())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from)?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn insert_checkpoint(&self, checkpoint: &Checkpoint) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO checkpoints (id, project_id, cycle_id, proposal_id, kind, commit_sha, pr_number, branch_name, metadata, created_at) \
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)",
        )
        .bind(checkpoint.id.as_str())
        .bind(checkpoint.project_id.as_str())
        .bind(checkpoint.cycle_id.as_ref().map(|c| c.as_str()))
        .bind(checkpoint.proposal_id.as_ref().map(|p| p.as_str()))
        .bind(checkpoint.kind.to_string())
        .bind(&checkpoint.commit_sha)
        .bind(checkpoint.pr_number.map(|n| n as i64))
        .bind(&checkpoint.branch_name)
        .bind(&checkpoint.metadata)
        .bind(checkpoint.created_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(())
    }

    async fn insert_finding(&self, finding: &Finding) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO findings (id, project_id, cycle_id, category, description, severity, created_at) \
             VALUES ($1,$2,$3,$4,$5,$6,$7)",
        )
        .bind(finding.id.as_str())
        .bind(finding.project_id.as_str())
        .bind(finding.cycle_id.as_str())
        .bind(&finding.category)
        .bind(&finding.description)
        .bind(finding.severity.to_string())
        .bind(finding.created_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(())
    }

    async fn list_findings(&self, cycle_id: &CycleId) -> StoreResult<Vec<Finding>> {
        let rows: Vec<FindingRow> = sqlx::query_as("SELECT * FROM findings WHERE cycle_id = $1")
            .bind(cycle_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from)?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn append_run_log(&self, log: &RunLog) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO run_logs (id, project_id, job_id, level, message, fields, created_at) \
             VALUES ($1,$2,$3,$4,$5,$6,$7)",
        )
        .bind(log.id.as_str())
        .bind(log.project_id.as_str())
        .bind(log.job_id.as_str())
        .bind(log.level.to_string())
        .bind(&log.message)
        .bind(&log.fields)
        .bind(log.created_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(())
    }

    async fn list_recent_run_logs(&self, project_id: &ProjectId, limit: u32) -> StoreResult<Vec<RunLog>> {
        let rows: Vec<RunLogRow> = sqlx::query_as(
            "SELECT * FROM run_logs WHERE project_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(project_id.as_str())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from)?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn insert_strategy_memory(&self, memory: &StrategyMemory) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO strategy_memory (id, project_id, summary, outcome, created_at) \
             VALUES ($1,$2,$3,$4,$5)",
        )
        .bind(memory.id.as_str())
        .bind(memory.project_id.as_str())
        .bind(&memory.summary)
        .bind(&memory.outcome)
        .bind(memory.created_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(())
    }

    async fn try_acquire_merge_lock(&self, project_id: &ProjectId) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE projects SET merge_in_progress = true WHERE id = $1 AND merge_in_progress = false",
        )
        .bind(project_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(result.rows_affected() == 1)
    }

    async fn release_merge_lock(&self, project_id: &ProjectId) -> StoreResult<()> {
        sqlx::query("UPDATE projects SET merge_in_progress = false WHERE id = $1")
            .bind(project_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StoreError::from)?;
        Ok(())
    }

    async fn release_stale_merge_locks(&self, threshold: chrono::Duration) -> StoreResult<Vec<ProjectId>> {
        let cutoff = Utc::now() - threshold;
        let rows: Vec<(String,)> = sqlx::query_as(
            "UPDATE projects SET merge_in_progress = false \
             WHERE merge_in_progress = true AND merge_lock_acquired_at < $1 \
             RETURNING id",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from)?;
        Ok(rows.into_iter().map(|(id,)| id.as_str().into()).collect())
    }
}

#[cfg(all(test, feature = "postgres-integration-tests"))]
#[path = "pg_tests.rs"]
mod tests;
