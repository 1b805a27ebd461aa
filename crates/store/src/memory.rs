// SPDX-License-Identifier: MIT

//! In-memory fake [`Store`]: a trait, a real adapter elsewhere, and this
//! fake gated behind `#[cfg(any(test, feature = "test-support"))]`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use cadence_core::{
    BranchEvent, Checkpoint, Cycle, Finding, Job, JobStatus, JobType, PipelineRun, PipelineStage,
    Project, Proposal, ProposalStatus, RunLog, RunResult, StrategyMemory,
};
use cadence_core::{CycleId, JobId, PipelineRunId, ProjectId, ProposalId};
use chrono::Utc;
use parking_lot::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::traits::{JobCounts, JobPatch, ProposalCounts, Store};

#[derive(Default)]
struct MemoryState {
    projects: HashMap<ProjectId, Project>,
    cycles: HashMap<CycleId, Cycle>,
    proposals: HashMap<ProposalId, Proposal>,
    jobs: HashMap<JobId, Job>,
    pipeline_runs: HashMap<PipelineRunId, PipelineRun>,
    branch_events: Vec<BranchEvent>,
    branch_event_keys: std::collections::HashSet<(ProjectId, String)>,
    checkpoints: Vec<Checkpoint>,
    findings: Vec<Finding>,
    run_logs: Vec<RunLog>,
    strategy_memory: Vec<StrategyMemory>,
}

/// In-memory fake for tests and for driving the cycle/autonomy/merge/worker
/// crates without a database.
#[derive(Clone)]
pub struct FakeStore {
    inner: Arc<Mutex<MemoryState>>,
}

impl Default for FakeStore {
    fn default() -> Self {
        Self { inner: Arc::new(Mutex::new(MemoryState::default())) }
    }
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a project so tests don't have to round-trip through `insert_job`.
    pub fn seed_project(&self, project: Project) {
        self.inner.lock().projects.insert(project.id, project);
    }

    pub fn branch_events(&self) -> Vec<BranchEvent> {
        self.inner.lock().branch_events.clone()
    }

    pub fn checkpoints(&self) -> Vec<Checkpoint> {
        self.inner.lock().checkpoints.clone()
    }

    pub fn jobs_snapshot(&self) -> Vec<Job> {
        self.inner.lock().jobs.values().cloned().collect()
    }
}

fn not_found(what: &str, id: impl std::fmt::Display) -> StoreError {
    StoreError::NotFound(format!("{what} {id}"))
}

#[async_trait]
impl Store for FakeStore {
    async fn get_project(&self, project_id: &ProjectId) -> StoreResult<Project> {
        self.inner
            .lock()
            .projects
            .get(project_id)
            .cloned()
            .ok_or_else(|| not_found("project", project_id))
    }

    async fn update_project(&self, project: &Project) -> StoreResult<()> {
        self.inner.lock().projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn list_active_projects(&self) -> StoreResult<Vec<Project>> {
        Ok(self.inner.lock().projects.values().filter(|p| p.is_actionable()).cloned().collect())
    }

    async fn open_cycle(&self, project_id: &ProjectId, scout_job_id: &JobId, wild_card: bool) -> StoreResult<Cycle> {
        let cycle = Cycle::builder()
            .project_id(*project_id)
            .opening_job_id(*scout_job_id)
            .wild_card(wild_card)
            .build();
        self.inner.lock().cycles.insert(cycle.id, cycle.clone());
        Ok(cycle)
    }

    async fn get_cycle(&self, cycle_id: &CycleId) -> StoreResult<Cycle> {
        self.inner.lock().cycles.get(cycle_id).cloned().ok_or_else(|| not_found("cycle", cycle_id))
    }

    async fn close_cycle(&self, cycle_id: &CycleId) -> StoreResult<()> {
        let mut guard = self.inner.lock();
        let cycle = guard.cycles.get_mut(cycle_id).ok_or_else(|| not_found("cycle", cycle_id))?;
        cycle.closed_at = Some(Utc::now());
        Ok(())
    }

    async fn insert_proposal(&self, proposal: &Proposal) -> StoreResult<()> {
        self.inner.lock().proposals.insert(proposal.id, proposal.clone());
        Ok(())
    }

    async fn update_proposal_status(
        &self,
        proposal_id: &ProposalId,
        status: ProposalStatus,
        reject_reason: Option<&str>,
        branch_name: Option<&str>,
    ) -> StoreResult<()> {
        let mut guard = self.inner.lock();
        let proposal =
            guard.proposals.get_mut(proposal_id).ok_or_else(|| not_found("proposal", proposal_id))?;
        proposal.status = status;
        if let Some(reason) = reject_reason {
            proposal.reject_reason = Some(reason.to_string());
        }
        if let Some(branch) = branch_name {
            proposal.branch_name = Some(branch.to_string());
        }
        proposal.updated_at = Utc::now();
        Ok(())
    }

    async fn get_proposal(&self, proposal_id: &ProposalId) -> StoreResult<Proposal> {
        self.inner.lock().proposals.get(proposal_id).cloned().ok_or_else(|| not_found("proposal", proposal_id))
    }

    async fn list_draft_proposals(&self, project_id: &ProjectId, cycle_id: &CycleId) -> StoreResult<Vec<Proposal>> {
        Ok(self
            .inner
            .lock()
            .proposals
            .values()
            .filter(|p| {
                p.project_id == *project_id && p.cycle_id == Some(*cycle_id) && p.status == ProposalStatus::Draft
            })
            .cloned()
            .collect())
    }

    async fn list_proposals_in_cycle(&self, cycle_id: &CycleId) -> StoreResult<Vec<Proposal>> {
        Ok(self.inner.lock().proposals.values().filter(|p| p.cycle_id == Some(*cycle_id)).cloned().collect())
    }

    async fn count_active_branches(&self, project_id: &ProjectId) -> StoreResult<u32> {
        Ok(self
            .inner
            .lock()
            .proposals
            .values()
            .filter(|p| p.project_id == *project_id && p.status.is_active_branch())
            .count() as u32)
    }

    async fn count_proposals_by_status(&self, project_id: &ProjectId) -> StoreResult<ProposalCounts> {
        let guard = self.inner.lock();
        let mut counts = ProposalCounts::default();
        for proposal in guard.proposals.values().filter(|p| p.project_id == *project_id) {
            match proposal.status {
                ProposalStatus::Draft => counts.draft += 1,
                ProposalStatus::Approved => counts.approved += 1,
                ProposalStatus::Implementing => counts.implementing += 1,
                ProposalStatus::Done => counts.done += 1,
                ProposalStatus::Rejected => counts.rejected += 1,
            }
        }
        Ok(counts)
    }

    async fn insert_job(&self, job: &Job) -> StoreResult<()> {
        self.inner.lock().jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn get_job(&self, job_id: &JobId) -> StoreResult<Job> {
        self.inner.lock().jobs.get(job_id).cloned().ok_or_else(|| not_found("job", job_id))
    }

    async fn update_job(&self, job_id: &JobId, patch: JobPatch) -> StoreResult<()> {
        let mut guard = self.inner.lock();
        let job = guard.jobs.get_mut(job_id).ok_or_else(|| not_found("job", job_id))?;
        if let Some(status) = patch.status {
            job.status = status;
        }
        if let Some(count) = patch.attempt_count {
            job.attempt_count = count;
        }
        if let Some(worker_id) = patch.worker_id {
            job.worker_id = worker_id;
        }
        if let Some(locked_at) = patch.locked_at {
            job.locked_at = locked_at;
        }
        if let Some(last_error) = patch.last_error {
            job.last_error = last_error;
        }
        if let Some(completed_at) = patch.completed_at {
            job.completed_at = completed_at;
        }
        Ok(())
    }

    async fn claim_next_job(&self, worker_id: &str) -> StoreResult<Option<Job>> {
        let mut guard = self.inner.lock();
        let mut candidates: Vec<&JobId> = guard
            .jobs
            .iter()
            .filter(|(_, j)| j.status == JobStatus::Pending)
            .map(|(id, _)| id)
            .collect();
        candidates.sort_by_key(|id| guard.jobs[*id].created_at);
        let Some(&id) = candidates.first() else {
            return Ok(None);
        };
        let id = id;
        let job = guard.jobs.get_mut(&id).expect("candidate id came from the same map");
        job.status = JobStatus::Processing;
        job.worker_id = Some(worker_id.to_string());
        job.locked_at = Some(Utc::now());
        job.attempt_count += 1;
        Ok(Some(job.clone()))
    }

    async fn release_job(&self, job_id: &JobId) -> StoreResult<()> {
        let mut guard = self.inner.lock();
        let job = guard.jobs.get_mut(job_id).ok_or_else(|| not_found("job", job_id))?;
        job.status = JobStatus::Pending;
        job.worker_id = None;
        job.locked_at = None;
        Ok(())
    }

    async fn list_jobs_by_status(&self, status: JobStatus) -> StoreResult<Vec<Job>> {
        Ok(self.inner.lock().jobs.values().filter(|j| j.status == status).cloned().collect())
    }

    async fn has_pending_or_processing_job(&self, project_id: &ProjectId, job_type: JobType) -> StoreResult<bool> {
        Ok(self.inner.lock().jobs.values().any(|j| {
            j.project_id == *project_id
                && j.job_type() == job_type
                && matches!(j.status, JobStatus::Pending | JobStatus::Processing)
        }))
    }

    async fn reap_stale_jobs(&self, threshold: chrono::Duration, max_attempts: u32) -> StoreResult<Vec<JobId>> {
        let mut guard = self.inner.lock();
        let now = Utc::now();
        let mut reset = Vec::new();
        for job in guard.jobs.values_mut() {
            if job.status != JobStatus::Processing {
                continue;
            }
            let Some(locked_at) = job.locked_at else { continue };
            if now - locked_at < threshold {
                continue;
            }
            if job.attempt_count < max_attempts {
                job.status = JobStatus::Pending;
                job.worker_id = None;
                job.locked_at = None;
                reset.push(job.id);
            } else {
                job.status = JobStatus::Failed;
                job.last_error = Some("stale".to_string());
                job.completed_at = Some(now);
            }
        }
        Ok(reset)
    }

    async fn job_counts(&self) -> StoreResult<JobCounts> {
        let guard = self.inner.lock();
        let mut counts = JobCounts::default();
        for job in guard.jobs.values() {
            match job.status {
                JobStatus::Pending => counts.pending += 1,
                JobStatus::Processing => counts.processing += 1,
                JobStatus::Done => counts.done += 1,
                JobStatus::Failed => counts.failed += 1,
            }
        }
        Ok(counts)
    }

    async fn insert_pipeline_run(&self, run: &PipelineRun) -> StoreResult<()> {
        self.inner.lock().pipeline_runs.insert(run.id, run.clone());
        Ok(())
    }

    async fn get_pipeline_run(&self, run_id: &PipelineRunId) -> StoreResult<PipelineRun> {
        self.inner.lock().pipeline_runs.get(run_id).cloned().ok_or_else(|| not_found("pipeline_run", run_id))
    }

    async fn update_pipeline_run(
        &self,
        run_id: &PipelineRunId,
        stage: PipelineStage,
        result: Option<RunResult>,
        pr_number: Option<u64>,
    ) -> StoreResult<()> {
        let mut guard = self.inner.lock();
        let run = guard.pipeline_runs.get_mut(run_id).ok_or_else(|| not_found("pipeline_run", run_id))?;
        run.stage = stage;
        if result.is_some() {
            run.result = result;
            run.completed_at = Some(Utc::now());
        }
        if pr_number.is_some() {
            run.pr_number = pr_number;
        }
        Ok(())
    }

    async fn insert_branch_event(&self, event: &BranchEvent) -> StoreResult<()> {
        self.inner.lock().branch_events.push(event.clone());
        Ok(())
    }

    async fn insert_branch_event_once(&self, event: &BranchEvent) -> StoreResult<bool> {
        let mut guard = self.inner.lock();
        let key = (event.project_id, event.event_type.0.clone());
        if guard.branch_event_keys.contains(&key) {
            return Ok(false);
        }
        guard.branch_event_keys.insert(key);
        guard.branch_events.push(event.clone());
        Ok(true)
    }

    async fn list_recent_branch_events(&self, project_id: &ProjectId, limit: u32) -> StoreResult<Vec<BranchEvent>> {
        let guard = self.inner.lock();
        let mut events: Vec<BranchEvent> =
            guard.branch_events.iter().filter(|e| e.project_id == *project_id).cloned().collect();
        events.sort_by_key(|e| std::cmp::Reverse(e.created_at));
        events.truncate(limit as usize);
        Ok(events)
    }

    async fn insert_checkpoint(&self, checkpoint: &Checkpoint) -> StoreResult<()> {
        self.inner.lock().checkpoints.push(checkpoint.clone());
        Ok(())
    }

    async fn insert_finding(&self, finding: &Finding) -> StoreResult<()> {
        self.inner.lock().findings.push(finding.clone());
        Ok(())
    }

    async fn list_findings(&self, cycle_id: &CycleId) -> StoreResult<Vec<Finding>> {
        Ok(self.inner.lock().findings.iter().filter(|f| f.cycle_id == *cycle_id).cloned().collect())
    }

    async fn append_run_log(&self, log: &RunLog) -> StoreResult<()> {
        self.inner.lock().run_logs.push(log.clone());
        Ok(())
    }

    async fn list_recent_run_logs(&self, project_id: &ProjectId, limit: u32) -> StoreResult<Vec<RunLog>> {
        let guard = self.inner.lock();
        let mut logs: Vec<RunLog> =
            guard.run_logs.iter().filter(|l| l.project_id == *project_id).cloned().collect();
        logs.sort_by_key(|l| std::cmp::Reverse(l.created_at));
        logs.truncate(limit as usize);
        Ok(logs)
    }

    async fn insert_strategy_memory(&self, memory: &StrategyMemory) -> StoreResult<()> {
        self.inner.lock().strategy_memory.push(memory.clone());
        Ok(())
    }

    async fn try_acquire_merge_lock(&self, project_id: &ProjectId) -> StoreResult<bool> {
        let mut guard = self.inner.lock();
        let project = guard.projects.get_mut(project_id).ok_or_else(|| not_found("project", project_id))?;
        if project.merge_in_progress {
            return Ok(false);
        }
        project.merge_in_progress = true;
        Ok(true)
    }

    async fn release_merge_lock(&self, project_id: &ProjectId) -> StoreResult<()> {
        let mut guard = self.inner.lock();
        let project = guard.projects.get_mut(project_id).ok_or_else(|| not_found("project", project_id))?;
        project.merge_in_progress = false;
        Ok(())
    }

    async fn release_stale_merge_locks(&self, _threshold: chrono::Duration) -> StoreResult<Vec<ProjectId>> {
        // The fake has no lock-acquisition timestamp; production behavior is
        // implemented against the Postgres `projects` table's `updated_at`.
        Ok(Vec::new())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
