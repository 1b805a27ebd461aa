// SPDX-License-Identifier: MIT

//! Row ↔ entity conversions. Queries are written against the runtime
//! `sqlx::query_as` API (not the `query!` compile-time macros) so the crate
//! builds without a live `DATABASE_URL` at compile time.

use cadence_core::{
    Actor, AutonomyMode, BranchEvent, Checkpoint, CheckpointKind, Cycle, EventType, Finding, Job,
    JobPayload, JobStatus, LogLevel, PipelineRun, PipelineStage, Project, Proposal, ProposalStatus,
    RunLog, RunResult, Severity,
};
use chrono::{DateTime, Utc};

use crate::error::StoreError;

#[derive(sqlx::FromRow)]
pub(crate) struct ProjectRow {
    pub id: String,
    pub host_repo_ref: String,
    pub installation_id: Option<String>,
    pub default_branch: String,
    pub autonomy_mode: String,
    pub max_concurrent_branches: i32,
    pub risk_paths: serde_json::Value,
    pub paused: bool,
    pub merge_in_progress: bool,
    pub scout_schedule: String,
    pub wild_card_frequency: f64,
    pub product_context: String,
    pub strategic_nudges: serde_json::Value,
}

impl TryFrom<ProjectRow> for Project {
    type Error = StoreError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let autonomy_mode = match row.autonomy_mode.as_str() {
            "audit" => AutonomyMode::Audit,
            "assist" => AutonomyMode::Assist,
            "automate" => AutonomyMode::Automate,
            other => return Err(StoreError::PermanentIo(format!("unknown autonomy_mode {other}"))),
        };
        Ok(Project {
            id: row.id.as_str().into(),
            host_repo_ref: row.host_repo_ref,
            installation_id: row.installation_id,
            default_branch: row.default_branch,
            autonomy_mode,
            max_concurrent_branches: row.max_concurrent_branches as u32,
            risk_paths: serde_json::from_value(row.risk_paths).unwrap_or_default(),
            paused: row.paused,
            merge_in_progress: row.merge_in_progress,
            scout_schedule: row.scout_schedule,
            wild_card_frequency: row.wild_card_frequency,
            product_context: row.product_context,
            strategic_nudges: serde_json::from_value(row.strategic_nudges).unwrap_or_default(),
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct CycleRow {
    pub id: String,
    pub project_id: String,
    pub opening_job_id: String,
    pub wild_card: bool,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl From<CycleRow> for Cycle {
    fn from(row: CycleRow) -> Self {
        Cycle {
            id: row.id.as_str().into(),
            project_id: row.project_id.as_str().into(),
            opening_job_id: row.opening_job_id.as_str().into(),
            wild_card: row.wild_card,
            opened_at: row.opened_at,
            closed_at: row.closed_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ProposalRow {
    pub id: String,
    pub project_id: String,
    pub cycle_id: Option<String>,
    pub title: String,
    pub spec_text: String,
    pub rationale: String,
    pub priority: String,
    pub impact: f64,
    pub feasibility: f64,
    pub novelty: f64,
    pub alignment: f64,
    pub status: String,
    pub is_wild_card: bool,
    pub branch_name: Option<String>,
    pub reject_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProposalRow> for Proposal {
    type Error = StoreError;

    fn try_from(row: ProposalRow) -> Result<Self, Self::Error> {
        use cadence_core::Priority;
        let priority = match row.priority.as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            other => return Err(StoreError::PermanentIo(format!("unknown priority {other}"))),
        };
        let status = parse_proposal_status(&row.status)?;
        Ok(Proposal {
            id: row.id.as_str().into(),
            project_id: row.project_id.as_str().into(),
            cycle_id: row.cycle_id.as_deref().map(Into::into),
            title: row.title,
            spec_text: row.spec_text,
            rationale: row.rationale,
            priority,
            scores: cadence_core::Scores {
                impact: row.impact,
                feasibility: row.feasibility,
                novelty: row.novelty,
                alignment: row.alignment,
            },
            status,
            is_wild_card: row.is_wild_card,
            branch_name: row.branch_name,
            reject_reason: row.reject_reason,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub(crate) fn parse_proposal_status(s: &str) -> Result<ProposalStatus, StoreError> {
    Ok(match s {
        "draft" => ProposalStatus::Draft,
        "approved" => ProposalStatus::Approved,
        "implementing" => ProposalStatus::Implementing,
        "done" => ProposalStatus::Done,
        "rejected" => ProposalStatus::Rejected,
        other => return Err(StoreError::PermanentIo(format!("unknown proposal status {other}"))),
    })
}

#[derive(sqlx::FromRow)]
pub(crate) struct JobRow {
    pub id: String,
    pub project_id: String,
    pub job_type: String,
    pub payload: serde_json::Value,
    pub status: String,
    pub attempt_count: i32,
    pub worker_id: Option<String>,
    pub locked_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub source_run_id: Option<String>,
    pub github_issue_number: i64,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<JobRow> for Job {
    type Error = StoreError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let payload: JobPayload = serde_json::from_value(row.payload)
            .map_err(|e| StoreError::PermanentIo(format!("bad job payload: {e}")))?;
        let status = match row.status.as_str() {
            "pending" => JobStatus::Pending,
            "processing" => JobStatus::Processing,
            "done" => JobStatus::Done,
            "failed" => JobStatus::Failed,
            other => return Err(StoreError::PermanentIo(format!("unknown job status {other}"))),
        };
        Ok(Job {
            id: row.id.as_str().into(),
            project_id: row.project_id.as_str().into(),
            payload,
            status,
            attempt_count: row.attempt_count as u32,
            worker_id: row.worker_id,
            locked_at: row.locked_at,
            last_error: row.last_error,
            source_run_id: row.source_run_id.as_deref().map(Into::into),
            github_issue_number: row.github_issue_number,
            created_at: row.created_at,
            completed_at: row.completed_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PipelineRunRow {
    pub id: String,
    pub project_id: String,
    pub stage: String,
    pub pr_number: Option<i64>,
    pub result: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<PipelineRunRow> for PipelineRun {
    type Error = StoreError;

    fn try_from(row: PipelineRunRow) -> Result<Self, Self::Error> {
        let stage = match row.stage.as_str() {
            "queued" => PipelineStage::Queued,
            "running" => PipelineStage::Running,
            "validating" => PipelineStage::Validating,
            "deployed" => PipelineStage::Deployed,
            "failed" => PipelineStage::Failed,
            other => return Err(StoreError::PermanentIo(format!("unknown pipeline stage {other}"))),
        };
        let result = match row.result.as_deref() {
            None => None,
            Some("success") => Some(RunResult::Success),
            Some("failed") => Some(RunResult::Failed),
            Some(other) => return Err(StoreError::PermanentIo(format!("unknown run result {other}"))),
        };
        Ok(PipelineRun {
            id: row.id.as_str().into(),
            project_id: row.project_id.as_str().into(),
            stage,
            pr_number: row.pr_number.map(|n| n as u64),
            result,
            started_at: row.started_at,
            completed_at: row.completed_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct BranchEventRow {
    pub id: String,
    pub project_id: String,
    pub branch_name: Option<String>,
    pub event_type: String,
    pub event_data: serde_json::Value,
    pub actor: String,
    pub commit_sha: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<BranchEventRow> for BranchEvent {
    type Error = StoreError;

    fn try_from(row: BranchEventRow) -> Result<Self, Self::Error> {
        let actor = match row.actor.as_str() {
            "autonomy" => Actor::Autonomy,
            "builder" => Actor::Builder,
            "reviewer" => Actor::Reviewer,
            "strategist" => Actor::Strategist,
            "supervisor" => Actor::Supervisor,
            "watchdog" => Actor::Watchdog,
            other => return Err(StoreError::PermanentIo(format!("unknown actor {other}"))),
        };
        Ok(BranchEvent {
            id: row.id.as_str().into(),
            project_id: row.project_id.as_str().into(),
            branch_name: row.branch_name,
            event_type: EventType::new(row.event_type),
            event_data: row.event_data,
            actor,
            commit_sha: row.commit_sha,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct CheckpointRow {
    pub id: String,
    pub project_id: String,
    pub cycle_id: Option<String>,
    pub proposal_id: Option<String>,
    pub kind: String,
    pub commit_sha: String,
    pub pr_number: Option<i64>,
    pub branch_name: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CheckpointRow> for Checkpoint {
    type Error = StoreError;

    fn try_from(row: CheckpointRow) -> Result<Self, Self::Error> {
        let kind = match row.kind.as_str() {
            "merge" => CheckpointKind::Merge,
            "cycle_complete" => CheckpointKind::CycleComplete,
            other => return Err(StoreError::PermanentIo(format!("unknown checkpoint kind {other}"))),
        };
        Ok(Checkpoint {
            id: row.id.as_str().into(),
            project_id: row.project_id.as_str().into(),
            cycle_id: row.cycle_id.as_deref().map(Into::into),
            proposal_id: row.proposal_id.as_deref().map(Into::into),
            kind,
            commit_sha: row.commit_sha,
            pr_number: row.pr_number.map(|n| n as u64),
            branch_name: row.branch_name,
            metadata: row.metadata,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct FindingRow {
    pub id: String,
    pub project_id: String,
    pub cycle_id: String,
    pub category: String,
    pub description: String,
    pub severity: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<FindingRow> for Finding {
    type Error = StoreError;

    fn try_from(row: FindingRow) -> Result<Self, Self::Error> {
        let severity = match row.severity.as_str() {
            "info" => Severity::Info,
            "minor" => Severity::Minor,
            "major" => Severity::Major,
            other => return Err(StoreError::PermanentIo(format!("unknown severity {other}"))),
        };
        Ok(Finding {
            id: row.id.as_str().into(),
            project_id: row.project_id.as_str().into(),
            cycle_id: row.cycle_id.as_str().into(),
            category: row.category,
            description: row.description,
            severity,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct RunLogRow {
    pub id: String,
    pub project_id: String,
    pub job_id: String,
    pub level: String,
    pub message: String,
    pub fields: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<RunLogRow> for RunLog {
    type Error = StoreError;

    fn try_from(row: RunLogRow) -> Result<Self, Self::Error> {
        let level = match row.level.as_str() {
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" => LogLevel::Warn,
            "error" => LogLevel::Error,
            other => return Err(StoreError::PermanentIo(format!("unknown log level {other}"))),
        };
        Ok(RunLog {
            id: row.id.as_str().into(),
            project_id: row.project_id.as_str().into(),
            job_id: row.job_id.as_str().into(),
            level,
            message: row.message,
            fields: row.fields,
            created_at: row.created_at,
        })
    }
}
