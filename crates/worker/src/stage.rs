// SPDX-License-Identifier: MIT

//! The `StageWorker` seam: one implementation per `job_type`, dispatched by
//! the poll loop. Stage bodies themselves (cloning a repo, invoking a
//! model, posting a review) are out of scope here — this crate ships the
//! trait, the dispatch table, and the plumbing around it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cadence_capabilities::{Notifier, RepoHost, TokenProvider};
use cadence_core::{Job, JobType, Project};
use cadence_store::Store;
use thiserror::Error;

use crate::workspace::Workspace;

/// Per-stage timeout budget, applied via `tokio::time::timeout` around
/// `StageWorker::run`.
pub fn stage_timeout(job_type: JobType) -> Duration {
    match job_type {
        JobType::Scout | JobType::Strategize | JobType::Build | JobType::SelfImprove => Duration::from_secs(45 * 60),
        JobType::Review | JobType::FixBuild => Duration::from_secs(15 * 60),
    }
}

/// Everything a stage needs, handed in by the poll loop. Stages never reach
/// past these handles — no direct file or shell access outside of what the
/// capabilities expose.
pub struct StageContext {
    pub job: Job,
    pub project: Project,
    pub store: Arc<dyn Store>,
    pub repo_host: Arc<dyn RepoHost>,
    pub token_provider: Arc<dyn TokenProvider>,
    pub notifier: Arc<dyn Notifier>,
    pub workspace: Workspace,
}

/// What a stage reports back; the poll loop turns this into the matching
/// cycle-state-machine transition.
#[derive(Debug, Clone)]
pub enum StageOutcome {
    ScoutDone,
    StrategizeDone,
    BuildWithPr { pr_number: u64, head_sha: String },
    BuildNoChanges,
    ReviewApproved,
    ReviewRejected { concerns: Vec<String> },
    FixBuildWithChanges { pr_number: u64, head_sha: String },
    FixBuildNoChanges,
}

#[derive(Debug, Error)]
pub enum StageError {
    #[error("store error: {0}")]
    Store(#[from] cadence_store::StoreError),
    #[error("repo host error: {0}")]
    RepoHost(#[from] cadence_capabilities::RepoHostError),
    #[error("token error: {0}")]
    Token(#[from] cadence_capabilities::TokenError),
    #[error("stage failed: {0}")]
    Other(String),
}

#[async_trait]
pub trait StageWorker: Send + Sync {
    async fn run(&self, ctx: StageContext) -> Result<StageOutcome, StageError>;
}

/// Maps each `JobType` to the `StageWorker` that handles it. Stage bodies
/// are registered by whoever assembles the worker binary; this crate only
/// defines the table shape and the lookup.
#[derive(Default)]
pub struct StageDispatch {
    workers: HashMap<JobType, Arc<dyn StageWorker>>,
}

impl StageDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, job_type: JobType, worker: Arc<dyn StageWorker>) -> &mut Self {
        self.workers.insert(job_type, worker);
        self
    }

    pub fn get(&self, job_type: JobType) -> Option<Arc<dyn StageWorker>> {
        self.workers.get(&job_type).cloned()
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
