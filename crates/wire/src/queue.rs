// SPDX-License-Identifier: MIT

use cadence_core::Job;
use cadence_store::JobCounts;
use serde::Serialize;

/// Flat row for `cadence queue show`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JobSummary {
    pub id: String,
    pub job_type: String,
    pub status: String,
    pub attempt_count: u32,
    pub worker_id: Option<String>,
    pub last_error: Option<String>,
}

impl From<&Job> for JobSummary {
    fn from(j: &Job) -> Self {
        Self {
            id: j.id.as_str().to_string(),
            job_type: j.job_type().to_string(),
            status: j.status.to_string(),
            attempt_count: j.attempt_count,
            worker_id: j.worker_id.clone(),
            last_error: j.last_error.clone(),
        }
    }
}

/// Aggregate row for `cadence queue ls`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct QueueDepth {
    pub pending: u64,
    pub processing: u64,
    pub done: u64,
    pub failed: u64,
}

impl From<JobCounts> for QueueDepth {
    fn from(c: JobCounts) -> Self {
        Self { pending: c.pending, processing: c.processing, done: c.done, failed: c.failed }
    }
}
