// SPDX-License-Identifier: MIT

//! RunLog entity: a structured log line persisted to the store, distinct
//! from the `tracing` events stage workers emit to stdout/file.

use crate::ids::{JobId, ProjectId, RunLogId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

crate::simple_display! {
    LogLevel {
        Debug => "debug",
        Info => "info",
        Warn => "warn",
        Error => "error",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLog {
    pub id: RunLogId,
    pub project_id: ProjectId,
    pub job_id: JobId,
    pub level: LogLevel,
    pub message: String,
    pub fields: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

crate::builder! {
    pub struct RunLogBuilder => RunLog {
        computed { id: RunLogId = RunLogId::new() }
        set { project_id: ProjectId = ProjectId::new() }
        computed { job_id: JobId = JobId::new() }
        set { level: LogLevel = LogLevel::Info }
        into { message: String = "" }
        set { fields: serde_json::Value = serde_json::Value::Null }
        computed { created_at: DateTime<Utc> = Utc::now() }
    }
}

#[cfg(test)]
#[path = "run_log_tests.rs"]
mod tests;
