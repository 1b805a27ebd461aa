// SPDX-License-Identifier: MIT

//! Finding entity: a scout-stage observation that seeds strategize. Not
//! itself a proposal — strategize reads a cycle's findings and drafts
//! proposals from them.

use crate::ids::{CycleId, FindingId, ProjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Minor,
    Major,
}

crate::simple_display! {
    Severity {
        Info => "info",
        Minor => "minor",
        Major => "major",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub id: FindingId,
    pub project_id: ProjectId,
    pub cycle_id: CycleId,
    pub category: String,
    pub description: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

crate::builder! {
    pub struct FindingBuilder => Finding {
        computed { id: FindingId = FindingId::new() }
        set { project_id: ProjectId = ProjectId::new() }
        computed { cycle_id: CycleId = CycleId::new() }
        into { category: String = "dependency" }
        into { description: String = "" }
        set { severity: Severity = Severity::Info }
        computed { created_at: DateTime<Utc> = Utc::now() }
    }
}

#[cfg(test)]
#[path = "finding_tests.rs"]
mod tests;
