// SPDX-License-Identifier: MIT

//! Project entity: a repository under autonomous management.

use crate::ids::ProjectId;
use serde::{Deserialize, Serialize};

/// How much the pipeline is allowed to do without a human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutonomyMode {
    /// No auto actions: proposals stay drafts until a human approves them.
    Audit,
    /// Auto-build for low-risk proposals only (risk_paths are respected).
    Assist,
    /// Full end-to-end including merge.
    Automate,
}

crate::simple_display! {
    AutonomyMode {
        Audit => "audit",
        Assist => "assist",
        Automate => "automate",
    }
}

/// A repository under management.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    /// Host-side repository reference, e.g. `"owner/repo"`.
    pub host_repo_ref: String,
    /// Installation identity for the host's app/bot account, if any.
    pub installation_id: Option<String>,
    pub default_branch: String,
    pub autonomy_mode: AutonomyMode,
    pub max_concurrent_branches: u32,
    /// Ordered list of substrings; a proposal whose spec text contains one
    /// (case-insensitive) is treated as high risk in `assist` mode.
    pub risk_paths: Vec<String>,
    pub paused: bool,
    /// Single-writer lock: true while a merge transaction is live.
    pub merge_in_progress: bool,
    pub scout_schedule: String,
    pub wild_card_frequency: f64,
    pub product_context: String,
    pub strategic_nudges: Vec<String>,
}

impl Project {
    /// Whether this project can perform any kind of automated action at all.
    pub fn is_actionable(&self) -> bool {
        !self.paused && self.autonomy_mode != AutonomyMode::Audit
    }
}

crate::builder! {
    pub struct ProjectBuilder => Project {
        computed { id: ProjectId = ProjectId::new() }
        into { host_repo_ref: String = "acme/widgets" }
        option { installation_id: String = None }
        into { default_branch: String = "main" }
        set { autonomy_mode: AutonomyMode = AutonomyMode::Automate }
        set { max_concurrent_branches: u32 = 3 }
        set { risk_paths: Vec<String> = Vec::new() }
        set { paused: bool = false }
        set { merge_in_progress: bool = false }
        into { scout_schedule: String = "0 * * * *" }
        set { wild_card_frequency: f64 = 0.2 }
        into { product_context: String = "" }
        set { strategic_nudges: Vec<String> = Vec::new() }
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
