// SPDX-License-Identifier: MIT

use cadence_core::Project;
use serde::Serialize;

/// Flat row for `cadence project pause/resume` and any future project
/// listing command.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProjectSummary {
    pub id: String,
    pub host_repo_ref: String,
    pub autonomy_mode: String,
    pub paused: bool,
    pub merge_in_progress: bool,
    pub max_concurrent_branches: u32,
}

impl From<&Project> for ProjectSummary {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id.as_str().to_string(),
            host_repo_ref: p.host_repo_ref.clone(),
            autonomy_mode: p.autonomy_mode.to_string(),
            paused: p.paused,
            merge_in_progress: p.merge_in_progress,
            max_concurrent_branches: p.max_concurrent_branches,
        }
    }
}
