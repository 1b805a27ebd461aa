// SPDX-License-Identifier: MIT

use cadence_core::Proposal;
use serde::Serialize;

/// Flat row for listing proposals within a project.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProposalSummary {
    pub id: String,
    pub title: String,
    pub priority: String,
    pub status: String,
    pub score: f64,
    pub is_wild_card: bool,
    pub branch_name: Option<String>,
}

impl From<&Proposal> for ProposalSummary {
    fn from(p: &Proposal) -> Self {
        Self {
            id: p.id.as_str().to_string(),
            title: p.title.clone(),
            priority: p.priority.to_string(),
            status: p.status.to_string(),
            score: p.scores.average(),
            is_wild_card: p.is_wild_card,
            branch_name: p.branch_name.clone(),
        }
    }
}
