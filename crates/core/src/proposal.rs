// SPDX-License-Identifier: MIT

//! Proposal entity: a candidate improvement authored by strategize.

use crate::ids::{CycleId, ProjectId, ProposalId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum average score for a draft to be admitted by autonomy.
///
/// A proposal scoring exactly this threshold is admitted; anything strictly
/// below (e.g. 0.5999…) is rejected.
pub const MIN_PROPOSAL_SCORE: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

crate::simple_display! {
    Priority {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Draft,
    Approved,
    Implementing,
    Done,
    Rejected,
}

impl ProposalStatus {
    /// Terminal statuses end a proposal's participation in its cycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProposalStatus::Done | ProposalStatus::Rejected)
    }

    /// Counted against `max_concurrent_branches`.
    pub fn is_active_branch(&self) -> bool {
        matches!(self, ProposalStatus::Approved | ProposalStatus::Implementing)
    }
}

crate::simple_display! {
    ProposalStatus {
        Draft => "draft",
        Approved => "approved",
        Implementing => "implementing",
        Done => "done",
        Rejected => "rejected",
    }
}

/// The four scores a strategize stage assigns a draft, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub impact: f64,
    pub feasibility: f64,
    pub novelty: f64,
    pub alignment: f64,
}

impl Scores {
    pub fn average(&self) -> f64 {
        (self.impact + self.feasibility + self.novelty + self.alignment) / 4.0
    }

    /// Whether this score set clears `min_score`, the configured admission bar.
    pub fn is_admissible(&self, min_score: f64) -> bool {
        self.average() >= min_score
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub project_id: ProjectId,
    pub cycle_id: Option<CycleId>,
    pub title: String,
    pub spec_text: String,
    pub rationale: String,
    pub priority: Priority,
    pub scores: Scores,
    pub status: ProposalStatus,
    pub is_wild_card: bool,
    pub branch_name: Option<String>,
    pub reject_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Proposal {
    /// Whether this draft's spec text mentions a risk path, matched as a
    /// case-insensitive substring.
    pub fn touches_risk_path(&self, risk_paths: &[String]) -> bool {
        let spec_lower = self.spec_text.to_lowercase();
        risk_paths.iter().any(|path| spec_lower.contains(&path.to_lowercase()))
    }
}

crate::builder! {
    pub struct ProposalBuilder => Proposal {
        computed { id: ProposalId = ProposalId::new() }
        set { project_id: ProjectId = ProjectId::new() }
        option { cycle_id: CycleId = None }
        into { title: String = "Add retry budget to fetch client" }
        into { spec_text: String = "" }
        into { rationale: String = "" }
        set { priority: Priority = Priority::Medium }
        set { scores: Scores = Scores { impact: 0.7, feasibility: 0.7, novelty: 0.7, alignment: 0.7 } }
        set { status: ProposalStatus = ProposalStatus::Draft }
        set { is_wild_card: bool = false }
        option { branch_name: String = None }
        option { reject_reason: String = None }
        computed { created_at: DateTime<Utc> = Utc::now() }
        computed { updated_at: DateTime<Utc> = Utc::now() }
    }
}

#[cfg(test)]
#[path = "proposal_tests.rs"]
mod tests;
