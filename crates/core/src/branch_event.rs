// SPDX-License-Identifier: MIT

//! BranchEvent entity: the append-only observability log.
//!
//! Consumers derive state by reading the tail; nothing here is ever mutated
//! once inserted.

use crate::ids::{BranchEventId, ProjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Autonomy,
    Builder,
    Reviewer,
    Strategist,
    Supervisor,
    Watchdog,
}

crate::simple_display! {
    Actor {
        Autonomy => "autonomy",
        Builder => "builder",
        Reviewer => "reviewer",
        Strategist => "strategist",
        Supervisor => "supervisor",
        Watchdog => "watchdog",
    }
}

/// Observable event kinds. Kept as a string-backed enum rather than a
/// closed Rust enum: new event kinds are cheap to add without a migration,
/// mirroring how BranchEvents are meant to be an append-only, ever-growing log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventType(pub String);

impl EventType {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EventType {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for EventType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Well-known event type constants used by the cycle state machine and merge
/// coordinator. Not an exhaustive list — stages may emit others.
pub mod kinds {
    pub const BUILD_STARTED: &str = "build_started";
    pub const BUILD_FAILED: &str = "build_failed";
    pub const REVIEW_REJECTED: &str = "review_rejected";
    pub const PR_MERGED: &str = "pr_merged";
    pub const AUTO_MERGED: &str = "auto_merged";
    pub const AUTO_APPROVED: &str = "auto_approved";
    pub const CHECKPOINT_CREATED: &str = "checkpoint_created";
    pub const CYCLE_COMPLETED: &str = "cycle_completed";
    pub const CYCLE_STARTED: &str = "cycle_started";
    pub const MERGE_FAILED: &str = "merge_failed";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchEvent {
    pub id: BranchEventId,
    pub project_id: ProjectId,
    pub branch_name: Option<String>,
    pub event_type: EventType,
    pub event_data: serde_json::Value,
    pub actor: Actor,
    pub commit_sha: Option<String>,
    pub created_at: DateTime<Utc>,
}

crate::builder! {
    pub struct BranchEventBuilder => BranchEvent {
        computed { id: BranchEventId = BranchEventId::new() }
        set { project_id: ProjectId = ProjectId::new() }
        option { branch_name: String = None }
        into { event_type: EventType = EventType::new("build_started") }
        set { event_data: serde_json::Value = serde_json::Value::Null }
        set { actor: Actor = Actor::Autonomy }
        option { commit_sha: String = None }
        computed { created_at: DateTime<Utc> = Utc::now() }
    }
}

#[cfg(test)]
#[path = "branch_event_tests.rs"]
mod tests;
