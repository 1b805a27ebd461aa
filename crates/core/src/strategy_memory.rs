// SPDX-License-Identifier: MIT

//! StrategyMemory and UserIdea: advisory records the strategize stage reads
//! before drafting proposals. Neither is binding; both are context.

use crate::ids::{ProjectId, StrategyMemoryId, UserIdeaId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A record of a past autonomy decision, kept so future strategize passes
/// don't re-propose something already tried and rejected (or already done).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyMemory {
    pub id: StrategyMemoryId,
    pub project_id: ProjectId,
    pub summary: String,
    pub outcome: String,
    pub created_at: DateTime<Utc>,
}

crate::builder! {
    pub struct StrategyMemoryBuilder => StrategyMemory {
        computed { id: StrategyMemoryId = StrategyMemoryId::new() }
        set { project_id: ProjectId = ProjectId::new() }
        into { summary: String = "" }
        into { outcome: String = "" }
        computed { created_at: DateTime<Utc> = Utc::now() }
    }
}

/// A human-submitted idea the strategize stage may fold into a draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdea {
    pub id: UserIdeaId,
    pub project_id: ProjectId,
    pub text: String,
    pub consumed: bool,
    pub created_at: DateTime<Utc>,
}

impl UserIdea {
    pub fn is_pending(&self) -> bool {
        !self.consumed
    }
}

crate::builder! {
    pub struct UserIdeaBuilder => UserIdea {
        computed { id: UserIdeaId = UserIdeaId::new() }
        set { project_id: ProjectId = ProjectId::new() }
        into { text: String = "" }
        set { consumed: bool = false }
        computed { created_at: DateTime<Utc> = Utc::now() }
    }
}

#[cfg(test)]
#[path = "strategy_memory_tests.rs"]
mod tests;
