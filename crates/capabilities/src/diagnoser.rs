// SPDX-License-Identifier: MIT

//! The `Diagnoser` capability: an LLM-backed health read on a snapshot of
//! queue/proposal/event state. Modeled narrowly so the watchdog's own logic
//! — snapshotting, action-set validation, precondition checks — is what's
//! under test, not the diagnosis call itself.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiagnoserError {
    #[error("transient I/O error: {0}")]
    TransientIo(String),
    #[error("response did not parse as a diagnosis: {0}")]
    BadResponse(String),
}

/// Everything the diagnoser is allowed to see: queue counts, recent
/// proposals, recent BranchEvents, and a log tail. Assembled by the
/// watchdog crate from the Store.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticSnapshot {
    pub project_id: String,
    pub pending_jobs: u32,
    pub processing_jobs: u32,
    pub failed_jobs: u32,
    pub recent_events: Vec<String>,
    pub recent_log_tail: Vec<String>,
}

/// The closed set of actions a diagnosis may request. Anything outside
/// this set is not representable, let alone applicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisAction {
    SendNotification,
    RetriggerJob,
    RejectProposal,
    ReleaseMergeLock,
    TriggerScout,
    ResetJobAttempts,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Diagnosis {
    pub summary: String,
    pub actions: Vec<DiagnosisAction>,
    /// Present when an action targets a specific entity (a job id, a
    /// proposal id); the watchdog resolves and validates this before acting.
    pub target_id: Option<String>,
}

#[async_trait]
pub trait Diagnoser: Send + Sync + 'static {
    async fn diagnose(&self, snapshot: &DiagnosticSnapshot) -> Result<Diagnosis, DiagnoserError>;
}

/// A `Diagnoser` that never recommends anything. The real diagnosis call is
/// an LLM request, out of scope to implement here; this lets the health
/// sweep wire the watchdog pass in unconditionally without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnoser;

#[async_trait]
impl Diagnoser for NoopDiagnoser {
    async fn diagnose(&self, _snapshot: &DiagnosticSnapshot) -> Result<Diagnosis, DiagnoserError> {
        Ok(Diagnosis { summary: "no diagnoser configured".to_string(), actions: Vec::new(), target_id: None })
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{Diagnosis, DiagnosisAction, Diagnoser, DiagnosticSnapshot, DiagnoserError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Fake `Diagnoser` returning a scripted diagnosis, defaulting to the
    /// safe `send_notification` action.
    #[derive(Clone)]
    pub struct FakeDiagnoser {
        next: Arc<Mutex<Diagnosis>>,
    }

    impl Default for FakeDiagnoser {
        fn default() -> Self {
            Self {
                next: Arc::new(Mutex::new(Diagnosis {
                    summary: "nothing unusual".to_string(),
                    actions: vec![DiagnosisAction::SendNotification],
                    target_id: None,
                })),
            }
        }
    }

    impl FakeDiagnoser {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_next(&self, diagnosis: Diagnosis) {
            *self.next.lock() = diagnosis;
        }
    }

    #[async_trait]
    impl Diagnoser for FakeDiagnoser {
        async fn diagnose(&self, _snapshot: &DiagnosticSnapshot) -> Result<Diagnosis, DiagnoserError> {
            Ok(self.next.lock().clone())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeDiagnoser;

#[cfg(test)]
#[path = "diagnoser_tests.rs"]
mod tests;
