// SPDX-License-Identifier: MIT

//! The cycle state machine: the transition functions the worker calls after
//! each stage job completes, plus the completion check that decides when a
//! cycle is done and whether automate mode should open the next one.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod completion;
mod error;
mod scout;
mod transitions;

pub use completion::check_cycle_completion;
pub use error::{CycleError, CycleResult};
pub use scout::open_cycle_and_enqueue_scout;
pub use transitions::{
    on_build_completed_with_no_changes, on_build_completed_with_pr, on_fix_build_completed_with_changes,
    on_fix_build_completed_with_no_changes, on_review_approved, on_review_rejected, on_scout_completed,
};
