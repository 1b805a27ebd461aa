// SPDX-License-Identifier: MIT

use cadence_capabilities::{RepoHostError, TokenError};
use cadence_cycle::CycleError;
use cadence_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    RepoHost(#[from] RepoHostError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Cycle(#[from] CycleError),
    #[error("child process error: {0}")]
    Child(#[from] std::io::Error),
}

pub type SupervisorResult<T> = Result<T, SupervisorError>;
