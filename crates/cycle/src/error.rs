// SPDX-License-Identifier: MIT

use cadence_capabilities::RepoHostError;
use cadence_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    RepoHost(#[from] RepoHostError),
    #[error("transition called with an unexpected job payload: {0}")]
    WrongPayload(&'static str),
}

pub type CycleResult<T> = Result<T, CycleError>;
