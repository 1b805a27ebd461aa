// SPDX-License-Identifier: MIT

use cadence_capabilities::RepoHostError;
use cadence_cycle::CycleError;
use cadence_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    RepoHost(#[from] RepoHostError),
    #[error(transparent)]
    Cycle(#[from] CycleError),
}

pub type MergeResult<T> = Result<T, MergeError>;
