// SPDX-License-Identifier: MIT

use cadence_capabilities::DiagnoserError;
use cadence_cycle::CycleError;
use cadence_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatchdogError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Diagnoser(#[from] DiagnoserError),
    #[error(transparent)]
    Cycle(#[from] CycleError),
}

pub type WatchdogResult<T> = Result<T, WatchdogError>;
