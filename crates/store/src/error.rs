// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Failures raised by the [`crate::Store`] capability.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("transient I/O error: {0}")]
    TransientIo(String),

    #[error("permanent I/O error: {0}")]
    PermanentIo(String),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::TransientIo(_))
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound(err.to_string()),
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::TransientIo(err.to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::Conflict(err.to_string())
            }
            _ => StoreError::PermanentIo(err.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
