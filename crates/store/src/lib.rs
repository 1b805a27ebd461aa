// SPDX-License-Identifier: MIT

//! The durable Store capability and its adapters.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(feature = "test-support", allow(clippy::expect_used))]

pub mod error;
pub mod traits;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

pub use error::{StoreError, StoreResult};
pub use traits::{JobCounts, JobPatch, ProposalCounts, Store};

#[cfg(feature = "postgres")]
pub use postgres::PgStore;

#[cfg(any(test, feature = "test-support"))]
pub use memory::FakeStore;
