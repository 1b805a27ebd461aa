// SPDX-License-Identifier: MIT

//! Narrow capability traits used by stage workers, each with a production
//! adapter and an in-memory fake, following the notify-adapter split from
//! the daemon's adapters crate.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(feature = "test-support", allow(clippy::expect_used))]

pub mod diagnoser;
pub mod notify;
pub mod repo_host;
pub mod token_provider;

pub use diagnoser::{Diagnosis, DiagnosisAction, Diagnoser, DiagnoserError, DiagnosticSnapshot, NoopDiagnoser};
pub use notify::{Notifier, WebhookNotifier};
pub use repo_host::{GitHubRepoHost, MergeMethod, MergeResult, PullRequest, RepoHost, RepoHostError, ReviewEvent};
pub use token_provider::{GitHubAppTokenProvider, RepoToken, TokenError, TokenProvider};

#[cfg(any(test, feature = "test-support"))]
pub use diagnoser::FakeDiagnoser;
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifier;
#[cfg(any(test, feature = "test-support"))]
pub use repo_host::FakeRepoHost;
#[cfg(any(test, feature = "test-support"))]
pub use token_provider::FakeTokenProvider;
