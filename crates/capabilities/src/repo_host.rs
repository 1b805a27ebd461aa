// SPDX-License-Identifier: MIT

//! The `RepoHost` capability: pull requests, refs, and reviews on the
//! version-control host. Stage workers are the only callers; the core never
//! shells out to `git` directly.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoHostError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("transient I/O error: {0}")]
    TransientIo(String),
}

#[derive(Debug, Clone)]
pub struct PullRequest {
    pub number: u64,
    pub head_sha: String,
    pub merged: bool,
}

#[derive(Debug, Clone)]
pub struct MergeResult {
    pub sha: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMethod {
    Squash,
    Merge,
    Rebase,
}

impl MergeMethod {
    fn as_str(self) -> &'static str {
        match self {
            MergeMethod::Squash => "squash",
            MergeMethod::Merge => "merge",
            MergeMethod::Rebase => "rebase",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewEvent {
    Approve,
    Comment,
    RequestChanges,
}

#[async_trait]
pub trait RepoHost: Send + Sync + 'static {
    async fn get_pr(&self, repo: &str, pr_num: u64) -> Result<PullRequest, RepoHostError>;
    async fn list_pr_files(&self, repo: &str, pr_num: u64) -> Result<Vec<String>, RepoHostError>;
    async fn merge_pr(&self, repo: &str, pr_num: u64, method: MergeMethod) -> Result<MergeResult, RepoHostError>;
    async fn delete_ref(&self, repo: &str, git_ref: &str) -> Result<(), RepoHostError>;
    async fn get_ref(&self, repo: &str, git_ref: &str) -> Result<String, RepoHostError>;
    /// Creates a review. Callers must fall back APPROVE→COMMENT and
    /// REQUEST_CHANGES→COMMENT when the token cannot review its own PR; the
    /// adapter performs the fallback, the trait just exposes the intent.
    async fn create_review(
        &self,
        repo: &str,
        pr_num: u64,
        commit_id: &str,
        body: &str,
        event: ReviewEvent,
    ) -> Result<(), RepoHostError>;
}

/// Production adapter over `octocrab`.
pub struct GitHubRepoHost {
    client: octocrab::Octocrab,
}

impl GitHubRepoHost {
    pub fn new(client: octocrab::Octocrab) -> Self {
        Self { client }
    }

    fn split_repo(repo: &str) -> Result<(&str, &str), RepoHostError> {
        repo.split_once('/').ok_or_else(|| RepoHostError::NotFound(format!("malformed repo ref {repo}")))
    }

    fn classify(err: octocrab::Error) -> RepoHostError {
        match &err {
            octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404 => {
                RepoHostError::NotFound(err.to_string())
            }
            octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 409 => {
                RepoHostError::Conflict(err.to_string())
            }
            octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 403 => {
                RepoHostError::RateLimited(err.to_string())
            }
            _ => RepoHostError::TransientIo(err.to_string()),
        }
    }
}

#[async_trait]
impl RepoHost for GitHubRepoHost {
    async fn get_pr(&self, repo: &str, pr_num: u64) -> Result<PullRequest, RepoHostError> {
        let (owner, name) = Self::split_repo(repo)?;
        let pr = self.client.pulls(owner, name).get(pr_num).await.map_err(Self::classify)?;
        Ok(PullRequest {
            number: pr.number,
            head_sha: pr.head.sha,
            merged: pr.merged.unwrap_or(false),
        })
    }

    async fn list_pr_files(&self, repo: &str, pr_num: u64) -> Result<Vec<String>, RepoHostError> {
        let (owner, name) = Self::split_repo(repo)?;
        let page = self.client.pulls(owner, name).list_files(pr_num).await.map_err(Self::classify)?;
        Ok(page.items.into_iter().map(|f| f.filename).collect())
    }

    async fn merge_pr(&self, repo: &str, pr_num: u64, method: MergeMethod) -> Result<MergeResult, RepoHostError> {
        let (owner, name) = Self::split_repo(repo)?;
        let merge_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
        };
        let result = self
            .client
            .pulls(owner, name)
            .merge(pr_num)
            .method(merge_method)
            .send()
            .await
            .map_err(Self::classify)?;
        tracing::info!(repo, pr_num, method = method.as_str(), "merged pull request");
        Ok(MergeResult { sha: result.sha.unwrap_or_default() })
    }

    async fn delete_ref(&self, repo: &str, git_ref: &str) -> Result<(), RepoHostError> {
        let (owner, name) = Self::split_repo(repo)?;
        self.client
            .repos(owner, name)
            .delete_ref(&octocrab::params::repos::Reference::Branch(git_ref.to_string()))
            .await
            .map_err(Self::classify)?;
        Ok(())
    }

    async fn get_ref(&self, repo: &str, git_ref: &str) -> Result<String, RepoHostError> {
        let (owner, name) = Self::split_repo(repo)?;
        let reference = self
            .client
            .repos(owner, name)
            .get_ref(&octocrab::params::repos::Reference::Branch(git_ref.to_string()))
            .await
            .map_err(Self::classify)?;
        match reference.object {
            octocrab::models::repos::Object::Commit { sha, .. } => Ok(sha),
            other => Err(RepoHostError::TransientIo(format!("unexpected ref object {other:?}"))),
        }
    }

    async fn create_review(
        &self,
        repo: &str,
        pr_num: u64,
        commit_id: &str,
        body: &str,
        event: ReviewEvent,
    ) -> Result<(), RepoHostError> {
        let (owner, name) = Self::split_repo(repo)?;
        let review_event = match event {
            ReviewEvent::Approve => octocrab::params::pulls::review::ReviewEvent::Approve,
            ReviewEvent::Comment => octocrab::params::pulls::review::ReviewEvent::Comment,
            ReviewEvent::RequestChanges => octocrab::params::pulls::review::ReviewEvent::RequestChanges,
        };
        let attempt = self
            .client
            .pulls(owner, name)
            .create_review(pr_num)
            .commit_id(commit_id.to_string())
            .body(body.to_string())
            .event(review_event)
            .send()
            .await;
        match attempt {
            Ok(_) => Ok(()),
            // A token cannot approve or request-changes on its own PR; GitHub
            // answers with 422/403 — fall back to a plain comment.
            Err(_) if event != ReviewEvent::Comment => {
                self.client
                    .pulls(owner, name)
                    .create_review(pr_num)
                    .commit_id(commit_id.to_string())
                    .body(body.to_string())
                    .event(octocrab::params::pulls::review::ReviewEvent::Comment)
                    .send()
                    .await
                    .map_err(Self::classify)?;
                Ok(())
            }
            Err(e) => Err(Self::classify(e)),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{MergeMethod, MergeResult, PullRequest, RepoHost, RepoHostError, ReviewEvent};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    pub struct ReviewCall {
        pub repo: String,
        pub pr_num: u64,
        pub commit_id: String,
        pub body: String,
        pub event: ReviewEvent,
    }

    #[derive(Default)]
    struct FakeRepoHostState {
        pull_requests: HashMap<(String, u64), PullRequest>,
        refs: HashMap<(String, String), String>,
        deleted_refs: Vec<(String, String)>,
        merges: Vec<(String, u64)>,
        reviews: Vec<ReviewCall>,
        fail_merge: bool,
    }

    /// In-memory fake `RepoHost` for tests.
    #[derive(Clone)]
    pub struct FakeRepoHost {
        inner: Arc<Mutex<FakeRepoHostState>>,
    }

    impl Default for FakeRepoHost {
        fn default() -> Self {
            Self { inner: Arc::new(Mutex::new(FakeRepoHostState::default())) }
        }
    }

    impl FakeRepoHost {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn seed_pr(&self, repo: &str, pr: PullRequest) {
            self.inner.lock().pull_requests.insert((repo.to_string(), pr.number), pr);
        }

        pub fn seed_ref(&self, repo: &str, git_ref: &str, sha: &str) {
            self.inner.lock().refs.insert((repo.to_string(), git_ref.to_string()), sha.to_string());
        }

        pub fn fail_next_merge(&self) {
            self.inner.lock().fail_merge = true;
        }

        pub fn merges(&self) -> Vec<(String, u64)> {
            self.inner.lock().merges.clone()
        }

        pub fn reviews(&self) -> Vec<ReviewCall> {
            self.inner.lock().reviews.clone()
        }

        pub fn deleted_refs(&self) -> Vec<(String, String)> {
            self.inner.lock().deleted_refs.clone()
        }
    }

    #[async_trait]
    impl RepoHost for FakeRepoHost {
        async fn get_pr(&self, repo: &str, pr_num: u64) -> Result<PullRequest, RepoHostError> {
            self.inner
                .lock()
                .pull_requests
                .get(&(repo.to_string(), pr_num))
                .cloned()
                .ok_or_else(|| RepoHostError::NotFound(format!("pr {pr_num}")))
        }

        async fn list_pr_files(&self, _repo: &str, _pr_num: u64) -> Result<Vec<String>, RepoHostError> {
            Ok(Vec::new())
        }

        async fn merge_pr(&self, repo: &str, pr_num: u64, _method: MergeMethod) -> Result<MergeResult, RepoHostError> {
            let mut guard = self.inner.lock();
            if guard.fail_merge {
                guard.fail_merge = false;
                return Err(RepoHostError::Conflict("already merged".to_string()));
            }
            guard.merges.push((repo.to_string(), pr_num));
            Ok(MergeResult { sha: format!("merged-{pr_num}") })
        }

        async fn delete_ref(&self, repo: &str, git_ref: &str) -> Result<(), RepoHostError> {
            self.inner.lock().deleted_refs.push((repo.to_string(), git_ref.to_string()));
            Ok(())
        }

        async fn get_ref(&self, repo: &str, git_ref: &str) -> Result<String, RepoHostError> {
            self.inner
                .lock()
                .refs
                .get(&(repo.to_string(), git_ref.to_string()))
                .cloned()
                .ok_or_else(|| RepoHostError::NotFound(format!("ref {git_ref}")))
        }

        async fn create_review(
            &self,
            repo: &str,
            pr_num: u64,
            commit_id: &str,
            body: &str,
            event: ReviewEvent,
        ) -> Result<(), RepoHostError> {
            self.inner.lock().reviews.push(ReviewCall {
                repo: repo.to_string(),
                pr_num,
                commit_id: commit_id.to_string(),
                body: body.to_string(),
                event,
            });
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRepoHost, ReviewCall};

#[cfg(test)]
#[path = "repo_host_tests.rs"]
mod tests;
