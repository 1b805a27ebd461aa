// SPDX-License-Identifier: MIT

//! The `TokenProvider` capability: installation/OAuth token lifecycle.
//! Tokens expire mid-stage, so callers re-request rather than caching past
//! the capability boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::models::AppId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("oauth error: {0}")]
    OAuth(String),
    #[error("transient I/O error: {0}")]
    TransientIo(String),
}

#[derive(Debug, Clone)]
pub struct RepoToken {
    pub token: String,
    pub repo_ref: String,
}

#[async_trait]
pub trait TokenProvider: Send + Sync + 'static {
    async fn token_for(&self, repo_ref: &str) -> Result<RepoToken, TokenError>;
    /// Forces a refresh if the currently cached token (if any) is near
    /// expiry. Called once at worker startup and before every job.
    async fn ensure_valid(&self, repo_ref: &str) -> Result<(), TokenError>;
}

struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Production adapter exchanging a GitHub App private key for short-lived
/// per-repository installation tokens. Installation tokens last one hour;
/// we refresh five minutes before expiry so a long-running stage never
/// hands a caller a token that dies mid-call.
pub struct GitHubAppTokenProvider {
    app_id: AppId,
    private_key_pem: String,
    cache: Mutex<HashMap<String, CachedToken>>,
}

impl GitHubAppTokenProvider {
    pub fn new(app_id: u64, private_key_pem: impl Into<String>) -> Self {
        Self { app_id: AppId(app_id), private_key_pem: private_key_pem.into(), cache: Mutex::new(HashMap::new()) }
    }

    fn cached_is_fresh(&self, repo_ref: &str) -> Option<String> {
        let guard = self.cache.lock();
        guard.get(repo_ref).filter(|c| c.expires_at - Utc::now() > chrono::Duration::minutes(5)).map(|c| c.token.clone())
    }

    async fn refresh(&self, repo_ref: &str) -> Result<String, TokenError> {
        let key = jsonwebtoken::EncodingKey::from_rsa_pem(self.private_key_pem.as_bytes())
            .map_err(|e| TokenError::OAuth(format!("invalid app private key: {e}")))?;
        let app_client = octocrab::OctocrabBuilder::new()
            .app(self.app_id, key)
            .build()
            .map_err(|e| TokenError::OAuth(e.to_string()))?;

        let (owner, repo) = repo_ref
            .split_once('/')
            .ok_or_else(|| TokenError::OAuth(format!("malformed repo ref: {repo_ref}")))?;
        let installation = app_client
            .apps()
            .get_repository_installation(owner, repo)
            .await
            .map_err(|e| TokenError::TransientIo(e.to_string()))?;

        let (_client, token) = app_client
            .installation_and_token(installation.id)
            .await
            .map_err(|e| TokenError::TransientIo(e.to_string()))?;

        let expires_at = Utc::now() + chrono::Duration::minutes(55);
        self.cache.lock().insert(
            repo_ref.to_string(),
            CachedToken { token: token.expose_secret().to_string(), expires_at },
        );
        Ok(token.expose_secret().to_string())
    }
}

#[async_trait]
impl TokenProvider for GitHubAppTokenProvider {
    async fn token_for(&self, repo_ref: &str) -> Result<RepoToken, TokenError> {
        if let Some(token) = self.cached_is_fresh(repo_ref) {
            return Ok(RepoToken { token, repo_ref: repo_ref.to_string() });
        }
        let token = self.refresh(repo_ref).await?;
        Ok(RepoToken { token, repo_ref: repo_ref.to_string() })
    }

    async fn ensure_valid(&self, repo_ref: &str) -> Result<(), TokenError> {
        if self.cached_is_fresh(repo_ref).is_some() {
            return Ok(());
        }
        self.refresh(repo_ref).await.map(|_| ())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{RepoToken, TokenError, TokenProvider};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeTokenState {
        refresh_count: u32,
        fail_next: bool,
    }

    /// Fake `TokenProvider` always returning a fixed token, unless told to fail.
    #[derive(Clone)]
    pub struct FakeTokenProvider {
        inner: Arc<Mutex<FakeTokenState>>,
    }

    impl Default for FakeTokenProvider {
        fn default() -> Self {
            Self { inner: Arc::new(Mutex::new(FakeTokenState::default())) }
        }
    }

    impl FakeTokenProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_next_refresh(&self) {
            self.inner.lock().fail_next = true;
        }

        pub fn refresh_count(&self) -> u32 {
            self.inner.lock().refresh_count
        }
    }

    #[async_trait]
    impl TokenProvider for FakeTokenProvider {
        async fn token_for(&self, repo_ref: &str) -> Result<RepoToken, TokenError> {
            Ok(RepoToken { token: "fake-token".to_string(), repo_ref: repo_ref.to_string() })
        }

        async fn ensure_valid(&self, _repo_ref: &str) -> Result<(), TokenError> {
            let mut guard = self.inner.lock();
            if guard.fail_next {
                guard.fail_next = false;
                return Err(TokenError::OAuth("invalid_grant".to_string()));
            }
            guard.refresh_count += 1;
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeTokenProvider;

#[cfg(test)]
#[path = "token_provider_tests.rs"]
mod tests;
