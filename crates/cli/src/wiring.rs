// SPDX-License-Identifier: MIT

//! Builds the production capability adapters from the environment. Kept
//! separate from `cadence_worker::Config`/`cadence_supervisor::Config`
//! since token/repo-host credentials are wiring concerns of the binary, not
//! poll-loop tuning knobs.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use cadence_capabilities::{GitHubAppTokenProvider, GitHubRepoHost, Notifier, RepoHost, TokenProvider, WebhookNotifier};
use cadence_store::{PgStore, Store};

/// Used when no notifier webhook is configured; swallows every call.
struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _message: &str, _thread_key: Option<&str>) {}
}

pub async fn connect_store(database_url: &str) -> Result<Arc<dyn Store>> {
    let store = PgStore::connect(database_url).await.context("connecting to the store")?;
    Ok(Arc::new(store))
}

pub fn token_provider() -> Result<Arc<dyn TokenProvider>> {
    let app_id: u64 = std::env::var("GITHUB_APP_ID")
        .context("GITHUB_APP_ID is required")?
        .parse()
        .context("GITHUB_APP_ID must be a number")?;
    let private_key_path =
        std::env::var("GITHUB_APP_PRIVATE_KEY_PATH").context("GITHUB_APP_PRIVATE_KEY_PATH is required")?;
    let private_key_pem = std::fs::read_to_string(&private_key_path)
        .with_context(|| format!("reading GitHub App private key at {private_key_path}"))?;
    Ok(Arc::new(GitHubAppTokenProvider::new(app_id, private_key_pem)))
}

pub fn repo_host() -> Result<Arc<dyn RepoHost>> {
    let token = std::env::var("GITHUB_TOKEN").context("GITHUB_TOKEN is required")?;
    let client = octocrab::Octocrab::builder().personal_token(token).build().context("building the GitHub client")?;
    Ok(Arc::new(GitHubRepoHost::new(client)))
}

pub fn notifier(webhook_url: Option<&str>) -> Arc<dyn Notifier> {
    match webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(url)),
        None => Arc::new(NoopNotifier),
    }
}
