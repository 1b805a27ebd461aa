// SPDX-License-Identifier: MIT

//! The `Notifier` capability: best-effort chat delivery. Failures here must
//! never break a pipeline, so every error is logged and swallowed at the
//! call site, never propagated as a stage failure.

use async_trait::async_trait;

#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Sends `message`, threaded under `thread_key` if the backend supports
    /// it. Implementations must not block the caller on network I/O.
    async fn notify(&self, message: &str, thread_key: Option<&str>);
}

/// Production adapter posting to a chat webhook over `reqwest`. Fires each
/// call as a detached `tokio::spawn` task so a slow or down webhook never
/// blocks the stage awaiting it.
#[derive(Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl WebhookNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), webhook_url: webhook_url.into() }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, message: &str, thread_key: Option<&str>) {
        let client = self.client.clone();
        let url = self.webhook_url.clone();
        let message = message.to_string();
        let thread_key = thread_key.map(str::to_string);
        tokio::spawn(async move {
            let mut body = serde_json::json!({ "text": message });
            if let Some(key) = &thread_key {
                body["thread_key"] = serde_json::Value::String(key.clone());
            }
            tracing::info!(%url, thread_key = thread_key.as_deref(), "sending webhook notification");
            match client.post(&url).json(&body).send().await {
                Ok(resp) if resp.status().is_success() => {
                    tracing::info!(%url, "webhook notification sent");
                }
                Ok(resp) => {
                    tracing::warn!(%url, status = %resp.status(), "webhook notification rejected");
                }
                Err(e) => {
                    tracing::warn!(%url, error = %e, "webhook notification failed");
                }
            }
        });
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::Notifier;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    pub struct NotifyCall {
        pub message: String,
        pub thread_key: Option<String>,
    }

    struct FakeNotifierState {
        calls: Vec<NotifyCall>,
    }

    /// Fake `Notifier` recording every call synchronously, for assertions.
    #[derive(Clone)]
    pub struct FakeNotifier {
        inner: Arc<Mutex<FakeNotifierState>>,
    }

    impl Default for FakeNotifier {
        fn default() -> Self {
            Self { inner: Arc::new(Mutex::new(FakeNotifierState { calls: Vec::new() })) }
        }
    }

    impl FakeNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<NotifyCall> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        async fn notify(&self, message: &str, thread_key: Option<&str>) {
            self.inner.lock().calls.push(NotifyCall {
                message: message.to_string(),
                thread_key: thread_key.map(str::to_string),
            });
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNotifier, NotifyCall};

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
