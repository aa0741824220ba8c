// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion provider for deterministic testing.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use huddle_core::types::CompletionRequest;
use huddle_core::{AdapterType, CompletionProvider, HealthStatus, HuddleError, PluginAdapter};

/// A completion provider that returns queued results.
///
/// Results are popped from a FIFO queue. When the queue is empty, a default
/// "mock response" text is returned. Every request is captured.
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<Result<String, HuddleError>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider pre-loaded with successful responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().map(Ok).collect())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn add_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(Ok(text.into()));
    }

    /// Queue a failure; the next `complete` returns it.
    pub async fn add_error(&self, error: HuddleError) {
        self.responses.lock().await.push_back(Err(error));
    }

    /// Requests received so far, in order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, HuddleError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, HuddleError> {
        self.requests.lock().await.push(request);
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("mock response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            messages: vec![],
            max_tokens: 1,
            temperature: 0.0,
        }
    }

    #[tokio::test]
    async fn queued_results_then_default() {
        let provider = MockProvider::with_responses(vec!["first".into()]);
        provider
            .add_error(HuddleError::ProviderService {
                status: Some(503),
                message: "down".into(),
            })
            .await;

        assert_eq!(provider.complete(request()).await.unwrap(), "first");
        assert!(provider.complete(request()).await.unwrap_err().is_service_error());
        assert_eq!(provider.complete(request()).await.unwrap(), "mock response");
        assert_eq!(provider.call_count().await, 3);
    }
}
