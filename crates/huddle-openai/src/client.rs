// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI Chat Completions API.
//!
//! Failures are split in two tiers: anything the service itself reports or
//! any transport failure becomes [`HuddleError::ProviderService`], while a
//! response we cannot make sense of becomes [`HuddleError::Provider`].

use std::time::Duration;

use huddle_core::HuddleError;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse};

/// HTTP client for the Chat Completions endpoint.
///
/// Retries once on transient statuses (429, 500, 503).
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl OpenAiClient {
    /// Creates a client authenticated with `api_key` against `base_url`
    /// (normally `https://api.openai.com/v1`).
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, HuddleError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| HuddleError::Config(format!("invalid API key header value: {e}")))?;
        headers.insert(reqwest::header::AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| HuddleError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            max_retries: 1,
            retry_delay: Duration::from_secs(1),
        })
    }

    /// Shortens the retry delay (for tests).
    #[cfg(test)]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Sends a completion request and returns the parsed response.
    pub async fn create(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, HuddleError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying completion request after transient error");
                tokio::time::sleep(self.retry_delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .json(request)
                .send()
                .await
                .map_err(|e| HuddleError::ProviderService {
                    status: None,
                    message: format!("HTTP request failed: {e}"),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "completion response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| HuddleError::Provider {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                return serde_json::from_str(&body).map_err(|e| HuddleError::Provider {
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let body = response.text().await.unwrap_or_default();
            let error = HuddleError::ProviderService {
                status: Some(status.as_u16()),
                message: describe_error(status, &body),
            };

            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(error);
                continue;
            }

            return Err(error);
        }

        Err(last_error.unwrap_or_else(|| HuddleError::ProviderService {
            status: None,
            message: "completion request failed after retries".into(),
        }))
    }
}

fn describe_error(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) => format!(
            "OpenAI API error ({}): {}",
            api_err.error.type_.as_deref().unwrap_or("unknown"),
            api_err.error.message
        ),
        Err(_) => format!("API returned {status}: {body}"),
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_core::types::CompletionMessage;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> OpenAiClient {
        OpenAiClient::new("sk-test", &server.uri(), Duration::from_secs(5))
            .unwrap()
            .with_retry_delay(Duration::from_millis(10))
    }

    fn test_request() -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: "gpt-4o".into(),
            messages: vec![CompletionMessage::user("Hello")],
            max_tokens: 500,
            temperature: 0.7,
        }
    }

    fn success_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        })
    }

    #[tokio::test]
    async fn create_success_sends_bearer_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("Confirmed")))
            .mount(&server)
            .await;

        let response = test_client(&server).create(&test_request()).await.unwrap();
        assert_eq!(response.first_content(), Some("Confirmed"));
        assert_eq!(response.usage.unwrap().prompt_tokens, 12);
    }

    #[tokio::test]
    async fn retries_once_on_429() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("After retry")))
            .mount(&server)
            .await;

        let response = test_client(&server).create(&test_request()).await.unwrap();
        assert_eq!(response.first_content(), Some("After retry"));
    }

    #[tokio::test]
    async fn exhausted_retries_are_service_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": {"message": "overloaded", "type": "server_error"}
            })))
            .expect(2)
            .mount(&server)
            .await;

        let err = test_client(&server).create(&test_request()).await.unwrap_err();
        assert!(err.is_service_error());
        assert!(err.to_string().contains("overloaded"), "got: {err}");
    }

    #[tokio::test]
    async fn auth_failure_is_a_service_error_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Incorrect API key", "type": "invalid_request_error"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server).create(&test_request()).await.unwrap_err();
        assert!(matches!(
            err,
            HuddleError::ProviderService {
                status: Some(401),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn garbage_body_is_not_a_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = test_client(&server).create(&test_request()).await.unwrap_err();
        assert!(!err.is_service_error());
    }

    #[tokio::test]
    async fn unreachable_server_is_a_service_error() {
        let client = OpenAiClient::new("sk-test", "http://127.0.0.1:9", Duration::from_secs(2))
            .unwrap();
        let err = client.create(&test_request()).await.unwrap_err();
        assert!(err.is_service_error());
    }
}
