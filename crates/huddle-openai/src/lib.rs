// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI provider for huddle.
//!
//! Implements [`CompletionProvider`] on top of the Chat Completions API.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use huddle_config::model::OpenAiConfig;
use huddle_core::types::CompletionRequest;
use huddle_core::{AdapterType, CompletionProvider, HealthStatus, HuddleError, PluginAdapter};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::ChatCompletionRequest;

/// OpenAI provider implementing [`CompletionProvider`].
pub struct OpenAiProvider {
    client: OpenAiClient,
    model: String,
}

impl OpenAiProvider {
    /// Creates the provider. Fails when no API key is configured.
    pub fn new(config: &OpenAiConfig) -> Result<Self, HuddleError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = OpenAiClient::new(
            &api_key,
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        info!(model = %config.model, "OpenAI provider initialized");
        Ok(Self {
            client,
            model: config.model.clone(),
        })
    }
}

fn resolve_api_key(config_key: &Option<String>) -> Result<String, HuddleError> {
    match config_key {
        Some(key) if !key.trim().is_empty() => Ok(key.clone()),
        _ => Err(HuddleError::Config(
            "OpenAI API key not found. Set openai.api_key in config or OPENAI_API_KEY environment variable.".into(),
        )),
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, HuddleError> {
        // No probe call: it would spend tokens.
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, HuddleError> {
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self.client.create(&body).await?;
        if let Some(usage) = &response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion usage"
            );
        }

        response
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| HuddleError::Provider {
                message: "completion response contained no message content".into(),
                source: None,
            })
    }
}
