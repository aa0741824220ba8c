// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Answer composition and relay.
//!
//! Reads both history windows, asks the completion provider and sends the
//! result (or a fixed apology) back through the caller's [`ReplySink`].

use std::sync::Arc;

use huddle_config::model::{HistoryConfig, OpenAiConfig};
use huddle_core::types::{CompletionMessage, CompletionRequest};
use huddle_core::{CompletionProvider, HuddleError, Platform, ReplySink};
use tracing::{error, info, warn};

use crate::history::HistoryLog;
use crate::prompt::{build_system_prompt, build_user_prompt};

/// Sent when the completion service itself failed.
pub const SERVICE_APOLOGY: &str = "There's a problem with the AI service, please try again later.";

/// Sent for any other failure while producing an answer.
pub const GENERIC_APOLOGY: &str = "An error occurred, please try again later.";

/// Builds context-augmented prompts and relays the answers.
pub struct AnswerComposer {
    history: HistoryLog,
    provider: Arc<dyn CompletionProvider>,
    persona: String,
    channel_limit: u32,
    global_limit: u32,
    max_tokens: u32,
    temperature: f32,
}

impl AnswerComposer {
    pub fn new(
        history: HistoryLog,
        provider: Arc<dyn CompletionProvider>,
        persona: String,
        history_config: &HistoryConfig,
        openai_config: &OpenAiConfig,
    ) -> Self {
        Self {
            history,
            provider,
            persona,
            channel_limit: history_config.channel_limit,
            global_limit: history_config.global_limit,
            max_tokens: openai_config.max_tokens,
            temperature: openai_config.temperature,
        }
    }

    /// Answers `question` asked in `chat_id` and sends the reply through `sink`.
    ///
    /// Never fails: completion errors become one of the two apologies and
    /// send failures are logged.
    pub async fn answer(&self, sink: &dyn ReplySink, chat_id: &str, question: &str) {
        let platform = sink.platform();

        let reply = match self.complete(platform, chat_id, question).await {
            Ok(text) => {
                info!(%platform, chat_id, answer = text.as_str(), "answer generated");
                text
            }
            Err(e) if e.is_service_error() => {
                error!(%platform, chat_id, error = %e, "completion service failed");
                SERVICE_APOLOGY.to_string()
            }
            Err(e) => {
                error!(%platform, chat_id, error = %e, "failed to generate answer");
                GENERIC_APOLOGY.to_string()
            }
        };

        if let Err(e) = sink.send(chat_id, &reply).await {
            warn!(%platform, chat_id, error = %e, "failed to send reply");
        }
    }

    async fn complete(
        &self,
        platform: Platform,
        chat_id: &str,
        question: &str,
    ) -> Result<String, HuddleError> {
        let channel = self
            .history
            .channel(platform, chat_id, self.channel_limit)
            .await;
        let global = self.history.all(self.global_limit).await;

        let request = CompletionRequest {
            messages: vec![
                CompletionMessage::system(build_system_prompt(&self.persona, platform)),
                CompletionMessage::user(build_user_prompt(platform, &global, &channel, question)),
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let text = self.provider.complete(request).await?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(HuddleError::Provider {
                message: "completion returned an empty answer".into(),
                source: None,
            });
        }
        Ok(trimmed.to_string())
    }
}
