// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Slack Web API.
//!
//! Provides [`SlackClient`], a thin bearer-authenticated wrapper over the five
//! Web API methods the poll loop needs. Rate limiting and transient failures
//! are reported as errors; the poll loop retries on its next tick.

use std::time::Duration;

use huddle_core::HuddleError;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::types::{
    Acknowledged, AuthTest, ConversationsHistory, ConversationsList, SlackEnvelope, SlackMessage,
    SlackUser, UsersInfo,
};

/// Channel kinds requested from `conversations.list`.
const CHANNEL_TYPES: &str = "public_channel,private_channel";

/// Slack Web API client.
#[derive(Debug, Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
}

impl SlackClient {
    /// Creates a client for `api_base` (normally `https://slack.com/api`).
    pub fn new(api_base: &str, bot_token: &str, request_timeout: Duration) -> Result<Self, HuddleError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("huddle-slack"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(request_timeout)
            .build()
            .map_err(|e| HuddleError::Channel {
                message: format!("failed to build Slack HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.trim().to_string(),
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.api_base)
    }

    /// Sends a request and unwraps the `ok`/`error` envelope.
    async fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, HuddleError> {
        let response = request
            .bearer_auth(&self.bot_token)
            .send()
            .await
            .map_err(|e| HuddleError::Channel {
                message: format!("slack {method} request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(method, status = %status, "slack response received");

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("?")
                .to_string();
            return Err(HuddleError::channel(format!(
                "slack {method} rate limited (retry after {retry_after}s)"
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HuddleError::channel(format!(
                "slack {method} returned {status}: {body}"
            )));
        }

        let envelope: SlackEnvelope<T> =
            response.json().await.map_err(|e| HuddleError::Channel {
                message: format!("failed to parse slack {method} response: {e}"),
                source: Some(Box::new(e)),
            })?;

        if !envelope.ok {
            return Err(HuddleError::channel(format!(
                "slack {method} failed: {}",
                envelope.error.unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        Ok(envelope.data)
    }

    /// `auth.test`: the bot's own user id.
    pub async fn auth_test(&self) -> Result<String, HuddleError> {
        let auth: AuthTest = self
            .send("auth.test", self.http.post(self.url("auth.test")))
            .await?;
        auth.user_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| HuddleError::channel("slack auth.test did not return user_id"))
    }

    /// `conversations.list`: one page of public and private channels.
    pub async fn conversations_list(
        &self,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<ConversationsList, HuddleError> {
        let mut query = vec![
            ("types", CHANNEL_TYPES.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }
        self.send(
            "conversations.list",
            self.http.get(self.url("conversations.list")).query(&query),
        )
        .await
    }

    /// `conversations.history`: up to `limit` messages strictly newer than
    /// `oldest`, newest first.
    pub async fn conversations_history(
        &self,
        channel: &str,
        oldest: Option<&str>,
        limit: u32,
    ) -> Result<Vec<SlackMessage>, HuddleError> {
        let mut query = vec![
            ("channel", channel.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(oldest) = oldest {
            query.push(("oldest", oldest.to_string()));
        }
        let history: ConversationsHistory = self
            .send(
                "conversations.history",
                self.http.get(self.url("conversations.history")).query(&query),
            )
            .await?;
        Ok(history.messages)
    }

    /// `users.info`
    pub async fn users_info(&self, user: &str) -> Result<SlackUser, HuddleError> {
        let info: UsersInfo = self
            .send(
                "users.info",
                self.http.get(self.url("users.info")).query(&[("user", user)]),
            )
            .await?;
        info.user
            .ok_or_else(|| HuddleError::channel("slack users.info did not return user"))
    }

    /// `chat.postMessage`
    pub async fn post_message(&self, channel: &str, text: &str) -> Result<(), HuddleError> {
        let payload = json!({ "channel": channel, "text": text });
        let _: Acknowledged = self
            .send(
                "chat.postMessage",
                self.http.post(self.url("chat.postMessage")).json(&payload),
            )
            .await?;
        Ok(())
    }
}
