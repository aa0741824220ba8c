// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack polling source for huddle.
//!
//! [`SlackAdapter`] exposes the Slack Web API as a [`PollableChatApi`] for the
//! poll loop and as a [`ReplySink`] for answers.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use huddle_config::model::SlackConfig;
use huddle_core::types::{ChannelPage, PolledMessage};
use huddle_core::{
    AdapterType, HealthStatus, HuddleError, Platform, PluginAdapter, PollableChatApi, ReplySink,
};
use tokio::sync::OnceCell;
use tracing::info;

use crate::client::SlackClient;

/// Slack adapter backed by the Web API.
///
/// The bot's own user id is resolved lazily through `auth.test` and cached
/// once it succeeds.
pub struct SlackAdapter {
    client: SlackClient,
    channel_page_limit: u32,
    bot_user_id: OnceCell<String>,
}

impl SlackAdapter {
    /// Creates the adapter. Fails when no bot token is configured.
    pub fn new(config: &SlackConfig) -> Result<Self, HuddleError> {
        let token = resolve_bot_token(&config.bot_token)?;
        let client = SlackClient::new(
            &config.api_base,
            &token,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        info!(api_base = %config.api_base, "Slack adapter initialized");
        Ok(Self {
            client,
            channel_page_limit: config.channel_page_limit,
            bot_user_id: OnceCell::new(),
        })
    }
}

fn resolve_bot_token(config_token: &Option<String>) -> Result<String, HuddleError> {
    match config_token {
        Some(token) if !token.trim().is_empty() => Ok(token.clone()),
        _ => Err(HuddleError::Config(
            "Slack bot token not found. Set slack.bot_token in config or SLACK_BOT_TOKEN environment variable.".into(),
        )),
    }
}

#[async_trait]
impl PluginAdapter for SlackAdapter {
    fn name(&self) -> &str {
        "slack"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, HuddleError> {
        match self.bot_user_id().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl PollableChatApi for SlackAdapter {
    async fn bot_user_id(&self) -> Result<String, HuddleError> {
        self.bot_user_id
            .get_or_try_init(|| self.client.auth_test())
            .await
            .cloned()
    }

    async fn list_channels(&self, cursor: Option<&str>) -> Result<ChannelPage, HuddleError> {
        let list = self
            .client
            .conversations_list(cursor, self.channel_page_limit)
            .await?;
        let next_cursor = list.next_cursor();
        Ok(ChannelPage {
            channels: list.channels.into_iter().map(Into::into).collect(),
            next_cursor,
        })
    }

    async fn fetch_messages(
        &self,
        channel_id: &str,
        since: Option<&str>,
        limit: u32,
    ) -> Result<Vec<PolledMessage>, HuddleError> {
        let messages = self
            .client
            .conversations_history(channel_id, since, limit)
            .await?;
        Ok(messages.into_iter().map(Into::into).collect())
    }

    async fn resolve_display_name(&self, user_id: &str) -> Result<String, HuddleError> {
        self.client
            .users_info(user_id)
            .await?
            .best_name()
            .ok_or_else(|| HuddleError::channel(format!("slack user {user_id} has no name")))
    }
}

#[async_trait]
impl ReplySink for SlackAdapter {
    fn platform(&self) -> Platform {
        Platform::Slack
    }

    async fn send(&self, chat_id: &str, text: &str) -> Result<(), HuddleError> {
        self.client.post_message(chat_id, text).await
    }
}
