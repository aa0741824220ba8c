// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram push ingress for huddle.
//!
//! Runs a teloxide long-polling dispatcher that forwards group text messages
//! to a [`PushHandler`], and exposes a [`ReplySink`] for answers.

pub mod handler;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use huddle_config::model::TelegramConfig;
use huddle_core::{
    AdapterType, HealthStatus, HuddleError, Platform, PluginAdapter, PushHandler, ReplySink,
};
use teloxide::prelude::*;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How often a stop request is retried while the dispatcher is still starting.
const SHUTDOWN_RETRY_INTERVAL: Duration = Duration::from_millis(100);
const SHUTDOWN_MAX_ATTEMPTS: u32 = 50;

/// Telegram channel driven by teloxide long polling.
pub struct TelegramChannel {
    bot: Bot,
    mention: Option<String>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel. Requires `config.bot_token`.
    pub fn new(config: &TelegramConfig) -> Result<Self, HuddleError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            HuddleError::Config("telegram.bot_token is required for Telegram adapter".into())
        })?;

        if token.trim().is_empty() {
            return Err(HuddleError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        Ok(Self {
            bot: Bot::new(token),
            mention: config.mention.clone(),
        })
    }

    /// A reply sink sharing this channel's bot client.
    pub fn sender(&self) -> TelegramSender {
        TelegramSender {
            bot: self.bot.clone(),
        }
    }

    /// The mention token that addresses the bot: the configured one, or
    /// `@<username>` as reported by `getMe`.
    pub async fn mention(&self) -> Result<String, HuddleError> {
        if let Some(mention) = &self.mention {
            return Ok(mention.clone());
        }
        let me = self.bot.get_me().await.map_err(|e| HuddleError::Channel {
            message: format!("telegram getMe failed: {e}"),
            source: Some(Box::new(e)),
        })?;
        me.user
            .username
            .clone()
            .map(|username| format!("@{username}"))
            .ok_or_else(|| HuddleError::channel("telegram bot has no username"))
    }

    /// Starts long polling on a background task.
    ///
    /// Every accepted message is handed to `handler`. The dispatcher stops
    /// once `cancel` fires.
    pub fn spawn(&self, handler: Arc<dyn PushHandler>, cancel: CancellationToken) -> JoinHandle<()> {
        let bot = self.bot.clone();
        info!("starting Telegram long polling");

        tokio::spawn(async move {
            let tree = Update::filter_message().endpoint(move |msg: Message| {
                let handler = handler.clone();
                async move {
                    match handler::to_push_message(&msg) {
                        Some(push) => handler.handle(push).await,
                        None => debug!(chat_id = msg.chat.id.0, "ignoring non-group or non-text message"),
                    }
                    respond(())
                }
            });

            let mut dispatcher = Dispatcher::builder(bot, tree)
                .default_handler(|_| async {})
                .build();

            let shutdown = dispatcher.shutdown_token();
            tokio::spawn(async move {
                cancel.cancelled().await;
                for _ in 0..SHUTDOWN_MAX_ATTEMPTS {
                    match shutdown.shutdown() {
                        Ok(stopped) => {
                            stopped.await;
                            return;
                        }
                        // Not running yet (or already gone).
                        Err(_) => tokio::time::sleep(SHUTDOWN_RETRY_INTERVAL).await,
                    }
                }
                warn!("Telegram dispatcher did not accept the stop request");
            });

            dispatcher.dispatch().await;
            info!("Telegram dispatcher stopped");
        })
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, HuddleError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }
}

/// Sends answers into Telegram chats.
#[derive(Clone)]
pub struct TelegramSender {
    bot: Bot,
}

#[async_trait]
impl ReplySink for TelegramSender {
    fn platform(&self) -> Platform {
        Platform::Telegram
    }

    async fn send(&self, chat_id: &str, text: &str) -> Result<(), HuddleError> {
        let chat_id = chat_id
            .parse::<i64>()
            .map(ChatId)
            .map_err(|e| HuddleError::Channel {
                message: format!("invalid chat_id: {e}"),
                source: None,
            })?;

        self.bot
            .send_message(chat_id, text)
            .await
            .map_err(|e| HuddleError::Channel {
                message: format!("failed to send message: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_requires_bot_token() {
        assert!(TelegramChannel::new(&TelegramConfig::default()).is_err());
    }

    #[test]
    fn new_rejects_empty_token() {
        let config = TelegramConfig {
            bot_token: Some(String::new()),
            mention: None,
        };
        assert!(TelegramChannel::new(&config).is_err());
    }

    #[test]
    fn new_accepts_valid_token() {
        let config = TelegramConfig {
            bot_token: Some("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11".into()),
            mention: None,
        };
        let channel = TelegramChannel::new(&config).unwrap();
        assert_eq!(channel.name(), "telegram");
        assert_eq!(channel.adapter_type(), AdapterType::Channel);
        assert_eq!(channel.sender().platform(), Platform::Telegram);
    }

    #[tokio::test]
    async fn configured_mention_skips_get_me() {
        let config = TelegramConfig {
            bot_token: Some("123456:ABC".into()),
            mention: Some("@TradeSessionAssistBot".into()),
        };
        let channel = TelegramChannel::new(&config).unwrap();
        assert_eq!(channel.mention().await.unwrap(), "@TradeSessionAssistBot");
    }

    #[tokio::test]
    async fn send_rejects_non_numeric_chat_id() {
        let config = TelegramConfig {
            bot_token: Some("123456:ABC".into()),
            mention: None,
        };
        let sender = TelegramChannel::new(&config).unwrap().sender();
        let err = sender.send("not-a-chat", "hi").await.unwrap_err();
        assert!(err.to_string().contains("invalid chat_id"));
    }
}
