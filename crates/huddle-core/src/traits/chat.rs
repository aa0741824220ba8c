// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat platform traits: the pollable source, the push receiver and the
//! per-platform send capability.

use async_trait::async_trait;

use crate::error::HuddleError;
use crate::types::{ChannelPage, Platform, PolledMessage, PushMessage};

/// A channel chat API that has to be polled for new messages.
#[async_trait]
pub trait PollableChatApi: Send + Sync {
    /// Resolves the bot's own user id, used for self-suppression.
    async fn bot_user_id(&self) -> Result<String, HuddleError>;

    /// Lists one page of channels, starting at `cursor`.
    async fn list_channels(&self, cursor: Option<&str>) -> Result<ChannelPage, HuddleError>;

    /// Fetches up to `limit` messages newer than `since`, newest first.
    async fn fetch_messages(
        &self,
        channel_id: &str,
        since: Option<&str>,
        limit: u32,
    ) -> Result<Vec<PolledMessage>, HuddleError>;

    /// Resolves a sender id to a display name.
    async fn resolve_display_name(&self, user_id: &str) -> Result<String, HuddleError>;
}

/// Capability to post text back into a chat on one platform.
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// The platform this sink delivers to.
    fn platform(&self) -> Platform;

    /// Sends `text` to `chat_id`.
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), HuddleError>;
}

/// Receives messages delivered by a push source.
///
/// Implementations never fail: every error is handled and logged inside.
#[async_trait]
pub trait PushHandler: Send + Sync {
    async fn handle(&self, message: PushMessage);
}
