// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! History store trait for the append-only chat log.

use async_trait::async_trait;

use crate::error::HuddleError;
use crate::types::{
    AppendOutcome, ChannelHistoryEntry, GlobalHistoryEntry, NewChatMessage, Platform,
};

/// Raw access to the append-only chat log.
///
/// Implementations surface every storage failure as an error. The
/// swallow-and-log policy lives one layer up, in the agent.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Appends a message. A repeated `dedup_key` yields
    /// [`AppendOutcome::Duplicate`] rather than an error.
    async fn append(&self, message: &NewChatMessage) -> Result<AppendOutcome, HuddleError>;

    /// Returns up to `limit` messages of one channel, newest first.
    async fn history_for_channel(
        &self,
        platform: Platform,
        chat_id: &str,
        limit: u32,
    ) -> Result<Vec<ChannelHistoryEntry>, HuddleError>;

    /// Returns up to `limit` messages across all platforms and channels, newest first.
    async fn history_all(&self, limit: u32) -> Result<Vec<GlobalHistoryEntry>, HuddleError>;
}
