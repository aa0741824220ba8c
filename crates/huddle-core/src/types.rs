// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the huddle pipeline.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The chat platform a message originated from.
///
/// Stored as its lowercase name in the `platform` column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Polled through the Slack Web API.
    Slack,
    /// Pushed through the Telegram Bot API dispatcher.
    Telegram,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Provider,
    Storage,
}

// --- History types ---

/// A chat message about to be appended to the history log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChatMessage {
    pub platform: Platform,
    pub chat_id: String,
    pub user_id: String,
    /// Best-effort display name.
    pub user_name: String,
    pub message_text: String,
    /// Source-native token that makes redelivery of the same event a no-op.
    /// Only the polling source sets it.
    pub dedup_key: Option<String>,
}

/// Result of an append against the history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// A new row was written.
    Inserted,
    /// A row with the same dedup key already existed; nothing was written.
    Duplicate,
    /// The storage layer failed; the message is missing from history.
    Failed,
}

/// One row of a single channel's history window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHistoryEntry {
    pub user_name: String,
    pub message_text: String,
}

/// One row of the cross-platform history window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalHistoryEntry {
    pub platform: Platform,
    pub chat_id: String,
    pub user_name: String,
    pub message_text: String,
}

// --- Pollable chat types ---

/// A channel the polling source can see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDescriptor {
    pub id: String,
    pub name: String,
    /// Whether the bot is currently a member of the channel.
    pub is_member: bool,
}

/// One page of the channel listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelPage {
    pub channels: Vec<ChannelDescriptor>,
    /// Cursor for the next page; `None` when the listing is exhausted.
    pub next_cursor: Option<String>,
}

/// A message as delivered by the polling source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolledMessage {
    /// Source-native sequence token (Slack `ts`, a fractional epoch string).
    pub token: String,
    pub sender_id: Option<String>,
    pub text: Option<String>,
    /// Set when the source marks the message as posted by a bot integration.
    pub is_bot: bool,
}

// --- Push ingress types ---

/// A message delivered by the push source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    pub chat_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub message_text: String,
}

// --- Completion types ---

/// Role of a message sent to the completion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CompletionRole {
    System,
    User,
    Assistant,
}

/// A single message in a completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionMessage {
    pub role: CompletionRole,
    pub content: String,
}

impl CompletionMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: CompletionRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: CompletionRole::User,
            content: content.into(),
        }
    }
}

/// A request to the completion endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Ordered conversation, system instruction first.
    pub messages: Vec<CompletionMessage>,
    /// Response size cap.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}
