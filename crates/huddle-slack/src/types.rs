// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack Web API response types.
//!
//! Every Web API method answers with `{"ok": bool, "error": "..."}` plus
//! method-specific fields, so each payload is flattened into [`SlackEnvelope`].

use huddle_core::types::{ChannelDescriptor, PolledMessage};
use serde::Deserialize;

/// Common wrapper around every Web API response.
#[derive(Debug, Deserialize)]
pub struct SlackEnvelope<T> {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

/// `auth.test`
#[derive(Debug, Default, Deserialize)]
pub struct AuthTest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
}

/// `conversations.list`
#[derive(Debug, Default, Deserialize)]
pub struct ConversationsList {
    #[serde(default)]
    pub channels: Vec<SlackChannel>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

impl ConversationsList {
    /// Cursor for the next page; Slack signals the end with an empty string.
    pub fn next_cursor(&self) -> Option<String> {
        self.response_metadata
            .as_ref()
            .map(|m| m.next_cursor.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlackChannel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_member: bool,
}

impl From<SlackChannel> for ChannelDescriptor {
    fn from(channel: SlackChannel) -> Self {
        ChannelDescriptor {
            id: channel.id,
            name: channel.name,
            is_member: channel.is_member,
        }
    }
}

/// `conversations.history`
#[derive(Debug, Default, Deserialize)]
pub struct ConversationsHistory {
    #[serde(default)]
    pub messages: Vec<SlackMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlackMessage {
    #[serde(default)]
    pub ts: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
}

impl From<SlackMessage> for PolledMessage {
    fn from(msg: SlackMessage) -> Self {
        let is_bot = msg.bot_id.is_some() || msg.subtype.as_deref() == Some("bot_message");
        PolledMessage {
            token: msg.ts,
            sender_id: msg.user,
            text: msg.text,
            is_bot,
        }
    }
}

/// `users.info`
#[derive(Debug, Default, Deserialize)]
pub struct UsersInfo {
    #[serde(default)]
    pub user: Option<SlackUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlackUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub profile: Option<SlackProfile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlackProfile {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
}

impl SlackUser {
    /// Real name, then profile display name, then profile real name, then handle.
    pub fn best_name(&self) -> Option<String> {
        let profile = self.profile.as_ref();
        [
            self.real_name.as_deref(),
            profile.and_then(|p| p.display_name.as_deref()),
            profile.and_then(|p| p.real_name.as_deref()),
            self.name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(str::to_string)
    }
}

/// Methods whose payload we do not inspect beyond `ok`.
#[derive(Debug, Default, Deserialize)]
pub struct Acknowledged {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_parses_error_response() {
        let body = r#"{"ok": false, "error": "channel_not_found"}"#;
        let parsed: SlackEnvelope<ConversationsHistory> = serde_json::from_str(body).unwrap();
        assert!(!parsed.ok);
        assert_eq!(parsed.error.as_deref(), Some("channel_not_found"));
        assert!(parsed.data.messages.is_empty());
    }

    #[test]
    fn empty_next_cursor_means_last_page() {
        let body = r#"{"ok": true, "channels": [], "response_metadata": {"next_cursor": ""}}"#;
        let parsed: SlackEnvelope<ConversationsList> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.next_cursor(), None);

        let body = r#"{"ok": true, "channels": [], "response_metadata": {"next_cursor": "dGVhbTpD"}}"#;
        let parsed: SlackEnvelope<ConversationsList> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.next_cursor().as_deref(), Some("dGVhbTpD"));
    }

    #[test]
    fn bot_messages_are_flagged() {
        let body = r#"{"ts": "1.0", "bot_id": "B1", "subtype": "bot_message", "text": "beep"}"#;
        let msg: SlackMessage = serde_json::from_str(body).unwrap();
        let polled = PolledMessage::from(msg);
        assert!(polled.is_bot);
        assert!(polled.sender_id.is_none());

        let body = r#"{"ts": "2.0", "user": "U1", "text": "hello"}"#;
        let polled = PolledMessage::from(serde_json::from_str::<SlackMessage>(body).unwrap());
        assert!(!polled.is_bot);
        assert_eq!(polled.sender_id.as_deref(), Some("U1"));
    }

    #[test]
    fn best_name_falls_back_through_profile() {
        let user: SlackUser = serde_json::from_str(
            r#"{"name": "jdoe", "real_name": "", "profile": {"display_name": "JD"}}"#,
        )
        .unwrap();
        assert_eq!(user.best_name().as_deref(), Some("JD"));

        let user: SlackUser = serde_json::from_str(r#"{"name": "jdoe"}"#).unwrap();
        assert_eq!(user.best_name().as_deref(), Some("jdoe"));

        let user: SlackUser = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(user.best_name(), None);
    }
}
