// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message filtering and conversion.
//!
//! Only text messages from group chats with a known sender reach the agent;
//! everything else is dropped here.

use huddle_core::types::PushMessage;
use teloxide::types::Message;

/// Checks whether the message was posted in a group or supergroup.
///
/// Private chats and channels return `false`.
pub fn is_group(msg: &Message) -> bool {
    msg.chat.is_group() || msg.chat.is_supergroup()
}

/// Converts a Telegram message into a [`PushMessage`].
///
/// Returns `None` for non-group chats, messages without a sender, and
/// messages without text (photos, stickers, service messages).
pub fn to_push_message(msg: &Message) -> Option<PushMessage> {
    if !is_group(msg) {
        return None;
    }
    let text = msg.text()?;
    let user = msg.from.as_ref()?;

    Some(PushMessage {
        chat_id: msg.chat.id.0.to_string(),
        sender_id: user.id.0.to_string(),
        sender_name: user.first_name.clone(),
        message_text: text.to_string(),
    })
}
