// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append and windowed reads over `group_messages`.

use std::str::FromStr;

use huddle_core::types::{ChannelHistoryEntry, GlobalHistoryEntry, NewChatMessage};
use huddle_core::{AppendOutcome, HuddleError, Platform};
use rusqlite::params;
use rusqlite::types::Type;

use crate::database::Database;

/// Append a message. A repeated `dedup_key` is a silent no-op.
///
/// Rows without a key never conflict, since SQLite treats NULLs as distinct
/// under a UNIQUE constraint.
pub async fn append_message(
    db: &Database,
    msg: &NewChatMessage,
) -> Result<AppendOutcome, HuddleError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "INSERT INTO group_messages (platform, chat_id, user_id, user_name, message_text, dedup_key)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT (dedup_key) DO NOTHING",
                params![
                    msg.platform.to_string(),
                    msg.chat_id,
                    msg.user_id,
                    msg.user_name,
                    msg.message_text,
                    msg.dedup_key,
                ],
            )?;
            Ok(if changed == 0 {
                AppendOutcome::Duplicate
            } else {
                AppendOutcome::Inserted
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Newest-first window of one channel's history.
pub async fn channel_history(
    db: &Database,
    platform: Platform,
    chat_id: &str,
    limit: u32,
) -> Result<Vec<ChannelHistoryEntry>, HuddleError> {
    let chat_id = chat_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT user_name, message_text FROM group_messages
                 WHERE platform = ?1 AND chat_id = ?2
                 ORDER BY timestamp DESC, id DESC LIMIT ?3",
            )?;
            let rows = stmt.query_map(params![platform.to_string(), chat_id, limit], |row| {
                Ok(ChannelHistoryEntry {
                    user_name: row.get(0)?,
                    message_text: row.get(1)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Newest-first window across every platform and channel.
pub async fn global_history(
    db: &Database,
    limit: u32,
) -> Result<Vec<GlobalHistoryEntry>, HuddleError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT platform, chat_id, user_name, message_text FROM group_messages
                 ORDER BY timestamp DESC, id DESC LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                let platform: String = row.get(0)?;
                let platform = Platform::from_str(&platform).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
                })?;
                Ok(GlobalHistoryEntry {
                    platform,
                    chat_id: row.get(1)?,
                    user_name: row.get(2)?,
                    message_text: row.get(3)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}
