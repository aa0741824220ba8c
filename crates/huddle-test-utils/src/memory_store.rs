// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory history store for agent tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use huddle_core::types::{ChannelHistoryEntry, GlobalHistoryEntry, NewChatMessage};
use huddle_core::{AppendOutcome, HistoryStore, HuddleError, Platform};

/// Keeps rows in insertion order and honors `dedup_key` like the SQLite store.
///
/// Reads and writes can be switched to fail independently.
#[derive(Default)]
pub struct MemoryHistoryStore {
    rows: Mutex<Vec<NewChatMessage>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every read and write fails.
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_fail_reads(true);
        store.set_fail_writes(true);
        store
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Stored rows, oldest first.
    pub async fn rows(&self) -> Vec<NewChatMessage> {
        self.rows.lock().await.clone()
    }

    /// Stored dedup keys, oldest first.
    pub async fn dedup_keys(&self) -> Vec<String> {
        self.rows
            .lock()
            .await
            .iter()
            .filter_map(|r| r.dedup_key.clone())
            .collect()
    }

    fn read_guard(&self) -> Result<(), HuddleError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(HuddleError::Storage {
                source: "memory store set to fail reads".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, message: &NewChatMessage) -> Result<AppendOutcome, HuddleError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(HuddleError::Storage {
                source: "memory store set to fail writes".into(),
            });
        }
        let mut rows = self.rows.lock().await;
        if let Some(key) = &message.dedup_key
            && rows.iter().any(|r| r.dedup_key.as_ref() == Some(key))
        {
            return Ok(AppendOutcome::Duplicate);
        }
        rows.push(message.clone());
        Ok(AppendOutcome::Inserted)
    }

    async fn history_for_channel(
        &self,
        platform: Platform,
        chat_id: &str,
        limit: u32,
    ) -> Result<Vec<ChannelHistoryEntry>, HuddleError> {
        self.read_guard()?;
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .rev()
            .filter(|r| r.platform == platform && r.chat_id == chat_id)
            .take(limit as usize)
            .map(|r| ChannelHistoryEntry {
                user_name: r.user_name.clone(),
                message_text: r.message_text.clone(),
            })
            .collect())
    }

    async fn history_all(&self, limit: u32) -> Result<Vec<GlobalHistoryEntry>, HuddleError> {
        self.read_guard()?;
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .rev()
            .take(limit as usize)
            .map(|r| GlobalHistoryEntry {
                platform: r.platform,
                chat_id: r.chat_id.clone(),
                user_name: r.user_name.clone(),
                message_text: r.message_text.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(key: Option<&str>) -> NewChatMessage {
        NewChatMessage {
            platform: Platform::Slack,
            chat_id: "C1".into(),
            user_id: "U1".into(),
            user_name: "Alice".into(),
            message_text: "hi".into(),
            dedup_key: key.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn dedup_key_is_honored() {
        let store = MemoryHistoryStore::new();
        assert_eq!(store.append(&msg(Some("1.0"))).await.unwrap(), AppendOutcome::Inserted);
        assert_eq!(store.append(&msg(Some("1.0"))).await.unwrap(), AppendOutcome::Duplicate);
        assert_eq!(store.append(&msg(None)).await.unwrap(), AppendOutcome::Inserted);
        assert_eq!(store.append(&msg(None)).await.unwrap(), AppendOutcome::Inserted);
        assert_eq!(store.rows().await.len(), 3);
    }

    #[tokio::test]
    async fn failing_store_errors_everywhere() {
        let store = MemoryHistoryStore::failing();
        assert!(store.append(&msg(None)).await.is_err());
        assert!(store.history_all(10).await.is_err());
        assert!(store.history_for_channel(Platform::Slack, "C1", 10).await.is_err());
    }
}
