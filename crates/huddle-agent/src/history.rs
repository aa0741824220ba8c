// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Failure policy around the history store.
//!
//! The hot path never sees a storage error: writes degrade to
//! [`AppendOutcome::Failed`] and reads degrade to an empty window.

use std::sync::Arc;

use huddle_core::types::{ChannelHistoryEntry, GlobalHistoryEntry, NewChatMessage};
use huddle_core::{AppendOutcome, HistoryStore, Platform};
use tracing::{debug, error};

/// Shared, swallow-and-log handle to the history store.
#[derive(Clone)]
pub struct HistoryLog {
    store: Arc<dyn HistoryStore>,
}

impl HistoryLog {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// Appends a message. Storage errors are logged and reported as
    /// [`AppendOutcome::Failed`].
    pub async fn append(&self, message: &NewChatMessage) -> AppendOutcome {
        match self.store.append(message).await {
            Ok(AppendOutcome::Duplicate) => {
                debug!(
                    platform = %message.platform,
                    chat_id = message.chat_id.as_str(),
                    dedup_key = message.dedup_key.as_deref().unwrap_or_default(),
                    "message already stored"
                );
                AppendOutcome::Duplicate
            }
            Ok(outcome) => outcome,
            Err(e) => {
                error!(
                    platform = %message.platform,
                    chat_id = message.chat_id.as_str(),
                    error = %e,
                    "failed to store message"
                );
                AppendOutcome::Failed
            }
        }
    }

    /// Newest-first window of one channel; empty when the store fails.
    pub async fn channel(
        &self,
        platform: Platform,
        chat_id: &str,
        limit: u32,
    ) -> Vec<ChannelHistoryEntry> {
        self.store
            .history_for_channel(platform, chat_id, limit)
            .await
            .unwrap_or_else(|e| {
                error!(%platform, chat_id, error = %e, "failed to read channel history");
                Vec::new()
            })
    }

    /// Newest-first window across every platform and channel; empty when the store fails.
    pub async fn all(&self, limit: u32) -> Vec<GlobalHistoryEntry> {
        self.store.history_all(limit).await.unwrap_or_else(|e| {
            error!(error = %e, "failed to read global history");
            Vec::new()
        })
    }
}
