// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply sink that records instead of sending.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use huddle_core::{HuddleError, Platform, ReplySink};

/// A message captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentReply {
    pub chat_id: String,
    pub text: String,
}

/// Captures every `send` for later assertions.
///
/// With [`RecordingSink::set_failing`] enabled, sends are still recorded but
/// report an error.
pub struct RecordingSink {
    platform: Platform,
    sent: Arc<Mutex<Vec<SentReply>>>,
    failing: AtomicBool,
}

impl RecordingSink {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            sent: Arc::new(Mutex::new(Vec::new())),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All replies sent so far, in order.
    pub async fn sent(&self) -> Vec<SentReply> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

#[async_trait]
impl ReplySink for RecordingSink {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn send(&self, chat_id: &str, text: &str) -> Result<(), HuddleError> {
        self.sent.lock().await.push(SentReply {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
        });
        if self.failing.load(Ordering::SeqCst) {
            return Err(HuddleError::channel("recording sink set to fail"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_sends_even_when_failing() {
        let sink = RecordingSink::new(Platform::Telegram);
        sink.send("1", "ok").await.unwrap();
        sink.set_failing(true);
        assert!(sink.send("2", "boom").await.is_err());
        assert_eq!(sink.sent_count().await, 2);
        assert_eq!(sink.platform(), Platform::Telegram);
    }
}
