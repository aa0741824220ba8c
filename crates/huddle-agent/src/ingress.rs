// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Push ingress: stores each delivered message and answers mentions.

use std::sync::Arc;

use async_trait::async_trait;
use huddle_core::types::{NewChatMessage, PushMessage};
use huddle_core::{PushHandler, ReplySink};
use tracing::{debug, info};

use crate::composer::AnswerComposer;
use crate::history::HistoryLog;

/// Handles messages from a source that delivers each one exactly once.
pub struct PushIngress {
    history: HistoryLog,
    composer: Arc<AnswerComposer>,
    sink: Arc<dyn ReplySink>,
    mention: String,
}

impl PushIngress {
    pub fn new(
        history: HistoryLog,
        composer: Arc<AnswerComposer>,
        sink: Arc<dyn ReplySink>,
        mention: String,
    ) -> Self {
        Self {
            history,
            composer,
            sink,
            mention,
        }
    }
}

#[async_trait]
impl PushHandler for PushIngress {
    async fn handle(&self, message: PushMessage) {
        let platform = self.sink.platform();
        if message.message_text.trim().is_empty() {
            debug!(%platform, chat_id = message.chat_id.as_str(), "skipping empty message");
            return;
        }

        self.history
            .append(&NewChatMessage {
                platform,
                chat_id: message.chat_id.clone(),
                user_id: message.sender_id.clone(),
                user_name: message.sender_name.clone(),
                message_text: message.message_text.clone(),
                dedup_key: None,
            })
            .await;

        if message.message_text.contains(&self.mention) {
            info!(%platform, chat_id = message.chat_id.as_str(), "mention detected, composing answer");
            self.composer
                .answer(self.sink.as_ref(), &message.chat_id, &message.message_text)
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_config::model::{HistoryConfig, OpenAiConfig};
    use huddle_core::Platform;
    use huddle_test_utils::{MemoryHistoryStore, MockProvider, RecordingSink};

    fn ingress(
        store: Arc<MemoryHistoryStore>,
        provider: Arc<MockProvider>,
        sink: Arc<RecordingSink>,
    ) -> PushIngress {
        let history = HistoryLog::new(store);
        let composer = Arc::new(AnswerComposer::new(
            history.clone(),
            provider,
            "Persona.".into(),
            &HistoryConfig::default(),
            &OpenAiConfig::default(),
        ));
        PushIngress::new(history, composer, sink, "@deskbot".into())
    }

    fn push(text: &str) -> PushMessage {
        PushMessage {
            chat_id: "-1001".into(),
            sender_id: "42".into(),
            sender_name: "Dana".into(),
            message_text: text.into(),
        }
    }

    #[tokio::test]
    async fn stores_without_dedup_key_and_skips_unaddressed() {
        let store = Arc::new(MemoryHistoryStore::new());
        let provider = Arc::new(MockProvider::new());
        let sink = Arc::new(RecordingSink::new(Platform::Telegram));
        let ingress = ingress(store.clone(), provider.clone(), sink.clone());

        ingress.handle(push("buy 3 ETH at 2500")).await;
        ingress.handle(push("buy 3 ETH at 2500")).await;

        let rows = store.rows().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].platform, Platform::Telegram);
        assert_eq!(rows[0].user_name, "Dana");
        assert!(rows[0].dedup_key.is_none());
        assert_eq!(provider.call_count().await, 0);
        assert!(sink.sent().await.is_empty());
    }

    #[tokio::test]
    async fn mention_is_answered_in_same_chat() {
        let store = Arc::new(MemoryHistoryStore::new());
        let provider = Arc::new(MockProvider::with_responses(vec!["Confirmed.".into()]));
        let sink = Arc::new(RecordingSink::new(Platform::Telegram));
        let ingress = ingress(store.clone(), provider.clone(), sink.clone());

        ingress.handle(push("@deskbot is the order confirmed?")).await;

        let sent = sink.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].chat_id, "-1001");
        assert_eq!(sent[0].text, "Confirmed.");
        // The question itself is part of the channel window sent to the model.
        let requests = provider.requests().await;
        assert!(requests[0].messages[1].content.contains("Dana: @deskbot is the order confirmed?"));
    }

    #[tokio::test]
    async fn storage_failure_still_answers() {
        let provider = Arc::new(MockProvider::new());
        let sink = Arc::new(RecordingSink::new(Platform::Telegram));
        let ingress = ingress(Arc::new(MemoryHistoryStore::failing()), provider, sink.clone());

        ingress.handle(push("@deskbot hello")).await;

        assert_eq!(sink.sent_count().await, 1);
    }
}
