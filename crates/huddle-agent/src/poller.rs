// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Poll loop and deduplication engine for the polling chat source.
//!
//! Each tick refreshes the channel directory when due, then walks every
//! member channel sequentially: fetch messages newer than the channel's
//! watermark, process them oldest first, and advance the watermark.
//!
//! Redelivery is handled twice over. The in-memory watermark skips anything
//! at or below the last processed token, and the store's unique `dedup_key`
//! absorbs what slips through after a restart. A message whose append comes
//! back as a duplicate is never answered again.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use huddle_config::model::SlackConfig;
use huddle_core::types::{ChannelDescriptor, NewChatMessage, PolledMessage};
use huddle_core::{AppendOutcome, PollableChatApi, ReplySink};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::composer::AnswerComposer;
use crate::directory::ChannelDirectory;
use crate::history::HistoryLog;
use crate::watermark::SeqToken;

/// Display name stored when the sender cannot be resolved.
pub const UNKNOWN_USER: &str = "Unknown User";

/// Timing and filtering knobs for [`ChannelPoller`].
#[derive(Debug, Clone)]
pub struct PollerSettings {
    pub poll_interval: Duration,
    pub refresh_interval: Duration,
    pub page_size: u32,
    /// Mention text; `None` means `@<bot user id>`.
    pub mention: Option<String>,
    pub ignore_bot_messages: bool,
}

impl PollerSettings {
    pub fn from_config(config: &SlackConfig) -> Self {
        Self {
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            refresh_interval: Duration::from_secs(config.channel_refresh_secs),
            page_size: config.history_page_size,
            mention: config.mention.clone(),
            ignore_bot_messages: config.ignore_bot_messages,
        }
    }
}

/// Sequential poller over every member channel.
///
/// Owns its watermarks and directory cache; nothing else touches them.
pub struct ChannelPoller {
    api: Arc<dyn PollableChatApi>,
    sink: Arc<dyn ReplySink>,
    history: HistoryLog,
    composer: Arc<AnswerComposer>,
    directory: ChannelDirectory,
    settings: PollerSettings,
    channels: Vec<ChannelDescriptor>,
    last_refresh: Option<Instant>,
    watermarks: HashMap<String, SeqToken>,
    bot_user_id: Option<String>,
}

impl ChannelPoller {
    pub fn new(
        api: Arc<dyn PollableChatApi>,
        sink: Arc<dyn ReplySink>,
        history: HistoryLog,
        composer: Arc<AnswerComposer>,
        settings: PollerSettings,
    ) -> Self {
        Self {
            directory: ChannelDirectory::new(api.clone()),
            api,
            sink,
            history,
            composer,
            settings,
            channels: Vec::new(),
            last_refresh: None,
            watermarks: HashMap::new(),
            bot_user_id: None,
        }
    }

    /// Runs ticks on the poll interval until `cancel` fires.
    ///
    /// A tick in progress is allowed to finish.
    pub async fn run(mut self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.settings.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            poll_interval_secs = self.settings.poll_interval.as_secs(),
            refresh_interval_secs = self.settings.refresh_interval.as_secs(),
            "poll loop started"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("poll loop stopping");
                    break;
                }
                _ = interval.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    /// One full pass: directory refresh, then every channel in order.
    pub async fn tick(&mut self) {
        self.refresh_directory().await;

        let Some(bot_id) = self.resolve_bot_id().await else {
            return;
        };
        let mention = self
            .settings
            .mention
            .clone()
            .unwrap_or_else(|| format!("@{bot_id}"));

        let channel_ids: Vec<String> = self.channels.iter().map(|c| c.id.clone()).collect();
        for channel_id in channel_ids {
            self.poll_channel(&channel_id, &bot_id, &mention).await;
        }
    }

    /// Current watermark of a channel, as delivered by the API.
    pub fn watermark(&self, channel_id: &str) -> Option<&str> {
        self.watermarks.get(channel_id).map(SeqToken::as_str)
    }

    /// Channels currently in the directory cache.
    pub fn channels(&self) -> &[ChannelDescriptor] {
        &self.channels
    }

    /// Refreshes once `refresh_interval` has passed since the last refresh,
    /// and retries right away while the cached list is empty.
    async fn refresh_directory(&mut self) {
        let due = self
            .last_refresh
            .is_none_or(|at| at.elapsed() >= self.settings.refresh_interval);
        if due {
            self.refresh().await;
        }
        if self.channels.is_empty() {
            info!("no member channels found, retrying directory refresh");
            self.refresh().await;
        }
    }

    async fn refresh(&mut self) {
        self.channels = self.directory.list_member_channels().await;
        self.last_refresh = Some(Instant::now());
        info!(channels = self.channels.len(), "channel directory updated");
    }

    async fn resolve_bot_id(&mut self) -> Option<String> {
        if let Some(id) = &self.bot_user_id {
            return Some(id.clone());
        }
        match self.api.bot_user_id().await {
            Ok(id) => {
                info!(bot_user_id = id.as_str(), "resolved bot identity");
                self.bot_user_id = Some(id.clone());
                Some(id)
            }
            Err(e) => {
                warn!(error = %e, "could not resolve bot identity, skipping tick");
                None
            }
        }
    }

    async fn poll_channel(&mut self, channel_id: &str, bot_id: &str, mention: &str) {
        let since = self.watermarks.get(channel_id).map(|w| w.as_str().to_string());
        let batch = match self
            .api
            .fetch_messages(channel_id, since.as_deref(), self.settings.page_size)
            .await
        {
            Ok(batch) => batch,
            Err(e) => {
                warn!(channel_id, error = %e, "failed to fetch channel history");
                return;
            }
        };

        // Delivered newest first.
        for message in batch.into_iter().rev() {
            let Some(token) = SeqToken::parse(&message.token) else {
                warn!(channel_id, ts = message.token.as_str(), "skipping message with malformed ts");
                continue;
            };
            if self
                .watermarks
                .get(channel_id)
                .is_some_and(|seen| token <= *seen)
            {
                debug!(channel_id, ts = token.as_str(), "already processed");
                continue;
            }

            self.process(channel_id, &message, bot_id, mention).await;
            self.watermarks.insert(channel_id.to_string(), token);
        }
    }

    /// Stores one message and answers it when it carries the mention.
    ///
    /// A mention whose append comes back as a duplicate was already seen
    /// before a restart and is not answered again.
    async fn process(&self, channel_id: &str, message: &PolledMessage, bot_id: &str, mention: &str) {
        let ts = message.token.as_str();
        let (Some(sender), Some(text)) = (message.sender_id.as_deref(), message.text.as_deref())
        else {
            debug!(channel_id, ts, "skipping message without sender or text");
            return;
        };
        if text.trim().is_empty() {
            debug!(channel_id, ts, "skipping empty message");
            return;
        }
        if sender == bot_id {
            debug!(channel_id, ts, "skipping own message");
            return;
        }
        if message.is_bot && self.settings.ignore_bot_messages {
            debug!(channel_id, ts, "skipping bot message");
            return;
        }

        let user_name = match self.api.resolve_display_name(sender).await {
            Ok(name) if !name.trim().is_empty() => name,
            Ok(_) => UNKNOWN_USER.to_string(),
            Err(e) => {
                warn!(user_id = sender, error = %e, "failed to resolve display name");
                UNKNOWN_USER.to_string()
            }
        };

        let outcome = self
            .history
            .append(&NewChatMessage {
                platform: self.sink.platform(),
                chat_id: channel_id.to_string(),
                user_id: sender.to_string(),
                user_name,
                message_text: text.to_string(),
                dedup_key: Some(ts.to_string()),
            })
            .await;

        if !text.contains(mention) {
            return;
        }
        if outcome == AppendOutcome::Duplicate {
            debug!(channel_id, ts, "mention already answered");
            return;
        }

        info!(channel_id, ts, "mention detected, composing answer");
        self.composer.answer(self.sink.as_ref(), channel_id, text).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_config::model::{HistoryConfig, OpenAiConfig};
    use huddle_core::Platform;
    use huddle_test_utils::mock_chat::{member_channel, text_message};
    use huddle_test_utils::{MemoryHistoryStore, MockChatApi, MockProvider, RecordingSink};

    struct Harness {
        api: Arc<MockChatApi>,
        store: Arc<MemoryHistoryStore>,
        provider: Arc<MockProvider>,
        sink: Arc<RecordingSink>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                api: Arc::new(MockChatApi::new("UBOT")),
                store: Arc::new(MemoryHistoryStore::new()),
                provider: Arc::new(MockProvider::new()),
                sink: Arc::new(RecordingSink::new(Platform::Slack)),
            }
        }

        fn poller(&self, settings: PollerSettings) -> ChannelPoller {
            let history = HistoryLog::new(self.store.clone());
            let composer = Arc::new(AnswerComposer::new(
                history.clone(),
                self.provider.clone(),
                "Persona.".into(),
                &HistoryConfig::default(),
                &OpenAiConfig::default(),
            ));
            ChannelPoller::new(self.api.clone(), self.sink.clone(), history, composer, settings)
        }
    }

    fn settings() -> PollerSettings {
        PollerSettings::from_config(&SlackConfig::default())
    }

    #[test]
    fn settings_follow_config() {
        let s = settings();
        assert_eq!(s.poll_interval, Duration::from_secs(5));
        assert_eq!(s.refresh_interval, Duration::from_secs(3600));
        assert_eq!(s.page_size, 10);
        assert!(s.mention.is_none());
    }

    #[tokio::test]
    async fn first_fetch_has_no_since_then_uses_watermark() {
        let h = Harness::new();
        h.api.push_page(vec![member_channel("C1")], None).await;
        h.api
            .push_batch("C1", vec![text_message("2.0", "U1", "b"), text_message("1.0", "U1", "a")])
            .await;
        let mut poller = h.poller(settings());

        poller.tick().await;
        poller.tick().await;

        let calls = h.api.fetch_calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].since, None);
        assert_eq!(calls[0].limit, 10);
        assert_eq!(calls[1].since.as_deref(), Some("2.0"));
        assert_eq!(poller.watermark("C1"), Some("2.0"));
    }

    #[tokio::test]
    async fn stores_oldest_first_with_ts_as_dedup_key() {
        let h = Harness::new();
        h.api.push_page(vec![member_channel("C1")], None).await;
        h.api.set_name("U1", "Ana").await;
        h.api
            .push_batch("C1", vec![text_message("2.0", "U1", "second"), text_message("1.0", "U1", "first")])
            .await;
        let mut poller = h.poller(settings());

        poller.tick().await;

        let rows = h.store.rows().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].message_text, "first");
        assert_eq!(rows[0].dedup_key.as_deref(), Some("1.0"));
        assert_eq!(rows[0].user_name, "Ana");
        assert_eq!(rows[0].platform, Platform::Slack);
        assert_eq!(rows[1].message_text, "second");
    }

    #[tokio::test]
    async fn unresolved_sender_gets_placeholder_name() {
        let h = Harness::new();
        h.api.push_page(vec![member_channel("C1")], None).await;
        h.api.push_batch("C1", vec![text_message("1.0", "U9", "hello")]).await;
        let mut poller = h.poller(settings());

        poller.tick().await;

        assert_eq!(h.store.rows().await[0].user_name, UNKNOWN_USER);
    }

    #[tokio::test]
    async fn skips_messages_without_sender_or_text() {
        let h = Harness::new();
        h.api.push_page(vec![member_channel("C1")], None).await;
        h.api
            .push_batch(
                "C1",
                vec![
                    PolledMessage {
                        token: "3.0".into(),
                        sender_id: Some("U1".into()),
                        text: Some("   ".into()),
                        is_bot: false,
                    },
                    PolledMessage {
                        token: "2.0".into(),
                        sender_id: Some("U1".into()),
                        text: None,
                        is_bot: false,
                    },
                    PolledMessage {
                        token: "1.0".into(),
                        sender_id: None,
                        text: Some("joined".into()),
                        is_bot: false,
                    },
                ],
            )
            .await;
        let mut poller = h.poller(settings());

        poller.tick().await;

        assert!(h.store.rows().await.is_empty());
        assert_eq!(poller.watermark("C1"), Some("3.0"));
    }

    #[tokio::test]
    async fn other_bots_skipped_only_when_configured() {
        for (ignore, expected) in [(false, 1), (true, 0)] {
            let h = Harness::new();
            h.api.push_page(vec![member_channel("C1")], None).await;
            h.api
                .push_batch(
                    "C1",
                    vec![PolledMessage {
                        token: "1.0".into(),
                        sender_id: Some("B2".into()),
                        text: Some("deploy done".into()),
                        is_bot: true,
                    }],
                )
                .await;
            let mut poller = h.poller(PollerSettings {
                ignore_bot_messages: ignore,
                ..settings()
            });

            poller.tick().await;

            assert_eq!(h.store.rows().await.len(), expected);
        }
    }

    #[tokio::test]
    async fn malformed_ts_is_skipped_without_moving_watermark() {
        let h = Harness::new();
        h.api.push_page(vec![member_channel("C1")], None).await;
        h.api
            .push_batch("C1", vec![text_message("garbage", "U1", "x"), text_message("1.0", "U1", "a")])
            .await;
        let mut poller = h.poller(settings());

        poller.tick().await;

        assert_eq!(h.store.rows().await.len(), 1);
        assert_eq!(poller.watermark("C1"), Some("1.0"));
    }

    #[tokio::test]
    async fn fetch_failure_keeps_watermark_and_continues() {
        let h = Harness::new();
        h.api
            .push_page(vec![member_channel("C1"), member_channel("C2")], None)
            .await;
        h.api.push_batch("C1", vec![text_message("1.0", "U1", "a")]).await;
        h.api.push_batch_error("C1", "ratelimited").await;
        h.api.push_batch("C2", vec![text_message("5.0", "U1", "c2")]).await;
        let mut poller = h.poller(settings());

        poller.tick().await;
        poller.tick().await;

        assert_eq!(poller.watermark("C1"), Some("1.0"));
        assert_eq!(poller.watermark("C2"), Some("5.0"));
        let c1_calls: Vec<_> = h
            .api
            .fetch_calls()
            .await
            .into_iter()
            .filter(|c| c.channel_id == "C1")
            .collect();
        assert_eq!(c1_calls.len(), 2);
        assert_eq!(c1_calls[1].since.as_deref(), Some("1.0"));
    }

    #[tokio::test]
    async fn bot_identity_failure_skips_tick_then_recovers() {
        let h = Harness::new();
        h.api.fail_bot_user_id("invalid_auth").await;
        h.api.push_page(vec![member_channel("C1")], None).await;
        h.api.push_batch("C1", vec![text_message("1.0", "U1", "a")]).await;
        let mut poller = h.poller(settings());

        poller.tick().await;
        assert!(h.api.fetch_calls().await.is_empty());

        h.api.set_bot_user_id("UBOT").await;
        poller.tick().await;
        assert_eq!(h.store.rows().await.len(), 1);
    }

    #[tokio::test]
    async fn custom_mention_triggers_answer() {
        let h = Harness::new();
        h.api.push_page(vec![member_channel("C1")], None).await;
        h.api
            .push_batch(
                "C1",
                vec![text_message("2.0", "U1", "hey deskbot, status?"), text_message("1.0", "U1", "@UBOT hi")],
            )
            .await;
        let mut poller = h.poller(PollerSettings {
            mention: Some("deskbot".into()),
            ..settings()
        });

        poller.tick().await;

        assert_eq!(h.provider.call_count().await, 1);
        let sent = h.sink.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].chat_id, "C1");
    }

    #[tokio::test(start_paused = true)]
    async fn directory_refreshes_after_interval() {
        let h = Harness::new();
        h.api.push_page(vec![member_channel("C1")], None).await;
        let mut poller = h.poller(settings());

        poller.tick().await;
        assert_eq!(h.api.list_calls(), 1);

        tokio::time::advance(Duration::from_secs(100)).await;
        poller.tick().await;
        assert_eq!(h.api.list_calls(), 1);

        h.api
            .push_page(vec![member_channel("C1"), member_channel("C2")], None)
            .await;
        tokio::time::advance(Duration::from_secs(3600)).await;
        poller.tick().await;

        assert_eq!(h.api.list_calls(), 2);
        let ids: Vec<_> = poller.channels().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["C1", "C2"]);
        let c2_calls = h
            .api
            .fetch_calls()
            .await
            .into_iter()
            .filter(|c| c.channel_id == "C2")
            .count();
        assert_eq!(c2_calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_on_cancel() {
        let h = Harness::new();
        let poller = h.poller(PollerSettings {
            poll_interval: Duration::from_secs(1),
            ..settings()
        });
        let cancel = CancellationToken::new();
        let task = tokio::spawn(poller.run(cancel.clone()));

        tokio::time::sleep(Duration::from_millis(2500)).await;
        cancel.cancel();
        task.await.unwrap();

        // First tick refreshes twice, later ticks retry once while the directory is empty.
        assert!(h.api.list_calls() >= 3);
    }
}
