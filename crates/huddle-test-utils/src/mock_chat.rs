// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted pollable chat API.
//!
//! Channel pages and message batches are queued ahead of time and handed out
//! one per call. Every call is counted or recorded for assertions.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use huddle_core::types::{ChannelDescriptor, ChannelPage, PolledMessage};
use huddle_core::{HuddleError, PollableChatApi};

/// One recorded `fetch_messages` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub channel_id: String,
    pub since: Option<String>,
    pub limit: u32,
}

/// A pollable chat API driven entirely by scripts.
///
/// - `list_channels` pops the next queued page; an empty queue yields an empty page.
/// - `fetch_messages` pops the next queued batch for that channel; an empty queue
///   yields no messages. Batches are returned exactly as queued, so queue them
///   newest first as the real source delivers them.
/// - `resolve_display_name` looks up a fixed map and fails for unknown ids.
pub struct MockChatApi {
    bot_user_id: Mutex<Result<String, String>>,
    pages: Mutex<VecDeque<Result<ChannelPage, String>>>,
    batches: Mutex<HashMap<String, VecDeque<Result<Vec<PolledMessage>, String>>>>,
    names: Mutex<HashMap<String, String>>,
    list_calls: AtomicUsize,
    fetch_calls: Mutex<Vec<FetchCall>>,
}

impl MockChatApi {
    /// Creates an API whose bot identity is `bot_user_id`.
    pub fn new(bot_user_id: &str) -> Self {
        Self {
            bot_user_id: Mutex::new(Ok(bot_user_id.to_string())),
            pages: Mutex::new(VecDeque::new()),
            batches: Mutex::new(HashMap::new()),
            names: Mutex::new(HashMap::new()),
            list_calls: AtomicUsize::new(0),
            fetch_calls: Mutex::new(Vec::new()),
        }
    }

    /// Makes `bot_user_id` fail until [`MockChatApi::set_bot_user_id`] is called.
    pub async fn fail_bot_user_id(&self, error: &str) {
        *self.bot_user_id.lock().await = Err(error.to_string());
    }

    pub async fn set_bot_user_id(&self, id: &str) {
        *self.bot_user_id.lock().await = Ok(id.to_string());
    }

    /// Queue a channel page.
    pub async fn push_page(&self, channels: Vec<ChannelDescriptor>, next_cursor: Option<&str>) {
        self.pages.lock().await.push_back(Ok(ChannelPage {
            channels,
            next_cursor: next_cursor.map(str::to_string),
        }));
    }

    /// Queue a failing channel page.
    pub async fn push_page_error(&self, error: &str) {
        self.pages.lock().await.push_back(Err(error.to_string()));
    }

    /// Queue a message batch for `channel_id`, newest first.
    pub async fn push_batch(&self, channel_id: &str, messages: Vec<PolledMessage>) {
        self.batches
            .lock()
            .await
            .entry(channel_id.to_string())
            .or_default()
            .push_back(Ok(messages));
    }

    /// Queue a failing fetch for `channel_id`.
    pub async fn push_batch_error(&self, channel_id: &str, error: &str) {
        self.batches
            .lock()
            .await
            .entry(channel_id.to_string())
            .or_default()
            .push_back(Err(error.to_string()));
    }

    pub async fn set_name(&self, user_id: &str, name: &str) {
        self.names
            .lock()
            .await
            .insert(user_id.to_string(), name.to_string());
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub async fn fetch_calls(&self) -> Vec<FetchCall> {
        self.fetch_calls.lock().await.clone()
    }
}

/// A member channel descriptor.
pub fn member_channel(id: &str) -> ChannelDescriptor {
    ChannelDescriptor {
        id: id.to_string(),
        name: format!("chan-{id}"),
        is_member: true,
    }
}

/// A human message with text.
pub fn text_message(token: &str, sender: &str, text: &str) -> PolledMessage {
    PolledMessage {
        token: token.to_string(),
        sender_id: Some(sender.to_string()),
        text: Some(text.to_string()),
        is_bot: false,
    }
}

#[async_trait]
impl PollableChatApi for MockChatApi {
    async fn bot_user_id(&self) -> Result<String, HuddleError> {
        self.bot_user_id
            .lock()
            .await
            .clone()
            .map_err(HuddleError::channel)
    }

    async fn list_channels(&self, _cursor: Option<&str>) -> Result<ChannelPage, HuddleError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        match self.pages.lock().await.pop_front() {
            Some(Ok(page)) => Ok(page),
            Some(Err(e)) => Err(HuddleError::channel(e)),
            None => Ok(ChannelPage::default()),
        }
    }

    async fn fetch_messages(
        &self,
        channel_id: &str,
        since: Option<&str>,
        limit: u32,
    ) -> Result<Vec<PolledMessage>, HuddleError> {
        self.fetch_calls.lock().await.push(FetchCall {
            channel_id: channel_id.to_string(),
            since: since.map(str::to_string),
            limit,
        });
        let next = self
            .batches
            .lock()
            .await
            .get_mut(channel_id)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Ok(batch)) => Ok(batch),
            Some(Err(e)) => Err(HuddleError::channel(e)),
            None => Ok(Vec::new()),
        }
    }

    async fn resolve_display_name(&self, user_id: &str) -> Result<String, HuddleError> {
        self.names
            .lock()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(|| HuddleError::channel(format!("unknown user {user_id}")))
    }
}
