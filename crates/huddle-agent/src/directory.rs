// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel directory refresh.

use std::sync::Arc;

use huddle_core::PollableChatApi;
use huddle_core::types::ChannelDescriptor;
use tracing::{debug, warn};

/// Enumerates the channels the bot is a member of.
#[derive(Clone)]
pub struct ChannelDirectory {
    api: Arc<dyn PollableChatApi>,
}

impl ChannelDirectory {
    pub fn new(api: Arc<dyn PollableChatApi>) -> Self {
        Self { api }
    }

    /// Walks every page and keeps member channels.
    ///
    /// A failing page ends the walk early and returns what was gathered so far.
    pub async fn list_member_channels(&self) -> Vec<ChannelDescriptor> {
        let mut members = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = match self.api.list_channels(cursor.as_deref()).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        error = %e,
                        pages,
                        gathered = members.len(),
                        "channel listing failed, keeping partial result"
                    );
                    break;
                }
            };
            pages += 1;
            members.extend(page.channels.into_iter().filter(|c| c.is_member));

            match page.next_cursor {
                Some(next) if !next.is_empty() && cursor.as_deref() != Some(next.as_str()) => {
                    cursor = Some(next);
                }
                _ => break,
            }
        }

        debug!(pages, channels = members.len(), "channel directory refreshed");
        members
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_test_utils::MockChatApi;
    use huddle_test_utils::mock_chat::member_channel;

    fn outsider(id: &str) -> ChannelDescriptor {
        ChannelDescriptor {
            id: id.into(),
            name: id.into(),
            is_member: false,
        }
    }

    #[tokio::test]
    async fn follows_cursor_and_filters_members() {
        let api = Arc::new(MockChatApi::new("UBOT"));
        api.push_page(vec![member_channel("C1"), outsider("C2")], Some("p2")).await;
        api.push_page(vec![member_channel("C3")], None).await;

        let channels = ChannelDirectory::new(api.clone()).list_member_channels().await;

        let ids: Vec<_> = channels.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["C1", "C3"]);
        assert_eq!(api.list_calls(), 2);
    }

    #[tokio::test]
    async fn failing_page_returns_partial_result() {
        let api = Arc::new(MockChatApi::new("UBOT"));
        api.push_page(vec![member_channel("C1")], Some("p2")).await;
        api.push_page_error("ratelimited").await;

        let channels = ChannelDirectory::new(api.clone()).list_member_channels().await;

        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].id, "C1");
    }

    #[tokio::test]
    async fn first_page_failure_yields_empty() {
        let api = Arc::new(MockChatApi::new("UBOT"));
        api.push_page_error("invalid_auth").await;
        assert!(ChannelDirectory::new(api).list_member_channels().await.is_empty());
    }

    #[tokio::test]
    async fn repeated_cursor_stops_walk() {
        let api = Arc::new(MockChatApi::new("UBOT"));
        api.push_page(vec![member_channel("C1")], Some("same")).await;
        api.push_page(vec![member_channel("C2")], Some("same")).await;
        api.push_page(vec![member_channel("C3")], None).await;

        let channels = ChannelDirectory::new(api.clone()).list_member_channels().await;

        assert_eq!(channels.len(), 2);
        assert_eq!(api.list_calls(), 2);
    }
}
