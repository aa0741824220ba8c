// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Every trait uses `#[async_trait]` so adapters can be held as
//! `Arc<dyn Trait>` and swapped for mocks in tests.

pub mod adapter;
pub mod chat;
pub mod completion;
pub mod storage;

pub use adapter::PluginAdapter;
pub use chat::{PollableChatApi, PushHandler, ReplySink};
pub use completion::CompletionProvider;
pub use storage::HistoryStore;
