// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for huddle integration tests.
//!
//! Provides scripted mock adapters for fast, deterministic tests without
//! Slack, Telegram, OpenAI or a database.
//!
//! # Components
//!
//! - [`MockChatApi`] - Pollable chat API with scripted channel pages, message batches and names
//! - [`RecordingSink`] - Reply sink that captures every sent message
//! - [`MockProvider`] - Completion provider with queued responses and failures
//! - [`MemoryHistoryStore`] - In-memory history store with switchable failures

pub mod memory_store;
pub mod mock_chat;
pub mod mock_provider;
pub mod recording_sink;

pub use memory_store::MemoryHistoryStore;
pub use mock_chat::MockChatApi;
pub use mock_provider::MockProvider;
pub use recording_sink::RecordingSink;
