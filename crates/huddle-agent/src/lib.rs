// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message pipeline for huddle.
//!
//! - [`ChannelPoller`] polls member channels, deduplicates and stores messages
//! - [`PushIngress`] stores messages delivered by a push source
//! - [`AnswerComposer`] turns a mention into a completion and relays the reply
//! - [`HistoryLog`] applies the log-and-continue policy to storage failures

pub mod composer;
pub mod directory;
pub mod history;
pub mod ingress;
pub mod poller;
pub mod prompt;
pub mod shutdown;
pub mod watermark;

pub use composer::{AnswerComposer, GENERIC_APOLOGY, SERVICE_APOLOGY};
pub use directory::ChannelDirectory;
pub use history::HistoryLog;
pub use ingress::PushIngress;
pub use poller::{ChannelPoller, PollerSettings, UNKNOWN_USER};
pub use prompt::load_system_prompt;
pub use watermark::SeqToken;
