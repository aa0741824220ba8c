// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persona loading and prompt rendering.

use huddle_config::model::AgentConfig;
use huddle_core::Platform;
use huddle_core::types::{ChannelHistoryEntry, GlobalHistoryEntry};
use tracing::{info, warn};

/// Persona used when neither `system_prompt_file` nor `system_prompt` is set.
pub const DEFAULT_PERSONA: &str = "\
You are {name}, an assistant for a trading desk that confirms customer orders.

Every answer starts with a one-line headline using a trade emoji (for example \u{1F4C8} or \u{1F4C9}).
Then give an order summary with one item per line: trader, customer, asset, quantity, price, \
stop-loss and wallet. Write \"not mentioned\" for anything the conversation does not state.
Finish with a confirmation check: say whether the customer has explicitly confirmed the order, \
and flag it clearly as PENDING CUSTOMER CONFIRMATION when they have not.

Reply in plain text only. Chat clients show markdown symbols literally, so do not use asterisks, \
underscores, backticks or headings. Keep answers short and precise.";

/// Loads the persona following config priority: file > inline > default.
pub async fn load_system_prompt(config: &AgentConfig) -> String {
    if let Some(path) = &config.system_prompt_file {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                let trimmed = content.trim();
                if !trimmed.is_empty() {
                    info!(path = path.as_str(), "loaded system prompt from file");
                    return trimmed.to_string();
                }
                warn!(path = path.as_str(), "system prompt file is empty, falling back");
            }
            Err(e) => {
                warn!(
                    path = path.as_str(),
                    error = %e,
                    "failed to read system prompt file, falling back"
                );
            }
        }
    }

    if let Some(prompt) = &config.system_prompt
        && !prompt.trim().is_empty()
    {
        return prompt.clone();
    }

    DEFAULT_PERSONA.replace("{name}", &config.name)
}

/// Persona plus the cross-platform scope instruction.
pub fn build_system_prompt(persona: &str, platform: Platform) -> String {
    format!(
        "{persona}\n\nYou can see trader and customer conversations from several chat platforms. \
Learn from all of that history, but base your answer only on the current {platform} channel."
    )
}

/// Renders both newest-first transcripts and the question into the user turn.
pub fn build_user_prompt(
    platform: Platform,
    global: &[GlobalHistoryEntry],
    channel: &[ChannelHistoryEntry],
    question: &str,
) -> String {
    let global_lines = global
        .iter()
        .map(|e| format!("{} - {} - {}: {}", e.platform, e.chat_id, e.user_name, e.message_text))
        .collect::<Vec<_>>()
        .join("\n");
    let channel_lines = channel
        .iter()
        .map(|e| format!("{}: {}", e.user_name, e.message_text))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "All chat history, newest first (for learning):\n{global_lines}\n\n\
Current {platform} channel history, newest first (for answering):\n{channel_lines}\n\n\
Question:\n{question}"
    )
}
