// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the semantic constraints serde attributes cannot express:
//! non-empty paths and URLs, positive intervals, and bounded page sizes.

use crate::diagnostic::ConfigError;
use crate::model::HuddleConfig;

/// Slack caps `limit` on `conversations.list` and `conversations.history`.
const SLACK_MAX_PAGE: u32 = 1000;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &HuddleConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.slack.api_base.trim().is_empty() {
        fail("slack.api_base must not be empty".to_string());
    }
    if config.slack.poll_interval_secs == 0 {
        fail("slack.poll_interval_secs must be greater than 0".to_string());
    }
    if config.slack.channel_refresh_secs == 0 {
        fail("slack.channel_refresh_secs must be greater than 0".to_string());
    }
    if !(1..=SLACK_MAX_PAGE).contains(&config.slack.history_page_size) {
        fail(format!(
            "slack.history_page_size must be between 1 and {SLACK_MAX_PAGE}, got {}",
            config.slack.history_page_size
        ));
    }
    if !(1..=SLACK_MAX_PAGE).contains(&config.slack.channel_page_limit) {
        fail(format!(
            "slack.channel_page_limit must be between 1 and {SLACK_MAX_PAGE}, got {}",
            config.slack.channel_page_limit
        ));
    }
    if matches!(&config.slack.mention, Some(m) if m.trim().is_empty()) {
        fail("slack.mention must not be empty when set".to_string());
    }
    if matches!(&config.telegram.mention, Some(m) if m.trim().is_empty()) {
        fail("telegram.mention must not be empty when set".to_string());
    }

    if config.openai.base_url.trim().is_empty() {
        fail("openai.base_url must not be empty".to_string());
    }
    if config.openai.model.trim().is_empty() {
        fail("openai.model must not be empty".to_string());
    }
    if config.openai.max_tokens == 0 {
        fail("openai.max_tokens must be greater than 0".to_string());
    }
    if !(0.0..=2.0).contains(&config.openai.temperature) {
        fail(format!(
            "openai.temperature must be between 0.0 and 2.0, got {}",
            config.openai.temperature
        ));
    }

    if config.history.channel_limit == 0 {
        fail("history.channel_limit must be greater than 0".to_string());
    }
    if config.history.global_limit == 0 {
        fail("history.global_limit must be greater than 0".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
