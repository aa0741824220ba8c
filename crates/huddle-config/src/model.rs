// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level huddle configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HuddleConfig {
    /// Assistant identity and process behavior.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Slack polling source.
    #[serde(default)]
    pub slack: SlackConfig,

    /// Telegram push source.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// OpenAI completion endpoint.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// History windows used for prompt context.
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Assistant identity and process behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Inline persona instructions. Overridden by `system_prompt_file` if both set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a file containing the persona instructions.
    #[serde(default)]
    pub system_prompt_file: Option<String>,

    /// How long shutdown waits for the poll loop before closing storage.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            system_prompt: None,
            system_prompt_file: None,
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

fn default_agent_name() -> String {
    "huddle".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_shutdown_timeout_secs() -> u64 {
    5
}

/// Slack polling source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SlackConfig {
    /// Slack bot token (`xoxb-...`). `None` disables the poll loop.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Slack Web API base URL.
    #[serde(default = "default_slack_api_base")]
    pub api_base: String,

    /// Text that marks a message as addressed to the bot.
    /// Defaults to `@<bot user id>` once the bot identity is known.
    #[serde(default)]
    pub mention: Option<String>,

    /// Seconds between poll ticks.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Seconds between channel directory refreshes.
    #[serde(default = "default_channel_refresh_secs")]
    pub channel_refresh_secs: u64,

    /// Messages fetched per channel per tick.
    #[serde(default = "default_history_page_size")]
    pub history_page_size: u32,

    /// Channels requested per `conversations.list` page.
    #[serde(default = "default_channel_page_limit")]
    pub channel_page_limit: u32,

    /// Also drop messages posted by other bot integrations.
    #[serde(default)]
    pub ignore_bot_messages: bool,

    /// Per-request HTTP timeout.
    #[serde(default = "default_slack_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base: default_slack_api_base(),
            mention: None,
            poll_interval_secs: default_poll_interval_secs(),
            channel_refresh_secs: default_channel_refresh_secs(),
            history_page_size: default_history_page_size(),
            channel_page_limit: default_channel_page_limit(),
            ignore_bot_messages: false,
            request_timeout_secs: default_slack_request_timeout_secs(),
        }
    }
}

fn default_slack_api_base() -> String {
    "https://slack.com/api".to_string()
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_channel_refresh_secs() -> u64 {
    3600
}

fn default_history_page_size() -> u32 {
    10
}

fn default_channel_page_limit() -> u32 {
    1000
}

fn default_slack_request_timeout_secs() -> u64 {
    30
}

/// Telegram push source configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. `None` disables Telegram integration.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Text that marks a message as addressed to the bot.
    /// Defaults to `@<bot username>` as reported by `getMe`.
    #[serde(default)]
    pub mention: Option<String>,
}

/// OpenAI completion endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// OpenAI API key. `None` falls back to the `OPENAI_API_KEY` env var.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat Completions endpoint base URL.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Model used for answers.
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Response size cap.
    #[serde(default = "default_openai_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_openai_temperature")]
    pub temperature: f32,

    /// Per-request HTTP timeout.
    #[serde(default = "default_openai_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
            model: default_openai_model(),
            max_tokens: default_openai_max_tokens(),
            temperature: default_openai_temperature(),
            request_timeout_secs: default_openai_request_timeout_secs(),
        }
    }
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

fn default_openai_max_tokens() -> u32 {
    500
}

fn default_openai_temperature() -> f32 {
    0.7
}

fn default_openai_request_timeout_secs() -> u64 {
    60
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("huddle").join("huddle.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("huddle.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// History windows used when composing prompts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    /// Messages of the asking channel included in the prompt.
    #[serde(default = "default_history_limit")]
    pub channel_limit: u32,

    /// Messages across all channels included in the prompt.
    #[serde(default = "default_history_limit")]
    pub global_limit: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            channel_limit: default_history_limit(),
            global_limit: default_history_limit(),
        }
    }
}

fn default_history_limit() -> u32 {
    50
}
