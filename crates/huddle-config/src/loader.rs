// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./huddle.toml` > `~/.config/huddle/huddle.toml` > `/etc/huddle/huddle.toml`
//! with environment variable overrides via `HUDDLE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::HuddleConfig;

/// Unprefixed credential variables honored for compatibility with common
/// deployment setups. `HUDDLE_*` variables still take precedence.
const CREDENTIAL_VARS: &[(&str, &str)] = &[
    ("SLACK_BOT_TOKEN", "slack.bot_token"),
    ("TELEGRAM_BOT_TOKEN", "telegram.bot_token"),
    ("OPENAI_API_KEY", "openai.api_key"),
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/huddle/huddle.toml` (system-wide)
/// 3. `~/.config/huddle/huddle.toml` (user XDG config)
/// 4. `./huddle.toml` (local directory)
/// 5. `SLACK_BOT_TOKEN`, `TELEGRAM_BOT_TOKEN`, `OPENAI_API_KEY`
/// 6. `HUDDLE_*` environment variables
pub fn load_config() -> Result<HuddleConfig, figment::Error> {
    build_figment(None).extract()
}

/// Load configuration from a TOML string only (no files, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<HuddleConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HuddleConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from the XDG hierarchy plus an explicit file, with env var overrides.
///
/// The explicit file is merged after the XDG files and before the environment.
pub fn load_config_from_path(path: &Path) -> Result<HuddleConfig, figment::Error> {
    build_figment(Some(path)).extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment(extra: Option<&Path>) -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(HuddleConfig::default()))
        .merge(Toml::file("/etc/huddle/huddle.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("huddle/huddle.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("huddle.toml"));

    if let Some(path) = extra {
        figment = figment.merge(Toml::file(path));
    }

    figment.merge(credential_provider()).merge(env_provider())
}

/// Maps the conventional unprefixed credential variables onto their config keys.
fn credential_provider() -> Env {
    let names: Vec<&str> = CREDENTIAL_VARS.iter().map(|(var, _)| *var).collect();
    Env::raw().only(&names).map(|key| {
        CREDENTIAL_VARS
            .iter()
            .find(|(var, _)| key.as_str().eq_ignore_ascii_case(var))
            .map(|(_, path)| (*path).into())
            .unwrap_or_else(|| key.as_str().to_string().into())
    })
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `HUDDLE_SLACK_BOT_TOKEN` must map to `slack.bot_token`, not
/// `slack.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("HUDDLE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: HUDDLE_SLACK_BOT_TOKEN -> "slack_bot_token"
        let key_str = key.as_str();
        let mapped = ["agent", "slack", "telegram", "openai", "storage", "history"]
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| key_str.to_string());
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn prefixed_env_maps_to_section_keys() {
        Jail::expect_with(|jail| {
            jail.set_env("HUDDLE_SLACK_POLL_INTERVAL_SECS", "9");
            jail.set_env("HUDDLE_OPENAI_MODEL", "gpt-4o-mini");
            let config: HuddleConfig = Figment::new()
                .merge(Serialized::defaults(HuddleConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.slack.poll_interval_secs, 9);
            assert_eq!(config.openai.model, "gpt-4o-mini");
            Ok(())
        });
    }

    #[test]
    fn unprefixed_credentials_are_picked_up() {
        Jail::expect_with(|jail| {
            jail.set_env("SLACK_BOT_TOKEN", "xoxb-raw");
            jail.set_env("OPENAI_API_KEY", "sk-raw");
            let config: HuddleConfig = Figment::new()
                .merge(Serialized::defaults(HuddleConfig::default()))
                .merge(credential_provider())
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.slack.bot_token.as_deref(), Some("xoxb-raw"));
            assert_eq!(config.openai.api_key.as_deref(), Some("sk-raw"));
            assert!(config.telegram.bot_token.is_none());
            Ok(())
        });
    }

    #[test]
    fn prefixed_credentials_win_over_unprefixed() {
        Jail::expect_with(|jail| {
            jail.set_env("TELEGRAM_BOT_TOKEN", "raw");
            jail.set_env("HUDDLE_TELEGRAM_BOT_TOKEN", "prefixed");
            let config: HuddleConfig = Figment::new()
                .merge(Serialized::defaults(HuddleConfig::default()))
                .merge(credential_provider())
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.telegram.bot_token.as_deref(), Some("prefixed"));
            Ok(())
        });
    }

    #[test]
    fn explicit_file_is_merged() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[agent]\nname = \"desk\"\n")?;
            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert_eq!(config.agent.name, "desk");
            Ok(())
        });
    }
}
