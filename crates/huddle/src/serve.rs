// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `huddle serve`: wires storage, the completion provider and both chat
//! platforms together, then runs until a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use huddle_agent::shutdown::{install_signal_handler, join_with_timeout};
use huddle_agent::{
    AnswerComposer, ChannelPoller, HistoryLog, PollerSettings, PushIngress, load_system_prompt,
};
use huddle_config::model::HuddleConfig;
use huddle_core::{HealthStatus, HuddleError, PluginAdapter};
use huddle_openai::OpenAiProvider;
use huddle_slack::SlackAdapter;
use huddle_storage::SqliteHistoryStore;
use huddle_telegram::TelegramChannel;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Runs the `huddle serve` command.
///
/// Fails only on missing credentials or when storage cannot be opened.
pub async fn run_serve(config: HuddleConfig) -> Result<(), HuddleError> {
    init_tracing(&config.agent.log_level);

    info!(agent_name = config.agent.name.as_str(), "starting huddle serve");

    check_credentials(&config)?;

    let storage = Arc::new(SqliteHistoryStore::new(config.storage.clone()));
    storage.initialize().await?;

    let provider = Arc::new(OpenAiProvider::new(&config.openai)?);
    report_health(storage.as_ref()).await;
    report_health(provider.as_ref()).await;

    let history = HistoryLog::new(storage.clone());
    let persona = load_system_prompt(&config.agent).await;
    let composer = Arc::new(AnswerComposer::new(
        history.clone(),
        provider,
        persona,
        &config.history,
        &config.openai,
    ));

    let cancel = install_signal_handler();

    let poll_task: Option<JoinHandle<()>> = if has_value(config.slack.bot_token.as_deref()) {
        let slack = Arc::new(SlackAdapter::new(&config.slack)?);
        report_health(slack.as_ref()).await;
        let poller = ChannelPoller::new(
            slack.clone(),
            slack,
            history.clone(),
            composer.clone(),
            PollerSettings::from_config(&config.slack),
        );
        Some(tokio::spawn(poller.run(cancel.clone())))
    } else {
        warn!("slack.bot_token not set (SLACK_BOT_TOKEN), Slack polling disabled");
        None
    };

    let push_task: Option<JoinHandle<()>> = if has_value(config.telegram.bot_token.as_deref()) {
        let telegram = TelegramChannel::new(&config.telegram)?;
        report_health(&telegram).await;
        let mention = match telegram.mention().await {
            Ok(mention) => mention,
            Err(e) => {
                let fallback = format!("@{}", config.agent.name);
                warn!(
                    error = %e,
                    mention = fallback.as_str(),
                    "could not resolve Telegram bot username, using agent name"
                );
                fallback
            }
        };
        info!(mention = mention.as_str(), "Telegram mention token");
        let ingress = Arc::new(PushIngress::new(
            history.clone(),
            composer.clone(),
            Arc::new(telegram.sender()),
            mention,
        ));
        Some(telegram.spawn(ingress, cancel.clone()))
    } else {
        warn!("telegram.bot_token not set (TELEGRAM_BOT_TOKEN), Telegram disabled");
        None
    };

    info!("huddle is running");
    cancel.cancelled().await;
    info!("shutdown requested");

    let timeout = Duration::from_secs(config.agent.shutdown_timeout_secs);
    if let Some(task) = push_task {
        join_with_timeout("telegram dispatcher", task, timeout).await;
    }
    if let Some(task) = poll_task {
        join_with_timeout("slack poller", task, timeout).await;
    }

    if let Err(e) = storage.close().await {
        error!(error = %e, "failed to close storage cleanly");
    }

    info!("huddle stopped");
    Ok(())
}

/// Present and not blank.
pub fn has_value(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Fails fast when the process could not do anything useful.
fn check_credentials(config: &HuddleConfig) -> Result<(), HuddleError> {
    if !has_value(config.openai.api_key.as_deref()) {
        return Err(HuddleError::Config(
            "openai.api_key is required (set OPENAI_API_KEY or HUDDLE_OPENAI_API_KEY)".into(),
        ));
    }
    if !has_value(config.slack.bot_token.as_deref())
        && !has_value(config.telegram.bot_token.as_deref())
    {
        return Err(HuddleError::Config(
            "no chat platform configured: set SLACK_BOT_TOKEN and/or TELEGRAM_BOT_TOKEN".into(),
        ));
    }
    Ok(())
}

/// Logs an adapter's health. Never fatal.
async fn report_health(adapter: &dyn PluginAdapter) {
    match adapter.health_check().await {
        Ok(HealthStatus::Healthy) => info!(adapter = adapter.name(), "adapter healthy"),
        Ok(HealthStatus::Degraded(reason)) => {
            warn!(adapter = adapter.name(), reason = reason.as_str(), "adapter degraded")
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            warn!(adapter = adapter.name(), reason = reason.as_str(), "adapter unhealthy")
        }
        Err(e) => warn!(adapter = adapter.name(), error = %e, "adapter health check failed"),
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("huddle={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
