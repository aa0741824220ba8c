// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! huddle - group chat assistant for Slack and Telegram.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// huddle - answers questions in Slack and Telegram group chats.
#[derive(Parser, Debug)]
#[command(name = "huddle", version, about, long_about = None)]
struct Cli {
    /// Extra configuration file, merged after the standard locations.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Start polling Slack and listening on Telegram (default).
    Serve,
    /// Load and validate configuration, then exit.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => huddle_config::load_and_validate_path(path),
        None => huddle_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            huddle_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("huddle: {e}");
                std::process::exit(1);
            }
        }
        Commands::Check => {
            println!(
                "huddle: config OK (agent.name={}, slack={}, telegram={}, database={})",
                config.agent.name,
                enabled(config.slack.bot_token.as_deref()),
                enabled(config.telegram.bot_token.as_deref()),
                config.storage.database_path,
            );
        }
    }
}

fn enabled(token: Option<&str>) -> &'static str {
    if serve::has_value(token) { "enabled" } else { "disabled" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn defaults_validate() {
        let config = huddle_config::load_and_validate_str("").unwrap();
        assert_eq!(config.agent.name, "huddle");
    }

    #[test]
    fn parses_config_flag_and_subcommand() {
        let cli = Cli::try_parse_from(["huddle", "check", "--config", "/tmp/h.toml"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Check));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/h.toml")));
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["huddle"]).unwrap();
        assert!(cli.command.is_none());
    }
}
