// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for huddle.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and diagnostic
//! error rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use huddle_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Polling every {}s", config.slack.poll_interval_secs);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::HuddleConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// Returns either a valid `HuddleConfig` or every diagnostic found.
pub fn load_and_validate() -> Result<HuddleConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let toml_sources = collect_toml_sources(None);
            Err(diagnostic::figment_to_config_errors(err, &toml_sources))
        }
    }
}

/// Like [`load_and_validate`], with an explicit config file layered on top.
pub fn load_and_validate_path(path: &Path) -> Result<HuddleConfig, Vec<ConfigError>> {
    if !path.exists() {
        return Err(vec![ConfigError::Other(format!(
            "config file `{}` does not exist",
            path.display()
        ))]);
    }

    match loader::load_config_from_path(path) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let toml_sources = collect_toml_sources(Some(path));
            Err(diagnostic::figment_to_config_errors(err, &toml_sources))
        }
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<HuddleConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources(extra: Option<&Path>) -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Some(path) = extra
        && let Ok(content) = std::fs::read_to_string(path)
    {
        let full = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        sources.push((full.display().to_string(), content));
    }

    if let Ok(content) = std::fs::read_to_string("huddle.toml") {
        let path = std::env::current_dir()
            .map(|d| d.join("huddle.toml").display().to_string())
            .unwrap_or_else(|_| "huddle.toml".to_string());
        sources.push((path, content));
    }

    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("huddle/huddle.toml");
        if let Ok(content) = std::fs::read_to_string(&path) {
            sources.push((path.display().to_string(), content));
        }
    }

    let system_path = Path::new("/etc/huddle/huddle.toml");
    if let Ok(content) = std::fs::read_to_string(system_path) {
        sources.push((system_path.display().to_string(), content));
    }

    sources
}
