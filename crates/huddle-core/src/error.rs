// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by every huddle crate.

use thiserror::Error;

/// The primary error type used across adapter traits and core operations.
#[derive(Debug, Error)]
pub enum HuddleError {
    /// Configuration errors (invalid TOML, missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (open, migration, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Chat platform errors (HTTP failure, `ok: false` responses, rate limiting).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Unexpected completion failures (undecodable body, empty choices).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The completion service itself refused or failed the call
    /// (unavailable, quota, auth, transport).
    #[error("provider service error: {message}")]
    ProviderService {
        /// HTTP status when the service answered at all.
        status: Option<u16>,
        message: String,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HuddleError {
    /// Whether this error came from the completion service tier rather than
    /// from something unexpected on our side.
    pub fn is_service_error(&self) -> bool {
        matches!(self, HuddleError::ProviderService { .. })
    }

    /// Shorthand for a [`HuddleError::Channel`] without an underlying source.
    pub fn channel(message: impl Into<String>) -> Self {
        HuddleError::Channel {
            message: message.into(),
            source: None,
        }
    }
}
