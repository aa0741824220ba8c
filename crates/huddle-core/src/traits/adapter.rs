// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait for identity and health reporting.

use async_trait::async_trait;

use crate::error::HuddleError;
use crate::types::{AdapterType, HealthStatus};

/// Identity and health shared by every concrete adapter
/// (Slack, Telegram, OpenAI, SQLite).
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the type of adapter.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, HuddleError>;
}
