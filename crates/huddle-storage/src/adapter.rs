// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the HistoryStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use huddle_config::model::StorageConfig;
use huddle_core::types::{ChannelHistoryEntry, GlobalHistoryEntry, NewChatMessage};
use huddle_core::{
    AdapterType, AppendOutcome, HealthStatus, HistoryStore, HuddleError, Platform, PluginAdapter,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed history store.
///
/// The database is opened lazily by [`SqliteHistoryStore::initialize`].
pub struct SqliteHistoryStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteHistoryStore {
    /// Create a new store with the given configuration. Nothing is opened yet.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the database and apply migrations.
    pub async fn initialize(&self) -> Result<(), HuddleError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| HuddleError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite history store initialized");
        Ok(())
    }

    /// Checkpoint the WAL and close the connection.
    ///
    /// Callers still holding the store afterwards get storage errors.
    pub async fn close(&self) -> Result<(), HuddleError> {
        self.db()?.close().await
    }

    fn db(&self) -> Result<&Database, HuddleError> {
        self.db.get().ok_or_else(|| HuddleError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteHistoryStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, HuddleError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn append(&self, message: &NewChatMessage) -> Result<AppendOutcome, HuddleError> {
        queries::messages::append_message(self.db()?, message).await
    }

    async fn history_for_channel(
        &self,
        platform: Platform,
        chat_id: &str,
        limit: u32,
    ) -> Result<Vec<ChannelHistoryEntry>, HuddleError> {
        queries::messages::channel_history(self.db()?, platform, chat_id, limit).await
    }

    async fn history_all(&self, limit: u32) -> Result<Vec<GlobalHistoryEntry>, HuddleError> {
        queries::messages::global_history(self.db()?, limit).await
    }
}
