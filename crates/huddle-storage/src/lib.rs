// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite history store for huddle.
//!
//! Provides a WAL-mode SQLite database with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, and the append and
//! windowed read operations behind [`huddle_core::HistoryStore`].

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteHistoryStore;
pub use database::Database;
