// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Durable playback and UI state persistence.
//!
//! This module wraps a single SQLite table in a key-value interface with
//! JSON-encoded values. There are two logical namespaces:
//!
//! * `playback:<source>` - one [`PlaybackStatus`] per distinct audio source,
//!   created on the first checkpoint and never deleted.
//! * `ui:state` - one aggregate [`UiState`] entry so a restart restores the
//!   user's filters and page.
//!
//! # Failure policy
//!
//! All persistence is best-effort. The typed `get`/`set` operations return
//! [`StoreError`] so callers can see what went wrong, but the domain-level
//! wrappers (`playback_status`, `save_ui_state`, ...) apply the single policy
//! used everywhere in the application: log the failure and carry on with the
//! in-memory state as the source of truth.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::catalog::filter::FilterCriteria;

const PLAYBACK_KEY_PREFIX: &str = "playback:";
const UI_STATE_KEY: &str = "ui:state";

/// Errors raised by the typed key-value operations.
#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persisted progress and completion state for one audio source.
///
/// The JSON field names match the layout the catalog's previous incarnations
/// wrote, so an exported state file remains readable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct PlaybackStatus {
    pub(crate) current_time: f64,
    pub(crate) duration: f64,
    pub(crate) play_count: u32,
    pub(crate) completed: bool,
}

/// Persisted view state: active filters and the current page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct UiState {
    pub(crate) criteria: FilterCriteria,
    pub(crate) current_page: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            criteria: FilterCriteria::default(),
            current_page: 1,
        }
    }
}

/// A synchronous, durable key-value store backed by SQLite.
///
/// The connection lives on the main thread; writes block the calling event
/// handler briefly, which is acceptable because checkpoints are throttled.
pub(crate) struct Store {
    conn: Connection,
}

impl Store {
    /// Opens the store, configuring the connection and creating the schema.
    ///
    /// Uses WAL journaling with `synchronous = NORMAL`, the same tuning as
    /// any other small single-writer database here.
    ///
    /// # Errors
    ///
    /// Returns an error if the database file cannot be opened, the PRAGMA
    /// configuration fails, or the schema cannot be created.
    pub(crate) fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;

        let journal_mode: String =
            conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
        if journal_mode != "wal" {
            anyhow::bail!(
                "Failed to switch to WAL mode. Current mode: {}",
                journal_mode
            );
        }

        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
        conn.set_prepared_statement_cache_capacity(16);

        create_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Opens an in-memory store, used by tests.
    #[cfg(test)]
    pub(crate) fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        create_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Fetches and deserializes the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent; stored state is always
    /// optional on read.
    pub(crate) fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT value FROM kv WHERE key = ?")?;
        let value: Option<String> = stmt
            .query_row([key], |row| row.get(0))
            .optional()?;

        match value {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Serializes `value` and stores it under `key`, replacing any previous
    /// entry.
    pub(crate) fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT (key) DO UPDATE SET value = ?2",
        )?;
        stmt.execute(params![key, json])?;
        Ok(())
    }

    /// Looks up the persisted playback status for an audio source.
    pub(crate) fn playback_status(&self, source: &str) -> Option<PlaybackStatus> {
        match self.get(&playback_key(source)) {
            Ok(status) => status,
            Err(e) => {
                log::warn!("Failed to read playback status for {}: {}", source, e);
                None
            }
        }
    }

    /// Persists the playback status for an audio source, best-effort.
    pub(crate) fn save_playback_status(&self, source: &str, status: &PlaybackStatus) {
        if let Err(e) = self.set(&playback_key(source), status) {
            log::warn!("Failed to save playback status for {}: {}", source, e);
        }
    }

    /// Looks up the persisted UI state.
    pub(crate) fn ui_state(&self) -> Option<UiState> {
        match self.get(UI_STATE_KEY) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("Failed to read UI state: {}", e);
                None
            }
        }
    }

    /// Persists the UI state, best-effort.
    pub(crate) fn save_ui_state(&self, state: &UiState) {
        if let Err(e) = self.set(UI_STATE_KEY, state) {
            log::warn!("Failed to save UI state: {}", e);
        }
    }
}

fn playback_key(source: &str) -> String {
    format!("{}{}", PLAYBACK_KEY_PREFIX, source)
}

/// Create the key-value schema.
fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )
    .context("Failed to create schema")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_of_absent_key_is_none() {
        let store = Store::in_memory().unwrap();
        let status: Option<PlaybackStatus> = store.get("playback:missing.ogg").unwrap();
        assert!(status.is_none());
    }

    #[test]
    fn set_then_get_round_trips() {
        let store = Store::in_memory().unwrap();
        let status = PlaybackStatus {
            current_time: 42.5,
            duration: 120.0,
            play_count: 2,
            completed: true,
        };
        store.save_playback_status("a.ogg", &status);
        assert_eq!(store.playback_status("a.ogg"), Some(status));
    }

    #[test]
    fn set_replaces_previous_value() {
        let store = Store::in_memory().unwrap();
        let mut status = PlaybackStatus::default();
        store.save_playback_status("a.ogg", &status);
        status.current_time = 10.0;
        store.save_playback_status("a.ogg", &status);
        assert_eq!(
            store.playback_status("a.ogg").unwrap().current_time,
            10.0
        );
    }

    #[test]
    fn sources_are_keyed_independently() {
        let store = Store::in_memory().unwrap();
        let status = PlaybackStatus {
            current_time: 5.0,
            ..Default::default()
        };
        store.save_playback_status("a.ogg", &status);
        assert!(store.playback_status("b.ogg").is_none());
    }

    #[test]
    fn ui_state_round_trips() {
        let store = Store::in_memory().unwrap();
        assert!(store.ui_state().is_none());

        let state = UiState {
            criteria: FilterCriteria {
                grade: Some("3".to_string()),
                term: None,
                search: Some("spring".to_string()),
            },
            current_page: 4,
        };
        store.save_ui_state(&state);
        assert_eq!(store.ui_state(), Some(state));
    }

    #[test]
    fn playback_status_tolerates_older_layouts() {
        // Entries written before the duration field existed must still read.
        let store = Store::in_memory().unwrap();
        store
            .set("playback:old.ogg", &serde_json::json!({ "currentTime": 12.0 }))
            .unwrap();
        let status = store.playback_status("old.ogg").unwrap();
        assert_eq!(status.current_time, 12.0);
        assert_eq!(status.play_count, 0);
        assert!(!status.completed);
    }
}
