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

//! Application configuration.
//!
//! This module manages the application configuration file. The catalog
//! location is configurable because the recording list may be served over
//! HTTP or shipped as a plain file next to the audio.

use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "recital";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub version: u32,
    /// URL the catalog JSON is fetched from first.
    pub catalog_url: String,
    /// Local fallback path when the URL is unreachable.
    pub catalog_path: String,
    /// SQLite file holding playback and UI state.
    pub database_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            catalog_url: "http://127.0.0.1:8000/list.json".to_string(),
            catalog_path: "list.json".to_string(),
            database_file: "recital.db".to_string(),
        }
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}
