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

//! Catalog loading.
//!
//! The catalog is a JSON array of records. It is loaded once per session by
//! falling through a chain of sources: the configured HTTP URL first, then
//! the local catalog file. If both fail the user is prompted to import a
//! file manually with the `:load <path>` command, which comes back through
//! [`import_file`].
//!
//! All of this runs on the command worker thread; none of it touches the UI.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, bail};

use crate::{catalog::Record, config::AppConfig};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Loads the catalog through the fallback chain, first success wins.
///
/// # Errors
///
/// Returns an error only when every source fails; the error describes the
/// last attempted source.
pub(crate) fn load_catalog(config: &AppConfig) -> Result<Vec<Record>> {
    match fetch_remote(&config.catalog_url) {
        Ok(records) => return Ok(records),
        Err(e) => log::warn!(
            "Failed to fetch catalog from {}: {:#}",
            config.catalog_url, e
        ),
    }

    read_file(Path::new(&config.catalog_path)).with_context(|| {
        format!(
            "No catalog available from {} or {}",
            config.catalog_url, config.catalog_path
        )
    })
}

/// Loads the catalog from a user-supplied file, the terminal fallback.
pub(crate) fn import_file(path: &Path) -> Result<Vec<Record>> {
    read_file(path)
}

fn fetch_remote(url: &str) -> Result<Vec<Record>> {
    let body = ureq::get(url)
        .timeout(FETCH_TIMEOUT)
        .call()
        .with_context(|| format!("Request to {} failed", url))?
        .into_string()
        .context("Failed to read catalog response body")?;

    parse_records(&body)
}

fn read_file(path: &Path) -> Result<Vec<Record>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file {}", path.display()))?;

    parse_records(&json).with_context(|| format!("Malformed catalog file {}", path.display()))
}

/// Parses a catalog payload. The payload must be a JSON array; anything else
/// is a load failure, not an empty catalog.
pub(crate) fn parse_records(json: &str) -> Result<Vec<Record>> {
    let value: serde_json::Value =
        serde_json::from_str(json).context("Catalog payload is not valid JSON")?;

    if !value.is_array() {
        bail!("Catalog payload is not a JSON array");
    }

    serde_json::from_value(value).context("Catalog payload has a malformed record")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_original_field_names() {
        let json = r#"[
            {"src": "g1/lesson01.ogg", "年级": "1", "学期": "1", "课文序号": "第1课", "课文标题": "春晓"}
        ]"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source, "g1/lesson01.ogg");
        assert_eq!(records[0].grade, "1");
        assert_eq!(records[0].term, "1");
        assert_eq!(records[0].lesson_number, "第1课");
        assert_eq!(records[0].title, "春晓");
    }

    #[test]
    fn parses_english_field_names() {
        let json = r#"[
            {"source": "a.ogg", "grade": "2", "term": "1", "lesson_number": "3", "title": "A Poem"}
        ]"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records[0].grade, "2");
        assert_eq!(records[0].title, "A Poem");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let json = r#"[{"src": "a.ogg"}]"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records[0].grade, "");
        assert!(!records[0].is_filterable());
    }

    #[test]
    fn non_array_payload_is_an_error() {
        assert!(parse_records(r#"{"src": "a.ogg"}"#).is_err());
        assert!(parse_records("42").is_err());
        assert!(parse_records("not json").is_err());
    }

    #[test]
    fn empty_array_is_an_empty_catalog() {
        assert!(parse_records("[]").unwrap().is_empty());
    }
}
