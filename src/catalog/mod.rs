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

//! Domain models for the recording catalog.
//!
//! A [`Record`] is one narrated-text recording with its grade/term metadata.
//! The [`Catalog`] holds the full record set in load order and derives the
//! distinct grade values used to populate the filter options.

pub(crate) mod filter;
pub(crate) mod loader;

use std::collections::BTreeSet;

use serde::Deserialize;

/// One catalog entry: a narrated-text recording.
///
/// The catalog JSON historically uses Chinese field names; the aliases keep
/// those files loadable while plain English keys also work. Missing fields
/// deserialize to empty strings and such records are excluded from filtering
/// rather than rejected at load time.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub(crate) struct Record {
    #[serde(default, alias = "src")]
    pub(crate) source: String,

    #[serde(default, alias = "年级")]
    pub(crate) grade: String,

    #[serde(default, alias = "学期")]
    pub(crate) term: String,

    #[serde(default, alias = "课文序号")]
    pub(crate) lesson_number: String,

    #[serde(default, alias = "课文标题")]
    pub(crate) title: String,
}

impl Record {
    /// A record is filterable only when its required metadata is present.
    pub(crate) fn is_filterable(&self) -> bool {
        !self.grade.is_empty() && !self.term.is_empty() && !self.title.is_empty()
    }
}

/// The full record set, loaded once per session.
pub(crate) struct Catalog {
    records: Vec<Record>,
    grades: Vec<String>,
}

impl Catalog {
    pub(crate) fn new() -> Self {
        Self {
            records: vec![],
            grades: vec![],
        }
    }

    /// Replaces the record set, re-deriving the grade filter options.
    pub(crate) fn replace(&mut self, records: Vec<Record>) {
        self.grades = records
            .iter()
            .filter(|r| !r.grade.is_empty())
            .map(|r| r.grade.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        self.records = records;
    }

    /// All records, in load order.
    pub(crate) fn records(&self) -> &[Record] {
        &self.records
    }

    /// Distinct grade values, sorted ascending.
    pub(crate) fn grades(&self) -> &[String] {
        &self.grades
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(grade: &str, title: &str) -> Record {
        Record {
            source: format!("{}.ogg", title),
            grade: grade.to_string(),
            term: "1".to_string(),
            lesson_number: "1".to_string(),
            title: title.to_string(),
        }
    }

    #[test]
    fn replace_derives_sorted_distinct_grades() {
        let mut catalog = Catalog::new();
        catalog.replace(vec![
            record("3", "a"),
            record("1", "b"),
            record("3", "c"),
            record("2", "d"),
        ]);
        assert_eq!(catalog.grades(), ["1", "2", "3"]);
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn replace_ignores_empty_grades_in_options() {
        let mut catalog = Catalog::new();
        let mut incomplete = record("", "a");
        incomplete.grade = String::new();
        catalog.replace(vec![incomplete, record("2", "b")]);
        assert_eq!(catalog.grades(), ["2"]);
        // The record itself is retained, only the option list skips it.
        assert_eq!(catalog.len(), 2);
    }
}
