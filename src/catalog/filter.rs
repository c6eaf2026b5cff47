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

//! Filter criteria and the filtered-view derivation.
//!
//! Filtering is re-run synchronously on every criteria change; the record
//! sets involved are small enough that this never needs to leave the UI
//! thread.

use serde::{Deserialize, Serialize};

use crate::catalog::Record;

/// The user's active filters.
///
/// Serialized as part of [`crate::store::UiState`] so a restart restores the
/// view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct FilterCriteria {
    pub(crate) grade: Option<String>,
    pub(crate) term: Option<String>,
    /// Case-insensitive substring match against the record title.
    pub(crate) search: Option<String>,
}

impl FilterCriteria {
    /// Whether a single record passes these criteria.
    ///
    /// Records missing any required metadata never pass, regardless of the
    /// criteria.
    pub(crate) fn matches(&self, record: &Record) -> bool {
        if !record.is_filterable() {
            return false;
        }

        if let Some(grade) = &self.grade {
            if &record.grade != grade {
                return false;
            }
        }

        if let Some(term) = &self.term {
            if &record.term != term {
                return false;
            }
        }

        if let Some(search) = &self.search {
            if !record
                .title
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }

        true
    }
}

/// Derives the filtered view from the full record set.
///
/// The output is always an order-preserving subsequence of `records`.
pub(crate) fn apply_filters(records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    records
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(grade: &str, term: &str, title: &str) -> Record {
        Record {
            source: format!("{}.ogg", title),
            grade: grade.to_string(),
            term: term.to_string(),
            lesson_number: String::new(),
            title: title.to_string(),
        }
    }

    fn criteria(grade: Option<&str>, term: Option<&str>, search: Option<&str>) -> FilterCriteria {
        FilterCriteria {
            grade: grade.map(str::to_string),
            term: term.map(str::to_string),
            search: search.map(str::to_string),
        }
    }

    #[test]
    fn empty_criteria_keeps_all_complete_records() {
        let records = vec![record("1", "1", "a"), record("2", "2", "b")];
        let filtered = apply_filters(&records, &FilterCriteria::default());
        assert_eq!(filtered, records);
    }

    #[test]
    fn records_missing_required_fields_are_excluded() {
        let records = vec![
            record("1", "1", "a"),
            record("", "1", "b"),
            record("1", "", "c"),
            record("1", "1", ""),
        ];
        let filtered = apply_filters(&records, &FilterCriteria::default());
        assert_eq!(filtered, vec![record("1", "1", "a")]);
    }

    #[test]
    fn grade_and_term_filters_require_equality() {
        let records = vec![
            record("1", "1", "a"),
            record("1", "2", "b"),
            record("2", "1", "c"),
        ];
        let filtered = apply_filters(&records, &criteria(Some("1"), Some("1"), None));
        assert_eq!(filtered, vec![record("1", "1", "a")]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let records = vec![
            record("1", "1", "Spring Morning"),
            record("1", "1", "Autumn Night"),
        ];
        let filtered = apply_filters(&records, &criteria(None, None, Some("spring")));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Spring Morning");

        let filtered = apply_filters(&records, &criteria(None, None, Some("NIGHT")));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Autumn Night");
    }

    #[test]
    fn output_preserves_relative_order() {
        let records: Vec<Record> = (0..20)
            .map(|i| record(if i % 2 == 0 { "1" } else { "2" }, "1", &format!("t{}", i)))
            .collect();
        let filtered = apply_filters(&records, &criteria(Some("1"), None, None));
        assert_eq!(filtered.len(), 10);
        let titles: Vec<&str> = filtered.iter().map(|r| r.title.as_str()).collect();
        let mut sorted_by_input_order = titles.clone();
        sorted_by_input_order.sort_by_key(|t| t[1..].parse::<u32>().unwrap());
        assert_eq!(titles, sorted_by_input_order);
    }

    #[test]
    fn grade_filter_counts_only_complete_records() {
        // 20 records over grades 1 and 2, some with metadata gaps.
        let mut records: Vec<Record> = (0..20)
            .map(|i| record(if i < 12 { "1" } else { "2" }, "1", &format!("t{}", i)))
            .collect();
        records[0].term = String::new();
        records[5].title = String::new();

        let filtered = apply_filters(&records, &criteria(Some("1"), None, None));
        assert_eq!(filtered.len(), 10);
    }
}
