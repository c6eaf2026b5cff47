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

//! Card list state: pagination over the filtered view plus the selection
//! within the visible page.
//!
//! Rendering lives in [`crate::render::cards`]; this module holds only the
//! arithmetic so it can be tested without a terminal.

/// Records shown per page.
pub(crate) const ITEMS_PER_PAGE: usize = 15;

/// Total number of pages for a filtered view of `len` records (at least 1).
pub(crate) fn page_count(len: usize) -> usize {
    len.div_ceil(ITEMS_PER_PAGE).max(1)
}

/// The index range of the records on `page` (1-based) of a view of `len`.
pub(crate) fn page_range(page: usize, len: usize) -> std::ops::Range<usize> {
    let start = (page.saturating_sub(1)) * ITEMS_PER_PAGE;
    let start = start.min(len);
    let end = (start + ITEMS_PER_PAGE).min(len);
    start..end
}

/// Selection state for the visible page of cards.
pub(crate) struct CardList {
    selected: usize,
}

impl CardList {
    pub(crate) fn new() -> Self {
        Self { selected: 0 }
    }

    pub(crate) fn selected(&self) -> usize {
        self.selected
    }

    /// Resets the selection, called whenever the page is rebuilt.
    pub(crate) fn reset(&mut self) {
        self.selected = 0;
    }

    /// Moves the selection down, wrapping at the end of the page.
    pub(crate) fn select_next(&mut self, page_len: usize) {
        if page_len == 0 {
            return;
        }
        self.selected = if self.selected >= page_len - 1 {
            0
        } else {
            self.selected + 1
        };
    }

    /// Moves the selection up, wrapping at the start of the page.
    pub(crate) fn select_previous(&mut self, page_len: usize) {
        if page_len == 0 {
            return;
        }
        self.selected = if self.selected == 0 {
            page_len - 1
        } else {
            self.selected - 1
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0), 1);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(15), 1);
        assert_eq!(page_count(16), 2);
        assert_eq!(page_count(45), 3);
    }

    #[test]
    fn page_range_slices_within_bounds() {
        assert_eq!(page_range(1, 40), 0..15);
        assert_eq!(page_range(2, 40), 15..30);
        assert_eq!(page_range(3, 40), 30..40);
        // Out-of-range pages yield an empty slice rather than panic.
        assert_eq!(page_range(4, 40), 40..40);
        assert_eq!(page_range(1, 0), 0..0);
    }

    #[test]
    fn selection_wraps_both_ways() {
        let mut list = CardList::new();
        list.select_previous(3);
        assert_eq!(list.selected(), 2);
        list.select_next(3);
        assert_eq!(list.selected(), 0);
        list.select_next(3);
        assert_eq!(list.selected(), 1);
    }

    #[test]
    fn selection_on_empty_page_stays_put() {
        let mut list = CardList::new();
        list.select_next(0);
        list.select_previous(0);
        assert_eq!(list.selected(), 0);
    }
}
