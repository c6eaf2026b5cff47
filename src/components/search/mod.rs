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

//! Title search input.
//!
//! A thin wrapper around a managed text input. While active it captures all
//! key events; every edit re-runs the filters immediately, so there is no
//! separate submit step - Enter and Esc just close the input.

use std::sync::mpsc::Sender;

use crossterm::event::{Event, KeyCode};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::actions::events::AppEvent;

pub(crate) struct SearchInput {
    active: bool,
    pub(crate) input: Input,
}

impl SearchInput {
    pub(crate) fn new() -> Self {
        Self {
            active: false,
            input: Input::default(),
        }
    }

    pub(crate) fn active(&self) -> bool {
        self.active
    }

    pub(crate) fn activate(&mut self) {
        self.active = true;
    }

    /// Replaces the search text without emitting a change event, used when
    /// restoring persisted UI state.
    pub(crate) fn restore(&mut self, text: &str) {
        self.input = Input::default().with_value(text.to_string());
    }

    /// Processes a key event while the input is active.
    ///
    /// Returns true when the event was consumed. Any edit that changes the
    /// text sends [`AppEvent::SearchChanged`].
    pub(crate) fn handle_event(&mut self, event: Event, event_tx: &Sender<AppEvent>) -> bool {
        if !self.active {
            return false;
        }

        let Event::Key(key_event) = event else {
            return false;
        };

        match key_event.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.active = false;
                true
            }

            _ => {
                let before = self.input.value().to_string();
                self.input.handle_event(&event);
                if self.input.value() != before {
                    let _ = event_tx.send(AppEvent::SearchChanged(self.input.value().to_string()));
                }
                true
            }
        }
    }
}
