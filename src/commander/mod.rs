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

//! Command-line input logic and state management.
//!
//! This module implements the logic for the command-line processing
//! component, handling a text input component, and dispatching a
//! corresponding application command when typing is finished and a command
//! is submitted.
//!
//! # Commands
//!
//! * `q` - quit the application.
//! * `load <path>` - import a catalog file manually (the terminal fallback
//!   when no catalog could be loaded automatically).
//! * `grade [value]` - set or clear the grade filter.
//! * `term [value]` - set or clear the term filter.
//! * `clear` - clear all filter criteria.

use std::{path::PathBuf, sync::mpsc::Sender};

use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::actions::commands::AppCommand;

pub(crate) struct Commander {
    active: bool,
    pub(crate) input: Input,
}

impl Commander {
    pub(crate) fn new() -> Self {
        Self {
            active: false,
            input: Input::default(),
        }
    }

    pub(crate) fn active(&self) -> bool {
        self.active
    }

    pub(crate) fn handle_event(
        &mut self,
        event: Event,
        command_tx: &mut Sender<AppCommand>,
    ) -> bool {
        if self.active {
            match event {
                Event::Key(key_event) => match key_event.code {
                    KeyCode::Esc => {
                        self.active = false;
                        self.input.reset();
                        true
                    }

                    KeyCode::Enter => {
                        let buffer = self.input.value().trim().to_string();
                        if !buffer.is_empty() {
                            let _ = self.run_command(&buffer, command_tx);
                        }
                        self.input.reset();
                        self.active = false;
                        true
                    }

                    _ => {
                        // Delegate all other key events to the managed input
                        // component.
                        self.input.handle_event(&event);
                        true
                    }
                },

                _ => false,
            }
        } else {
            match event {
                Event::Key(key_event) => match key_event.code {
                    KeyCode::Char(':') => {
                        self.active = true;
                        true
                    }

                    _ => false,
                },

                _ => false,
            }
        }
    }

    fn run_command(&self, buffer: &str, command_tx: &mut Sender<AppCommand>) -> Result<()> {
        let parts: Vec<&str> = buffer.split_whitespace().collect();

        match parts.as_slice() {
            ["q"] => command_tx.send(AppCommand::ExitApplication)?,

            ["load", path_parts @ ..] if !path_parts.is_empty() => {
                let path = PathBuf::from(path_parts.join(" "));
                command_tx.send(AppCommand::ImportCatalog(path))?;
            }

            ["grade"] => command_tx.send(AppCommand::SetGradeFilter(None))?,
            ["grade", grade] => {
                command_tx.send(AppCommand::SetGradeFilter(Some(grade.to_string())))?
            }

            ["term"] => command_tx.send(AppCommand::SetTermFilter(None))?,
            ["term", term] => {
                command_tx.send(AppCommand::SetTermFilter(Some(term.to_string())))?
            }

            ["clear"] => command_tx.send(AppCommand::ClearFilters)?,

            _ => {}
        }

        Ok(())
    }
}
