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

//! Asynchronous application command processing.
//!
//! This module implements the command pattern used to offload potentially
//! blocking work from the main UI thread - here that is catalog loading,
//! which may hit the network or the filesystem. It provides a dedicated
//! worker loop that translates [`AppCommand`] requests into loader calls and
//! broadcasts the results back to the application via [`AppEvent`]s.
//!
//! Filter changes also pass through here so the commander has a single
//! dispatch target; they are simply echoed back as events.

use anyhow::Result;
use std::{
    path::PathBuf,
    sync::mpsc::{Receiver, Sender},
    thread,
};

use crate::{actions::events::AppEvent, catalog::loader, config::AppConfig};

#[derive(Debug)]
pub(crate) enum AppCommand {
    /// Load the catalog through the configured fallback chain.
    LoadCatalog,
    /// Load the catalog from a user-supplied file (`:load <path>`).
    ImportCatalog(PathBuf),

    SetGradeFilter(Option<String>),
    SetTermFilter(Option<String>),
    ClearFilters,

    ExitApplication,
}

/// Spawns a background thread to process application commands.
///
/// # Arguments
///
/// * `config` - The application configuration.
/// * `command_rx` - The receiving end of the command channel.
/// * `event_tx` - The sending end of the channel for broadcasting results.
pub(crate) fn spawn_command_worker(
    config: &AppConfig,
    command_rx: Receiver<AppCommand>,
    event_tx: Sender<AppEvent>,
) {
    let config = config.clone();

    thread::spawn(move || {
        while let Ok(request) = command_rx.recv() {
            if let Err(e) = handle_command(&config, request, &event_tx) {
                let _ = event_tx.send(AppEvent::Error(e.to_string()));
            }
        }
    });
}

/// Orchestrates the execution of a single command.
///
/// This function implements the logic for each command and sends the result
/// back through the application event channel.
fn handle_command(
    config: &AppConfig,
    command: AppCommand,
    event_tx: &Sender<AppEvent>,
) -> Result<()> {
    match command {
        AppCommand::LoadCatalog => match loader::load_catalog(config) {
            Ok(records) => event_tx.send(AppEvent::CatalogLoaded(records))?,
            Err(e) => event_tx.send(AppEvent::CatalogLoadFailed(format!("{:#}", e)))?,
        },

        AppCommand::ImportCatalog(path) => match loader::import_file(&path) {
            Ok(records) => event_tx.send(AppEvent::CatalogLoaded(records))?,
            Err(e) => event_tx.send(AppEvent::CatalogLoadFailed(format!("{:#}", e)))?,
        },

        AppCommand::SetGradeFilter(grade) => {
            event_tx.send(AppEvent::GradeFilterChanged(grade))?;
        }
        AppCommand::SetTermFilter(term) => {
            event_tx.send(AppEvent::TermFilterChanged(term))?;
        }
        AppCommand::ClearFilters => {
            event_tx.send(AppEvent::FiltersCleared)?;
        }

        AppCommand::ExitApplication => {
            event_tx.send(AppEvent::ExitApplication)?;
        }
    }

    Ok(())
}
