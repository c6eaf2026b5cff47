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

//! Application event distribution and orchestration.
//!
//! This module defines the central event-handling logic for the application,
//! bridging the gap between user input (keyboard), background worker updates
//! (catalog loader, audio player), and the UI rendering pipeline.
//!
//! # Architecture
//!
//! The system follows a reactive event-loop pattern:
//!
//! 1. **Capture**: Events are received via the [`AppEvent`] enum through a
//!    channel fed by the input, tick, command, and player threads.
//! 2. **Process**: The [`process_events`] function updates the [`App`] state
//!    and routes playback events into the player coordinator.
//! 3. **Render**: After each event is processed, the UI is re-drawn using
//!    the `ratatui` terminal.
//!
//! Because every handler runs to completion on this thread before the next
//! event is taken, the coordinator needs no locking.

use std::io::Stdout;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::{
    App,
    catalog::Record,
    player::PlayerState,
    render::draw,
};

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),

    CatalogLoaded(Vec<Record>),
    CatalogLoadFailed(String),

    GradeFilterChanged(Option<String>),
    TermFilterChanged(Option<String>),
    FiltersCleared,
    SearchChanged(String),

    PlayerStateChanged(PlayerState),
    DurationChanged(f64),
    TimeChanged(f64),
    PlaybackPaused,
    TrackFinished,
    PlaybackFailed(String),

    Tick,

    ExitApplication,

    Error(String),
    FatalError(String),
}

/// Runs the main application loop, handling events and rendering the UI in
/// the terminal.
///
/// This function loops until a 'quit' event is received or the event channel
/// is closed.
///
/// # Errors
///
/// Returns an error on a fatal worker failure or when the terminal cannot
/// be drawn.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    while let Ok(event) = app.event_rx.recv() {
        if matches!(event, AppEvent::ExitApplication) {
            break;
        }

        match event {
            AppEvent::Key(key) => process_key_event(app, key)?,

            AppEvent::CatalogLoaded(records) => app.apply_catalog(records)?,
            AppEvent::CatalogLoadFailed(message) => {
                log::warn!("Catalog load failed: {}", message);
                app.notice = Some(format!(
                    "{} - import one with :load <path>",
                    message
                ));
            }

            AppEvent::GradeFilterChanged(grade) => {
                app.criteria.grade = grade;
                app.apply_criteria_change()?;
            }
            AppEvent::TermFilterChanged(term) => {
                app.criteria.term = term;
                app.apply_criteria_change()?;
            }
            AppEvent::FiltersCleared => {
                app.criteria = Default::default();
                app.search.restore("");
                app.apply_criteria_change()?;
            }
            AppEvent::SearchChanged(text) => {
                app.criteria.search = (!text.is_empty()).then_some(text);
                app.apply_criteria_change()?;
            }

            // Playback events route into the coordinator, which applies them
            // to whichever session is active or attached.
            AppEvent::PlayerStateChanged(state) => app.player_state = state,
            AppEvent::TimeChanged(seconds) => app.coordinator.on_progress(seconds),
            AppEvent::DurationChanged(duration) => app.coordinator.on_metadata(duration)?,
            AppEvent::PlaybackPaused => app.coordinator.on_pause(),
            AppEvent::TrackFinished => app.coordinator.on_completed(),
            AppEvent::PlaybackFailed(notice) => {
                log::warn!("Playback failed: {}", notice);
                app.coordinator.on_playback_failed();
                app.notice = Some(notice);
            }

            AppEvent::Error(message) => {
                log::error!("{}", message);
                app.notice = Some(message);
            }
            AppEvent::FatalError(message) => anyhow::bail!(message),

            AppEvent::Tick => {}
            _ => {}
        }

        // Render after every event processed
        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}

/// Maps keyboard input to application actions and playback operations.
///
/// The commander has first refusal (it owns the `:` prefix), then an active
/// search input captures everything, and finally the global bindings apply:
///
/// * **Navigation**: j/k select a card, h/l or PageUp/PageDown change page.
/// * **Playback**: Enter or Space toggles the selected card, digits seek to
///   a fraction of the duration.
/// * **Application control**: `q` exits, `/` opens the search input.
fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    let event = Event::Key(key);
    if app.commander.handle_event(event, &mut app.command_tx) {
        return Ok(());
    }

    let event = Event::Key(key);
    if app.search.handle_event(event, &app.event_tx) {
        return Ok(());
    }

    process_global_key_event(app, key)
}

fn process_global_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('q') => {
            app.event_tx.send(AppEvent::ExitApplication)?;
        }

        KeyCode::Char('/') => app.search.activate(),

        // Card selection within the page
        KeyCode::Char('j') | KeyCode::Down => {
            let page_len = app.coordinator.sessions().len();
            app.card_list.select_next(page_len);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            let page_len = app.coordinator.sessions().len();
            app.card_list.select_previous(page_len);
        }

        // Pagination
        KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => {
            app.goto_page(app.current_page + 1)?;
        }
        KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => {
            app.goto_page(app.current_page.saturating_sub(1))?;
        }

        // Playback controls
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.coordinator.toggle(app.card_list.selected())?;
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            let fraction = f64::from(c.to_digit(10).unwrap_or(0)) / 10.0;
            app.coordinator
                .seek_to_fraction(app.card_list.selected(), fraction)?;
        }

        _ => {}
    }

    Ok(())
}
