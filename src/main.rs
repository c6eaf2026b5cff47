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

//! # Recital TUI.
//!
//! A terminal-based browser and player for a catalog of narrated text
//! recordings.
//!
//! This application coordinates a TUI frontend built with `ratatui` and a
//! background processing layer.
//!
//! It uses an event-driven architecture where:
//!
//! * The **Main Thread** manages the terminal lifecycle and UI rendering.
//! * **Background Workers** handle catalog loading and long-running tasks via
//!   asynchronous command processing.
//! * **Event Loops** capture user input and system ticks to drive the UI
//!   state.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern to ensure the
//! terminal state is preserved even in the event of a crash. Communication
//! between the UI and background workers is handled via `std::sync::mpsc`
//! channels.

mod actions;
mod catalog;
mod commander;
mod components;
mod config;
mod player;
mod render;
mod store;
mod theme;
mod util;

use anyhow::{Context, Result};
use crossterm::{
    event::{self},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self},
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Duration,
};

use crate::{
    actions::{
        commands::AppCommand,
        events::{AppEvent, process_events},
    },
    catalog::{
        Catalog, Record,
        filter::{FilterCriteria, apply_filters},
    },
    commander::Commander,
    components::{CardList, SearchInput, cards::{page_count, page_range}},
    config::AppConfig,
    player::{AudioPlayer, PlayerState, coordinator::Coordinator},
    store::{Store, UiState},
    theme::Theme,
};

/// Application state.
struct App {
    pub config: AppConfig,

    pub theme: Theme,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    pub command_tx: Sender<AppCommand>,

    pub catalog: Catalog,
    pub filtered: Vec<Record>,
    pub criteria: FilterCriteria,
    pub current_page: usize,

    pub coordinator: Coordinator,

    pub card_list: CardList,
    pub commander: Commander,
    pub search: SearchInput,

    pub player_state: PlayerState,
    pub notice: Option<String>,
}

impl App {
    /// Create a new instance of application state.
    pub fn new(config: AppConfig, command_tx: Sender<AppCommand>) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel();

        let store = Store::open(&config.database_file)
            .with_context(|| format!("Failed to open database {}", config.database_file))?;

        let audio_player = AudioPlayer::new(event_tx.clone())?;

        Ok(Self {
            config,
            theme: Theme::default(),
            event_tx,
            event_rx,
            command_tx,
            catalog: Catalog::new(),
            filtered: Vec::new(),
            criteria: FilterCriteria::default(),
            current_page: 1,
            coordinator: Coordinator::new(audio_player, store),
            card_list: CardList::new(),
            commander: Commander::new(),
            search: SearchInput::new(),
            player_state: PlayerState::Stopped,
            notice: None,
        })
    }

    /// Installs a freshly loaded catalog and restores the persisted UI state.
    ///
    /// Filters and the page number survive a restart, the page is clamped in
    /// case the new catalog is smaller than the one the state was saved for.
    pub fn apply_catalog(&mut self, records: Vec<Record>) -> Result<()> {
        self.catalog.replace(records);

        if let Some(state) = self.coordinator.store().ui_state() {
            self.criteria = state.criteria;
            self.search
                .restore(self.criteria.search.as_deref().unwrap_or(""));
            self.current_page = state.current_page.max(1);
        }

        self.filtered = apply_filters(self.catalog.records(), &self.criteria);
        self.current_page = self.current_page.min(page_count(self.filtered.len()));
        self.rebuild_page()?;
        self.notice = None;

        Ok(())
    }

    /// Re-applies the filter criteria after any of them changed.
    ///
    /// Any filter change resets to the first page, matching records are
    /// recomputed from the full catalog and the new state is persisted.
    pub fn apply_criteria_change(&mut self) -> Result<()> {
        self.filtered = apply_filters(self.catalog.records(), &self.criteria);
        self.current_page = 1;
        self.persist_ui_state();
        self.rebuild_page()
    }

    /// Moves to the given page, clamped to the valid range.
    pub fn goto_page(&mut self, page: usize) -> Result<()> {
        let page = page.clamp(1, page_count(self.filtered.len()));
        if page == self.current_page {
            return Ok(());
        }

        self.current_page = page;
        self.persist_ui_state();
        self.rebuild_page()
    }

    fn persist_ui_state(&self) {
        self.coordinator.store().save_ui_state(&UiState {
            criteria: self.criteria.clone(),
            current_page: self.current_page,
        });
    }

    fn rebuild_page(&mut self) -> Result<()> {
        let range = page_range(self.current_page, self.filtered.len());
        self.coordinator.set_page(self.filtered[range].to_vec())?;
        self.card_list.reset();

        Ok(())
    }
}

/// The entry point of the application.
///
/// Sets up the communication channels, initializes the application state,
/// manages the terminal lifecycle, and returns an error if any part of the
/// execution fails.
fn main() -> Result<()> {
    colog::init();

    let config = config::load_config();

    let (command_tx, command_rx) = mpsc::channel();

    let mut app = App::new(config, command_tx).context("Failed to initalise application")?;

    let mut terminal = setup_terminal()?;
    let res = run(&mut terminal, &mut app, command_rx);
    restore_terminal(&mut terminal);

    res.context("Application error occurred")
}

/// Prepares the terminal for the TUI application.
///
/// This function enables raw mode to capture all keyboard input and switches
/// the terminal to the alternate screen buffer.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This reverses the changes made by [`setup_terminal`], including disabling
/// raw mode and leaving the alternate screen. It also ensures the cursor is
/// made visible again.
///
/// This function is designed to be "best-effort" and does not return a result,
/// as it is typically called during cleanup or panic handling.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
}

/// Starts the application's background workers and enters the main event loop.
///
/// This function spawns several long-running background threads:
/// * A command worker to process asynchronous [`AppCommand`]s.
/// * An input thread to poll for system keyboard events.
/// * A tick thread to trigger periodic UI refreshes.
///
/// After spawning the workers, it hands control to [`process_events`] to
/// manage the UI and state updates.
///
/// # Errors
///
/// Returns an error if the event processing loop encounters an unrecoverable
/// application error.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    command_rx: Receiver<AppCommand>,
) -> Result<()> {
    // Spawn a background worker to process application commands asynchronously.
    let command_event_tx = app.event_tx.clone();
    actions::commands::spawn_command_worker(&app.config, command_rx, command_event_tx);

    // Spawn a thread to translate raw key events to application events.
    let tx_keys = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            if let Ok(event::Event::Key(key)) = event::read() {
                tx_keys.send(AppEvent::Key(key)).ok();
            }
        }
    });

    // Spawn a thread to send a periodic tick application event, this is
    // effectively the minimum "frame rate" for rendering the TUI application.
    let tx_tick = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            let _ = tx_tick.send(AppEvent::Tick);
            thread::sleep(Duration::from_millis(250));
        }
    });

    // Initial trigger to fetch the catalog of recordings
    app.command_tx
        .send(AppCommand::LoadCatalog)
        .context("Failed to request the catalog")?;

    // Application event loop, process events until the user quits
    process_events(terminal, app)
}
