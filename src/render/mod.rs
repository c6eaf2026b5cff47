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

//! User interface rendering logic.
//!
//! This module handles the translation of the [`App`] state into visual
//! widgets using the `ratatui` framework. It is responsible for layout
//! management, widget styling, and terminal frame composition.
//!
//! # Rendering Pipeline
//!
//! The primary entry point is the [`draw`] function, which is called after
//! every processed event to provide a reactive user interface.

pub(crate) mod cards;
mod footer;
mod icons;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    App,
    player::PlayerState,
    render::{cards::draw_cards, footer::draw_footer},
};

/// Renders the user interface to the terminal frame.
///
/// The screen is partitioned into a header (title, record counts, active
/// filters), the card list for the current page, a pagination line, and a
/// footer carrying the commander/search input or the latest notice.
pub(crate) fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(f, outer[0], app);
    draw_cards(f, outer[1], app);
    draw_pagination(f, outer[2], app);
    draw_footer(f, outer[3], app);
}

fn draw_header(f: &mut Frame, area: ratatui::layout::Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let state = match app.player_state {
        PlayerState::Playing => "playing",
        PlayerState::Paused => "paused",
        PlayerState::Stopped => "",
    };
    let title = Line::from(vec![
        Span::styled(" Recital ", Style::default().add_modifier(Modifier::BOLD).fg(app.theme.accent_colour)),
        Span::raw("narrated readings  "),
        Span::styled(state, Style::default().fg(app.theme.accent_colour)),
    ]);
    f.render_widget(Paragraph::new(title), rows[0]);

    let counts = Paragraph::new(format!(
        "{} shown / {} total ",
        app.filtered.len(),
        app.catalog.len()
    ))
    .alignment(Alignment::Right)
    .style(Style::default().fg(app.theme.card_meta_fg));
    f.render_widget(counts, rows[0]);

    let mut filters: Vec<Span> = vec![Span::raw(" ")];
    if let Some(grade) = &app.criteria.grade {
        filters.push(Span::styled(
            format!("grade={} ", grade),
            Style::default().fg(app.theme.accent_colour),
        ));
    }
    if let Some(term) = &app.criteria.term {
        filters.push(Span::styled(
            format!("term={} ", term),
            Style::default().fg(app.theme.accent_colour),
        ));
    }
    if let Some(search) = &app.criteria.search {
        filters.push(Span::styled(
            format!("search=\"{}\" ", search),
            Style::default().fg(app.theme.accent_colour),
        ));
    }
    if filters.len() == 1 {
        filters.push(Span::styled(
            "no filters",
            Style::default().fg(app.theme.card_meta_fg),
        ));
    }
    if !app.catalog.grades().is_empty() {
        filters.push(Span::styled(
            format!("  grades: {}", app.catalog.grades().join(" ")),
            Style::default().fg(app.theme.card_meta_fg),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(filters)), rows[1]);
}

fn draw_pagination(f: &mut Frame, area: ratatui::layout::Rect, app: &App) {
    let total_pages = crate::components::cards::page_count(app.filtered.len());
    let line = Line::from(vec![
        Span::raw(" Page "),
        Span::styled(
            format!("{}", app.current_page),
            Style::default().add_modifier(Modifier::BOLD).fg(app.theme.accent_colour),
        ),
        Span::raw(format!(" of {}", total_pages)),
        Span::styled(
            "   h/l page  j/k select  enter play/pause  0-9 seek  / search  : command",
            Style::default().fg(app.theme.card_meta_fg),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
