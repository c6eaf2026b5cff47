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

//! Render the card list for the current page.
//!
//! Each visible record gets one card: title, grade/term/lesson metadata, a
//! play affordance with a progress gauge and `MM:SS / MM:SS` time label, and
//! the persisted status line ("Last at ..." / "Completed ..."). Cards that
//! do not fit the area are clipped; the page size bounds how many there are.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::{
    App,
    player::coordinator::{PlayerSession, describe_status},
    render::icons::{ICON_PAUSE, ICON_PLAY},
    theme::Theme,
    util::format::format_time,
};

const CARD_HEIGHT: u16 = 5;

/// Renders one card per session on the visible page.
pub(crate) fn draw_cards(f: &mut Frame, area: Rect, app: &App) {
    let sessions = app.coordinator.sessions();

    if sessions.is_empty() {
        let message = if app.catalog.len() == 0 {
            "Loading catalog..."
        } else {
            "No matching recordings"
        };
        let empty = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.card_meta_fg));
        f.render_widget(empty, area);
        return;
    }

    let mut y = area.y;
    for (index, session) in sessions.iter().enumerate() {
        if y + CARD_HEIGHT > area.y + area.height {
            break;
        }
        let card_area = Rect::new(area.x, y, area.width, CARD_HEIGHT);
        draw_card(
            f,
            card_area,
            session,
            index == app.card_list.selected(),
            &app.theme,
        );
        y += CARD_HEIGHT;
    }
}

fn draw_card(f: &mut Frame, area: Rect, session: &PlayerSession, selected: bool, theme: &Theme) {
    let border_colour = if selected {
        theme.accent_colour
    } else {
        theme.border_colour
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_colour))
        .padding(Padding::horizontal(1))
        .title(Span::styled(
            format!(" {} ", session.record.title),
            Style::default().add_modifier(Modifier::BOLD).fg(theme.card_title_fg),
        ));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    // Metadata line
    let mut meta = format!("Grade {} · Term {}", session.record.grade, session.record.term);
    if !session.record.lesson_number.is_empty() {
        meta.push_str(&format!(" · {}", session.record.lesson_number));
    }
    f.render_widget(
        Paragraph::new(meta).style(Style::default().fg(theme.card_meta_fg)),
        rows[0],
    );

    // Player line: icon, gauge, time label
    let player_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(16),
        ])
        .split(rows[1]);

    let icon = if session.playing { ICON_PAUSE } else { ICON_PLAY };
    f.render_widget(
        Paragraph::new(icon).style(Style::default().fg(theme.accent_colour)),
        player_row[0],
    );

    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(theme.accent_colour)
                .bg(theme.gauge_track_colour),
        )
        .ratio(session.progress_ratio())
        .label("")
        .use_unicode(true);
    f.render_widget(gauge, player_row[1]);

    let time_label = Line::from(Span::styled(
        format!(
            "{} / {}",
            format_time(session.current_time),
            format_time(session.duration)
        ),
        Style::default().fg(theme.time_fg),
    ));
    f.render_widget(
        Paragraph::new(time_label).alignment(Alignment::Right),
        player_row[2],
    );

    // Status line, only when something has been persisted for this source
    if let Some(status) = &session.status {
        let colour = if status.completed {
            theme.card_completed_fg
        } else {
            theme.card_status_fg
        };
        f.render_widget(
            Paragraph::new(describe_status(status)).style(Style::default().fg(colour)),
            rows[2],
        );
    }
}
