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

//! Render the footer line.
//!
//! The footer is shared between the commander, the search input and
//! transient notices. The commander takes precedence when active, then the
//! search input, otherwise the most recent notice (if any) is shown.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
};
use tui_input::Input;

use crate::App;

pub(crate) fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1)])
        .horizontal_margin(1)
        .split(area);

    if app.commander.active() {
        draw_input(f, container[0], ":", &app.commander.input, app.theme.commander_colour, app);
    } else if app.search.active() {
        draw_input(f, container[0], "/", &app.search.input, app.theme.accent_colour, app);
    } else if let Some(notice) = &app.notice {
        f.render_widget(
            Paragraph::new(notice.as_str()).style(Style::default().fg(app.theme.notice_colour)),
            container[0],
        );
    }
}

fn draw_input(f: &mut Frame, area: Rect, prefix: &str, input: &Input, colour: Color, app: &App) {
    f.render_widget(
        Paragraph::new(format!("{}{}", prefix, input.value())).style(
            Style::default()
                .fg(colour)
                .bg(app.theme.gauge_track_colour),
        ),
        area,
    );
    f.set_cursor_position((input_cursor_x(area.x, prefix, input), area.y));
}

// Column math in terminal cells; the search text is routinely CJK, where one
// char occupies two cells.
fn input_cursor_x(area_x: u16, prefix: &str, input: &Input) -> u16 {
    area_x + prefix.len() as u16 + input.visual_cursor() as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_column_accounts_for_wide_characters() {
        let input = Input::default().with_value("春晓".to_string());
        assert_eq!(input_cursor_x(1, "/", &input), 6);

        let input = Input::default().with_value("ab".to_string());
        assert_eq!(input_cursor_x(1, "/", &input), 4);
    }
}
