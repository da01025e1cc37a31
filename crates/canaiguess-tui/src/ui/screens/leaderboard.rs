use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::ui::styles;
use crate::utils::{format_percent, truncate_string};
use crate::views::leaderboard::LeaderboardData;
use crate::views::LeaderboardView;

use super::{loaded, tabbed_area};

/// Render the leaderboard; `me` is the signed-in player, marked in the list
pub fn render(frame: &mut Frame, view: &LeaderboardView, me: Option<&str>, area: Rect) {
    let area = tabbed_area(frame, view.tab, area);
    let state = view.state();
    let Some(data) = loaded(frame, &state, "Leaderboard", area) else {
        return;
    };

    let name_cell = |name: &str| -> Cell<'static> {
        let shown = truncate_string(name, 32);
        if me == Some(name) {
            Cell::from(Span::styled(format!("{} (you)", shown), styles::highlight_style()))
        } else {
            Cell::from(shown)
        }
    };

    let (header, rows, widths, title): (Row, Vec<Row>, Vec<Constraint>, String) = match data {
        LeaderboardData::Score(entries) => (
            Row::new(vec!["#", "Player", "Score"]),
            entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    Row::new(vec![
                        Cell::from(format!("{:>3}", i + 1)),
                        name_cell(&entry.username),
                        Cell::from(format!("{:>8}", entry.score)),
                    ])
                })
                .collect(),
            vec![Constraint::Length(4), Constraint::Fill(1), Constraint::Length(10)],
            format!(" Top scores ({}) ", entries.len()),
        ),
        LeaderboardData::Accuracy(entries) => (
            Row::new(vec!["#", "Player", "Accuracy", "Guesses"]),
            entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    Row::new(vec![
                        Cell::from(format!("{:>3}", i + 1)),
                        name_cell(&entry.username),
                        Cell::from(format!("{:>8}", format_percent(entry.accuracy_percent))),
                        Cell::from(format!("{:>7}", entry.total_guesses)),
                    ])
                })
                .collect(),
            vec![
                Constraint::Length(4),
                Constraint::Fill(1),
                Constraint::Length(10),
                Constraint::Length(9),
            ],
            format!(" Most accurate ({}) ", entries.len()),
        ),
    };

    let table = Table::new(rows, widths)
        .header(header.style(styles::title_style()).height(1))
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut table_state = TableState::default();
    table_state.select(Some(view.selection));

    frame.render_stateful_widget(table, area, &mut table_state);
}
