use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Row, Table, TableState},
    Frame,
};

use canaiguess_core::models::{GameSummary, UserStats};

use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;
use crate::utils::{format_date, format_percent};
use crate::views::profile::ProfileData;
use crate::views::ProfileView;

use super::{form_lines, loaded, render_message, tabbed_area};

pub fn render(frame: &mut Frame, view: &ProfileView, area: Rect) {
    let body = tabbed_area(frame, view.tab, area);
    let state = view.state();
    match loaded(frame, &state, &view.username, body) {
        Some(ProfileData::Stats(stats)) => render_stats(frame, &view.username, stats, body),
        Some(ProfileData::RecentGames(games)) => render_games(frame, games, view.selection, body),
        None => {}
    }

    if view.edit.is_some() {
        render_edit(frame, view, area);
    }
}

fn stat_line(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<14}", label), styles::muted_style()),
        Span::raw(value),
    ])
}

fn render_stats(frame: &mut Frame, username: &str, stats: &UserStats, area: Rect) {
    let lines = vec![
        Line::from(""),
        stat_line("Games played", stats.games_played.to_string()),
        stat_line("High score", stats.high_score.to_string()),
        stat_line("Guesses", stats.total_guesses.to_string()),
        stat_line("Correct", stats.correct_guesses.to_string()),
        stat_line("Accuracy", format_percent(stats.accuracy_percent())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  [e]", styles::help_key_style()),
            Span::styled(" edit account  ", styles::help_desc_style()),
            Span::styled("[D]", styles::help_key_style()),
            Span::styled(" delete account", styles::help_desc_style()),
        ]),
    ];
    render_message(frame, lines, username, area);
}

fn render_games(frame: &mut Frame, games: &[GameSummary], selection: usize, area: Rect) {
    let header = Row::new(vec!["Game", "Score", "Correct", "Difficulty", "Finished"])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = games
        .iter()
        .map(|game| {
            Row::new(vec![
                Cell::from(format!("#{}", game.game_id)),
                Cell::from(format!("{:>6}", game.score)),
                Cell::from(format!("{:>3}/{:<3}", game.correct_guesses, game.total_guesses)),
                Cell::from(game.difficulty.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(format_date(game.finished_at.as_ref())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Length(9),
        Constraint::Fill(1),
        Constraint::Length(13),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" Last {} games ", games.len()))
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_edit(frame: &mut Frame, view: &ProfileView, area: Rect) {
    let Some(form) = view.edit.as_ref() else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "  Leave a field blank to keep it unchanged",
            styles::muted_style(),
        )),
        Line::from(""),
    ];
    let button = if view.updating { "Saving..." } else { "Save" };
    lines.extend(form_lines(form, button));

    let area = centered_rect_fixed(52, lines.len() as u16 + 2, area);
    frame.render_widget(Clear, area);
    render_message(frame, lines, "Edit account", area);
}
