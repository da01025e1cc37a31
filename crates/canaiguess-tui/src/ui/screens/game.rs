use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use canaiguess_core::Viewer;

use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;
use crate::utils::{format_label, format_percent, truncate_string};
use crate::views::{GameView, ResultsView};

use super::render_message;

/// Render a running game: the batch on the left, score and last verdict on the right
pub fn render_game(frame: &mut Frame, view: &GameView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    render_batch(frame, view, chunks[0]);
    render_game_info(frame, view, chunks[1]);
}

fn render_batch(frame: &mut Frame, view: &GameView, area: Rect) {
    let Some(batch) = view.batch.as_ref() else {
        let status = if view.needs_reload() {
            Line::from(vec![
                Span::styled("  No images loaded. Press ", styles::muted_style()),
                Span::styled("[r]", styles::help_key_style()),
                Span::styled(" to try again.", styles::muted_style()),
            ])
        } else {
            Line::from(Span::styled("  Loading images...", styles::muted_style()))
        };
        let lines = vec![Line::from(""), status];
        render_message(frame, lines, "Images", area);
        return;
    };

    let url_width = (area.width as usize).saturating_sub(24).max(10);
    let header = Row::new(vec![Cell::from("#"), Cell::from("Image"), Cell::from("Your guess")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = batch
        .images
        .iter()
        .zip(&view.marks)
        .enumerate()
        .map(|(i, (image, mark))| {
            let style = if i == view.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            let guess = match mark {
                Some(fake) => Cell::from(Span::styled(format_label(*fake), styles::label_style(*fake))),
                None => Cell::from(Span::styled("?", styles::muted_style())),
            };
            Row::new(vec![
                Cell::from(format!("{:>2}", i + 1)),
                Cell::from(truncate_string(&image.url, url_width)),
                guess,
            ])
            .style(style)
        })
        .collect();

    let widths = [Constraint::Length(3), Constraint::Fill(1), Constraint::Length(11)];
    let title = format!(
        " Images ({}/{} marked) - [a]i [h]uman [Space] flip [Enter] submit ",
        view.marked_count(),
        view.image_count()
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(!view.busy)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(view.selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_game_info(frame: &mut Frame, view: &GameView, area: Rect) {
    let mut lines = vec![];

    match view.game.as_ref() {
        Some(game) => {
            lines.push(Line::from(Span::styled(format!("Game #{}", game.id), styles::title_style())));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Round:      ", styles::muted_style()),
                Span::raw(game.round_display()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Score:      ", styles::muted_style()),
                Span::styled(game.score.to_string(), styles::highlight_style()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Difficulty: ", styles::muted_style()),
                Span::raw(game.difficulty.clone().unwrap_or_else(|| "-".to_string())),
            ]));
        }
        None => lines.push(Line::from(Span::styled(
            format!("Game #{}", view.game_id),
            styles::title_style(),
        ))),
    }

    if let Some(image) = view.batch.as_ref().and_then(|b| b.images.get(view.selection)) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Selected image", styles::highlight_style())));
        lines.push(Line::from(Span::raw(image.url.clone())));
    }

    if let Some(outcome) = view.last_outcome.as_ref() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Last round", styles::highlight_style())));
        if outcome.correct {
            lines.push(Line::from(Span::styled("Correct!", styles::success_style())));
        } else {
            lines.push(Line::from(Span::styled("Not quite.", styles::error_style())));
        }
        for answer in &outcome.answers {
            lines.push(Line::from(vec![
                Span::styled(format!("#{:<6}", answer.image_id), styles::muted_style()),
                Span::styled(format_label(answer.fake), styles::label_style(answer.fake)),
            ]));
        }
    }

    if view.busy {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Waiting for the server...", styles::muted_style())));
    }

    render_message(frame, lines, "Game", area);
}

pub fn render_results(frame: &mut Frame, view: &ResultsView, viewer: Viewer, area: Rect) {
    let mut lines = vec![Line::from("")];

    match view.results.as_ref() {
        Some(results) => {
            lines.push(Line::from(Span::styled(
                format!("  Game #{} finished", view.game_id),
                styles::title_style(),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("  Score:      ", styles::muted_style()),
                Span::styled(results.score.to_string(), styles::highlight_style()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("  Accuracy:   ", styles::muted_style()),
                Span::raw(format!(
                    "{} ({}/{})",
                    format_percent(results.accuracy_percent()),
                    results.correct_guesses,
                    results.total_guesses
                )),
            ]));
            if let Some(difficulty) = results.difficulty.as_deref() {
                lines.push(Line::from(vec![
                    Span::styled("  Difficulty: ", styles::muted_style()),
                    Span::raw(difficulty.to_string()),
                ]));
            }
            if viewer == Viewer::Guest {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "  Log in to keep your scores on the leaderboard.",
                    styles::muted_style(),
                )));
            }
        }
        None => lines.push(Line::from(Span::styled("  Loading results...", styles::muted_style()))),
    }

    lines.push(Line::from(""));
    if view.starting {
        lines.push(Line::from(Span::styled("  Starting a new game...", styles::muted_style())));
    } else {
        lines.push(Line::from(vec![
            Span::styled("  [p]", styles::help_key_style()),
            Span::styled(" play again  ", styles::help_desc_style()),
            Span::styled("[l]", styles::help_key_style()),
            Span::styled(" leaderboard  ", styles::help_desc_style()),
            Span::styled("[m]", styles::help_key_style()),
            Span::styled(" menu", styles::help_desc_style()),
        ]));
    }

    let area = centered_rect_fixed(56, lines.len() as u16 + 2, area);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(" Results ")
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        ),
        area,
    );
}
