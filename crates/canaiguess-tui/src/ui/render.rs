use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use canaiguess_core::Viewer;

use crate::app::{App, AppState, PendingAction, StatusKind};
use crate::views::View;

use super::screens::{admin, auth, game, leaderboard, menu, profile};
use super::styles;

const LOGO: [&str; 3] = [
    "   ╔═╗╔═╗╔╗╔  ╔═╗╦  ╔═╗╦ ╦╔═╗╔═╗╔═╗",
    "   ║  ╠═╣║║║  ╠═╣║  ║ ╦║ ║║╣ ╚═╗╚═╗",
    "   ╚═╝╩ ╩╝╚╝  ╩ ╩╩  ╚═╝╚═╝╚═╝╚═╝╚═╝",
];

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    match &app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Confirming(action) => render_confirm_overlay(frame, action),
        AppState::Normal | AppState::Quitting => {}
    }
}

/// Logo lines for the landing page and dialogs
pub fn logo_lines() -> Vec<Line<'static>> {
    LOGO.iter()
        .map(|line| Line::from(Span::styled(*line, styles::title_style())))
        .collect()
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("  CanAIGuess | {}", app.route.title());
    let who = match app.viewer {
        Viewer::User => app.session.username().unwrap_or("player").to_string(),
        Viewer::Guest => "guest".to_string(),
    };
    let right = format!("{}   [?] Help", who);

    let title_line = Line::from(vec![
        Span::styled(title.clone(), styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.chars().count() + right.chars().count() + 2),
        )),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match &app.view {
        View::Landing(view) => menu::render_landing(frame, view, area),
        View::Menu(view) => menu::render_menu(frame, view, area),
        View::Login(view) => auth::render_login(frame, view, area),
        View::Register(view) => auth::render_register(frame, view, area),
        View::Game(view) => game::render_game(frame, view, area),
        View::Results(view) => game::render_results(frame, view, app.viewer, area),
        View::Leaderboard(view) => leaderboard::render(frame, view, app.session.username(), area),
        View::Profile(view) => profile::render(frame, view, area),
        View::Admin(view) => admin::render(frame, view, area),
    }
}

/// Key hints for the mounted view
fn shortcuts(view: &View) -> &'static str {
    match view {
        View::Landing(_) | View::Menu(_) => "[↑↓] move | [Enter] select | [q]uit",
        View::Login(_) | View::Register(_) => "[Tab] next field | [Enter] submit | [Esc] back",
        View::Game(_) => "[a]i | [h]uman | [Enter] submit | [r]eload | [Esc] menu",
        View::Results(_) => "[p]lay again | [l]eaderboard | [m]enu",
        View::Leaderboard(_) => "[←→] tab | [r]etry | [Esc] menu",
        View::Profile(view) if view.edit.is_some() => "[Tab] next field | [Enter] save | [Esc] cancel",
        View::Profile(_) => "[←→] tab | [e]dit | [D]elete account | [Esc] menu",
        View::Admin(_) => "[←→] tab | [r]etry | [Esc] menu",
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (left_text, left_style) = match &app.status {
        Some(status) => {
            let style = match status.kind {
                StatusKind::Info => styles::success_style(),
                StatusKind::Error => styles::error_style(),
            };
            (format!(" {} ", status.text), style)
        }
        None => (format!(" {} ", app.route.path()), styles::muted_style()),
    };
    let right_text = format!(" {} ", shortcuts(&app.view));

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());
    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 26, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let mut help_text = logo_lines();
    help_text.push(Line::from(Span::styled(
        format!("              version {}", version),
        styles::muted_style(),
    )));
    help_text.extend([
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("↑/↓", "Move selection"),
        help_line("←/→ Tab", "Switch tabs / form fields"),
        help_line("Enter", "Select / submit"),
        help_line("Esc", "Back to menu"),
        help_line("r", "Retry a failed load"),
        Line::from(""),
        Line::from(Span::styled(" Game", styles::highlight_style())),
        help_line("a / h", "Mark image as AI / human"),
        help_line("Space", "Flip the mark"),
        help_line("Enter", "Submit the batch"),
        Line::from(""),
        Line::from(Span::styled(" Admin", styles::highlight_style())),
        help_line("p / d", "Promote / delete user"),
        help_line("Enter / x", "Resolve report / delete image"),
        Line::from(""),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn yes_no_line(yes: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled("   Press ", styles::muted_style()),
        Span::styled("[Y]", styles::help_key_style()),
        Span::styled(format!(" to {}, ", yes), styles::muted_style()),
        Span::styled("[N]", styles::help_key_style()),
        Span::styled(" to cancel", styles::muted_style()),
    ])
}

fn render_dialog(frame: &mut Frame, lines: Vec<Line<'static>>) {
    let area = centered_rect_fixed(52, lines.len() as u16 + 2, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let mut lines = logo_lines();
    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        yes_no_line("quit"),
    ]);
    render_dialog(frame, lines);
}

fn render_confirm_overlay(frame: &mut Frame, action: &PendingAction) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("   {}", action.prompt()), styles::error_style())),
        Line::from(""),
        yes_no_line("confirm"),
        Line::from(""),
    ];
    render_dialog(frame, lines);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fixed() {
        let outer = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect_fixed(46, 10, outer), Rect::new(27, 15, 46, 10));
        // Larger than the screen: clamped
        assert_eq!(centered_rect_fixed(200, 50, outer), Rect::new(0, 0, 100, 40));
    }
}
