use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::render::{centered_rect_fixed, logo_lines};
use crate::ui::styles;
use crate::views::{LoginView, RegisterView};

use super::form_lines;

fn render_form_box(frame: &mut Frame, lines: Vec<Line<'static>>, area: Rect) {
    let area = centered_rect_fixed(52, lines.len() as u16 + 2, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_login(frame: &mut Frame, view: &LoginView, area: Rect) {
    let mut lines = logo_lines();
    lines.push(Line::from(""));

    let button = if view.pending { "Logging in..." } else { "Login" };
    lines.extend(form_lines(&view.form, button));

    let check = if view.remember { "[x]" } else { "[ ]" };
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(format!("   {} ", check), styles::highlight_style()),
        Span::styled("Remember password  ", styles::muted_style()),
        Span::styled("[Ctrl+R]", styles::help_key_style()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("   No account? ", styles::muted_style()),
        Span::styled("[Ctrl+N]", styles::help_key_style()),
        Span::styled(" to register", styles::muted_style()),
    ]));

    render_form_box(frame, lines, area);
}

pub fn render_register(frame: &mut Frame, view: &RegisterView, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled("  Create an account", styles::title_style())),
        Line::from(""),
    ];

    let button = if view.pending { "Creating..." } else { "Register" };
    lines.extend(form_lines(&view.form, button));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("   Have an account? ", styles::muted_style()),
        Span::styled("[Ctrl+L]", styles::help_key_style()),
        Span::styled(" to log in", styles::muted_style()),
    ]));

    render_form_box(frame, lines, area);
}
