//! Content rendering for each route.
//!
//! Helpers here are shared by several screens: the tab line of tabbed
//! views, placeholders for data that is still loading or failed, and the
//! fields and buttons of forms.

pub mod admin;
pub mod auth;
pub mod game;
pub mod leaderboard;
pub mod menu;
pub mod profile;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use canaiguess_core::LoadState;

use crate::ui::styles;
use crate::views::form::{Form, TextInput};
use crate::views::TabKey;

/// Width of the value column of form fields
const FIELD_WIDTH: usize = 28;

/// Split `area` into a tab line and a body, and draw the tab line.
pub fn tabbed_area<K: TabKey>(frame: &mut Frame, current: K, area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .split(area);

    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in K::all().iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        if *tab == current {
            spans.push(Span::styled(tab.title(), styles::tab_style(true)));
        } else {
            spans.push(Span::styled(tab.title(), styles::muted_style()));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[0]);

    chunks[1]
}

/// Draw `state` when it has no data yet, and return the data otherwise.
pub fn loaded<'a, T>(frame: &mut Frame, state: &'a LoadState<T>, title: &str, area: Rect) -> Option<&'a T> {
    let lines = match state {
        LoadState::Ready(data) => return Some(data),
        LoadState::NotStarted | LoadState::Loading => vec![
            Line::from(""),
            Line::from(Span::styled("  Loading...", styles::muted_style())),
        ],
        LoadState::Failed(err) => vec![
            Line::from(""),
            Line::from(Span::styled(format!("  {}", err.message()), styles::error_style())),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Press ", styles::muted_style()),
                Span::styled("[r]", styles::help_key_style()),
                Span::styled(" to try again", styles::muted_style()),
            ]),
        ],
    };
    render_message(frame, lines, title, area);
    None
}

/// Draw a bordered block holding `lines`.
pub fn render_message(frame: &mut Frame, lines: Vec<Line<'static>>, title: &str, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

/// One labelled text field
pub fn field_line(input: &TextInput, focused: bool, label_width: usize) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "▌" } else { "" };
    let shown = tail(&input.display(), FIELD_WIDTH);
    Line::from(vec![
        Span::raw("   "),
        Span::styled(format!("{:>width$}: [", input.label, width = label_width), styles::muted_style()),
        Span::styled(format!("{:<width$}{}", shown, cursor, width = FIELD_WIDTH), style),
        Span::styled("]", styles::muted_style()),
    ])
}

pub fn button_line(label: &str, focused: bool) -> Line<'static> {
    if focused {
        Line::from(vec![
            Span::raw("            ["),
            Span::styled(format!(" ▶ {} ◀ ", label), styles::selected_style()),
            Span::raw("]"),
        ])
    } else {
        Line::from(vec![
            Span::raw("            ["),
            Span::styled(format!("   {}   ", label), styles::list_item_style()),
            Span::raw("]"),
        ])
    }
}

/// Field lines of `form`, followed by its submit button.
pub fn form_lines(form: &Form, button: &str) -> Vec<Line<'static>> {
    let label_width = form.fields.iter().map(|f| f.label.len()).max().unwrap_or(0);
    let mut lines: Vec<Line> = form
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| field_line(field, form.focus == i, label_width))
        .collect();
    lines.push(Line::from(""));
    lines.push(button_line(button, form.on_button()));
    lines
}

/// The last `width` characters of `s`, so the cursor end stays visible
fn tail(s: &str, width: usize) -> String {
    let count = s.chars().count();
    s.chars().skip(count.saturating_sub(width)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_keeps_end() {
        assert_eq!(tail("abc", 5), "abc");
        assert_eq!(tail("abcdef", 3), "def");
    }

    #[test]
    fn test_masked_field_hides_value() {
        let input = TextInput::masked("Password", 20).with_value("secret");
        let line = field_line(&input, false, 8);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(!text.contains("secret"));
        assert!(text.contains("******"));
    }

    #[test]
    fn test_form_lines_end_with_button() {
        let form = Form::new(vec![TextInput::new("Username", 10)]);
        let lines = form_lines(&form, "Login");
        assert_eq!(lines.len(), 3);
        let button: String = lines[2].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(button.contains("Login"));
    }
}
