use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use canaiguess_core::auth::ADMIN_ROLE;
use canaiguess_core::models::{Report, UserSummary};

use crate::ui::styles;
use crate::utils::{format_date, format_label, truncate_string};
use crate::views::admin::{AdminData, ImageFocus, ImageTools};
use crate::views::AdminView;

use super::{button_line, field_line, loaded, render_message, tabbed_area};

pub fn render(frame: &mut Frame, view: &AdminView, area: Rect) {
    let area = tabbed_area(frame, view.tab, area);
    let Some(state) = view.state() else {
        render_images(frame, &view.images, area);
        return;
    };

    match loaded(frame, &state, "Admin", area) {
        Some(AdminData::Users(users)) => render_users(frame, users, view.selection, area),
        Some(AdminData::Reports(reports)) => render_reports(frame, reports, view.selection, area),
        None => {}
    }
}

fn render_table(frame: &mut Frame, table: Table, title: String, selection: usize, area: Rect) {
    let table = table
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_users(frame: &mut Frame, users: &[UserSummary], selection: usize, area: Rect) {
    let header = Row::new(vec!["Username", "Email", "Role"])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = users
        .iter()
        .map(|user| {
            let role_style = if user.role.as_deref() == Some(ADMIN_ROLE) {
                styles::highlight_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(truncate_string(&user.username, 24)),
                Cell::from(truncate_string(user.email.as_deref().unwrap_or("-"), 36)),
                Cell::from(Span::styled(user.role_display().to_string(), role_style)),
            ])
        })
        .collect();

    let widths = [Constraint::Fill(1), Constraint::Fill(2), Constraint::Length(8)];
    let title = format!(" Users ({}) - [p]romote [d]elete ", users.len());
    render_table(frame, Table::new(rows, widths).header(header), title, selection, area);
}

fn render_reports(frame: &mut Frame, reports: &[Report], selection: usize, area: Rect) {
    if reports.is_empty() {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled("  No unresolved reports", styles::success_style())),
        ];
        render_message(frame, lines, "Reports", area);
        return;
    }

    let header = Row::new(vec!["Report", "Image", "Reason", "By", "Date"])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = reports
        .iter()
        .map(|report| {
            Row::new(vec![
                Cell::from(format!("#{}", report.id)),
                Cell::from(format!("#{}", report.image_id)),
                Cell::from(report.reason.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(report.reported_by.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(format_date(report.created_at.as_ref())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Length(13),
    ];
    let title = format!(
        " Unresolved reports ({}) - [Enter] resolve [x] delete image ",
        reports.len()
    );
    render_table(frame, Table::new(rows, widths).header(header), title, selection, area);
}

fn render_images(frame: &mut Frame, tools: &ImageTools, area: Rect) {
    let label_width = tools.path.label.len().max(tools.delete_id.label.len());
    let toggle = |fake: bool| {
        let style = if tools.fake == fake {
            styles::label_style(fake)
        } else {
            styles::muted_style()
        };
        let mark = if tools.fake == fake { "(•)" } else { "( )" };
        Span::styled(format!("{} {}  ", mark, format_label(fake)), style)
    };
    let label_focus = if tools.focus == ImageFocus::Label {
        styles::selected_style()
    } else {
        styles::muted_style()
    };

    let lines = vec![
        Line::from(Span::styled(" Upload an image", styles::highlight_style())),
        Line::from(""),
        field_line(&tools.path, tools.focus == ImageFocus::Path, label_width),
        Line::from(vec![
            Span::raw("   "),
            Span::styled(format!("{:>width$}: ", "Label", width = label_width), label_focus),
            toggle(false),
            toggle(true),
        ]),
        Line::from(""),
        button_line("Upload", tools.focus == ImageFocus::Upload),
        Line::from(""),
        Line::from(Span::styled(" Delete an image", styles::highlight_style())),
        Line::from(""),
        field_line(&tools.delete_id, tools.focus == ImageFocus::DeleteId, label_width),
        Line::from(""),
        button_line("Delete", tools.focus == ImageFocus::Delete),
        Line::from(""),
        Line::from(Span::styled(
            " [Tab] next field  [Space] switch label  [Enter] run",
            styles::muted_style(),
        )),
    ];
    render_message(frame, lines, "Images", area);
}
